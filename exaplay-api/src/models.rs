//! Typed records parsed from ExaPlay replies.

use serde::{Deserialize, Serialize};

/// Playback state reported in the first field of a status reply.
///
/// ExaPlay encodes states numerically: 0 = stopped, 1 = playing,
/// 2 = paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

impl PlaybackState {
    /// Map the wire encoding to a state; any other value is invalid.
    pub(crate) fn from_wire(value: i64) -> Option<Self> {
        match value {
            0 => Some(PlaybackState::Stopped),
            1 => Some(PlaybackState::Playing),
            2 => Some(PlaybackState::Paused),
            _ => None,
        }
    }
}

/// Normalized composition status, parsed from the 5-field CSV status reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionStatus {
    /// Current playback state
    pub state: PlaybackState,
    /// Current time position in seconds
    pub time: f64,
    /// Current frame number
    pub frame: i64,
    /// Current clip index; -1 means no clip is active (a valid value, not
    /// an error)
    pub clip_index: i64,
    /// Total duration in seconds
    pub duration: f64,
}

/// The raw command sent and ExaPlay's raw single-line reply, returned by
/// control verbs that have no structured payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandReply {
    /// Command exactly as sent, without the trailing CR
    pub sent: String,
    /// Reply exactly as received, without the trailing CRLF
    pub reply: String,
}
