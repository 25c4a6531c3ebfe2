//! Wire command builders for the ExaPlay text protocol.
//!
//! Commands are a verb plus comma-separated arguments, without the
//! trailing CR (the transport appends it).

/// Start playback of a composition: `play,{name}`.
pub fn play(composition: &str) -> String {
    format!("play,{composition}")
}

/// Pause playback of a composition: `pause,{name}`.
pub fn pause(composition: &str) -> String {
    format!("pause,{composition}")
}

/// Stop playback of a composition: `stop,{name}`.
pub fn stop(composition: &str) -> String {
    format!("stop,{composition}")
}

/// Query the ExaPlay version: `get:ver`.
pub fn version() -> String {
    "get:ver".to_string()
}

/// Query composition status: `get:status,{name}`.
pub fn status(composition: &str) -> String {
    format!("get:status,{composition}")
}

/// Query composition volume: `get:vol,{name}`.
pub fn volume(composition: &str) -> String {
    format!("get:vol,{composition}")
}

/// Set composition volume (0-100): `set:vol,{name},{value}`.
pub fn set_volume(composition: &str, value: u8) -> String {
    format!("set:vol,{composition},{value}")
}

/// Seek a timeline composition to a time in seconds:
/// `set:cuetime,{name},{seconds}`.
pub fn set_cuetime(composition: &str, seconds: f64) -> String {
    format!("set:cuetime,{composition},{seconds}")
}

/// Jump to a cue (timeline) or clip (cuelist, 1-based):
/// `set:cue,{name},{index}`.
pub fn set_cue(composition: &str, index: u32) -> String {
    format!("set:cue,{composition},{index}")
}
