//! Event types and OSC address decoding.

use rosc::{OscMessage, OscType};
use serde::Serialize;
use tracing::{debug, warn};

/// Kind of live event, matching the three ExaPlay OSC address shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Status,
    Cuetime,
    Cueframe,
}

/// A decoded live event from the device.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EventRecord {
    /// Playback state change, from `/{prefix}/status/{composition}`
    Status {
        /// Composition the update is for
        composition: String,
        /// Numeric playback state (0 = stopped, 1 = playing, 2 = paused)
        value: i32,
    },
    /// Playhead time update, from `/{prefix}/cuetime/{composition}`
    Cuetime {
        /// Composition the update is for
        composition: String,
        /// Current time position in seconds
        seconds: f64,
    },
    /// Playhead frame update, from `/{prefix}/cueframe/{composition}`
    Cueframe {
        /// Composition the update is for
        composition: String,
        /// Current frame number
        frame: i64,
    },
}

impl EventRecord {
    /// The composition this event is about.
    pub fn composition(&self) -> &str {
        match self {
            EventRecord::Status { composition, .. }
            | EventRecord::Cuetime { composition, .. }
            | EventRecord::Cueframe { composition, .. } => composition,
        }
    }

    /// The kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            EventRecord::Status { .. } => EventKind::Status,
            EventRecord::Cuetime { .. } => EventKind::Cuetime,
            EventRecord::Cueframe { .. } => EventKind::Cueframe,
        }
    }
}

/// Decode one OSC message into an event record.
///
/// Matches the three known address shapes,
/// `/{prefix}/status|cuetime|cueframe/{composition}`, and coerces the
/// first argument to the kind's numeric type. Anything that does not match
/// returns `None`: unrelated or malformed inbound traffic must never take
/// down ingestion, so decoding failures are logged and skipped rather than
/// surfaced.
pub fn decode_event(prefix: &str, message: &OscMessage) -> Option<EventRecord> {
    let mut segments = message.addr.split('/');
    if segments.next() != Some("") {
        debug!(address = %message.addr, "ignoring OSC address without leading slash");
        return None;
    }
    if segments.next() != Some(prefix) {
        debug!(address = %message.addr, prefix, "ignoring OSC address outside prefix");
        return None;
    }

    let category = segments.next().unwrap_or_default();
    let composition = segments.next().unwrap_or_default();
    if composition.is_empty() {
        warn!(address = %message.addr, "OSC address missing composition segment");
        return None;
    }

    let Some(arg) = message.args.first() else {
        warn!(address = %message.addr, "OSC update missing arguments");
        return None;
    };

    let record = match category {
        "status" => match i32::try_from(int_arg(arg)?) {
            Ok(value) => EventRecord::Status {
                composition: composition.to_string(),
                value,
            },
            Err(_) => {
                warn!(address = %message.addr, "status value out of i32 range");
                return None;
            }
        },
        "cuetime" => EventRecord::Cuetime {
            composition: composition.to_string(),
            seconds: float_arg(arg)?,
        },
        "cueframe" => EventRecord::Cueframe {
            composition: composition.to_string(),
            frame: int_arg(arg)?,
        },
        other => {
            debug!(address = %message.addr, category = other, "ignoring unknown event category");
            return None;
        }
    };

    Some(record)
}

/// Coerce an OSC argument to an integer; floats truncate.
fn int_arg(arg: &OscType) -> Option<i64> {
    match arg {
        OscType::Int(value) => Some(i64::from(*value)),
        OscType::Long(value) => Some(*value),
        OscType::Float(value) => Some(*value as i64),
        OscType::Double(value) => Some(*value as i64),
        other => {
            warn!(?other, "cannot coerce OSC argument to integer");
            None
        }
    }
}

fn float_arg(arg: &OscType) -> Option<f64> {
    match arg {
        OscType::Int(value) => Some(f64::from(*value)),
        OscType::Long(value) => Some(*value as f64),
        OscType::Float(value) => Some(f64::from(*value)),
        OscType::Double(value) => Some(*value),
        other => {
            warn!(?other, "cannot coerce OSC argument to float");
            None
        }
    }
}
