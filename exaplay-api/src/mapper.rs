//! Response mapping for ExaPlay's CSV-based replies.
//!
//! Pure, deterministic conversions from validated reply strings into typed
//! records. Every failure is a [`MappingError`] that retains the untouched
//! original reply for diagnostics.

use tracing::warn;

use crate::error::MappingError;
use crate::models::{CompositionStatus, PlaybackState};

/// Parse a status reply into a normalized [`CompositionStatus`].
///
/// Status reply layout (CSV):
/// `state(0|1|2),time(s),frame,clipIndex(-1 if N/A),duration(s)`
///
/// Negative time/frame/duration values are accepted but logged; some
/// device firmwares produce them transiently.
pub fn parse_status(raw_response: &str) -> Result<CompositionStatus, MappingError> {
    let fields: Vec<&str> = raw_response.trim().split(',').collect();
    if fields.len() != 5 {
        return Err(MappingError::new(
            format!("expected 5 fields, got {}", fields.len()),
            raw_response,
        ));
    }

    let state_value = int_field(fields[0], "state", raw_response)?;
    let state = PlaybackState::from_wire(state_value).ok_or_else(|| {
        MappingError::new(
            format!("invalid state value: {state_value} (expected 0, 1, or 2)"),
            raw_response,
        )
    })?;

    let time = float_field(fields[1], "time", raw_response)?;
    let frame = int_field(fields[2], "frame", raw_response)?;
    let clip_index = int_field(fields[3], "clipIndex", raw_response)?;
    let duration = float_field(fields[4], "duration", raw_response)?;

    // Permissive on negative values, but make the quirk observable.
    if time < 0.0 {
        warn!(time, "negative time value in status reply");
    }
    if frame < 0 {
        warn!(frame, "negative frame value in status reply");
    }
    if duration < 0.0 {
        warn!(duration, "negative duration value in status reply");
    }

    Ok(CompositionStatus {
        state,
        time,
        frame,
        clip_index,
        duration,
    })
}

/// Parse a version reply into a version string.
///
/// ExaPlay typically replies with a bare version like `2.21.0.0`, but some
/// builds prefix it with `Version:` or `ver:`. The version format itself
/// is not contractually fixed, so beyond prefix stripping the string
/// passes through unchanged.
pub fn parse_version(raw_response: &str) -> Result<String, MappingError> {
    let version = raw_response.trim();
    if version.is_empty() {
        return Err(MappingError::new("empty version reply", raw_response));
    }

    let lowered = version.to_ascii_lowercase();
    let version = if lowered.starts_with("version:") {
        version["version:".len()..].trim()
    } else if lowered.starts_with("ver:") {
        version["ver:".len()..].trim()
    } else {
        version
    };

    Ok(version.to_string())
}

/// Parse a volume reply into a level in `[0, 100]`.
///
/// Handles prefixed forms like `Volume: 60` by taking the text after the
/// last `:`. Non-integer text and out-of-range values are mapping errors.
pub fn parse_volume(raw_response: &str) -> Result<u8, MappingError> {
    let mut value = raw_response.trim();
    if let Some(idx) = value.rfind(':') {
        value = value[idx + 1..].trim();
    }

    let volume: i64 = value.parse().map_err(|_| {
        MappingError::new(
            format!("failed to parse volume {value:?} as integer"),
            raw_response,
        )
    })?;

    if !(0..=100).contains(&volume) {
        return Err(MappingError::new(
            format!("volume {volume} out of valid range (0-100)"),
            raw_response,
        ));
    }

    Ok(volume as u8)
}

fn int_field(value: &str, field_name: &str, raw_response: &str) -> Result<i64, MappingError> {
    value.trim().parse().map_err(|_| {
        MappingError::new(
            format!("failed to parse {field_name} {:?} as integer", value.trim()),
            raw_response,
        )
    })
}

fn float_field(value: &str, field_name: &str, raw_response: &str) -> Result<f64, MappingError> {
    value.trim().parse().map_err(|_| {
        MappingError::new(
            format!("failed to parse {field_name} {:?} as float", value.trim()),
            raw_response,
        )
    })
}
