//! Type-safe ExaPlay API
//!
//! Builds wire commands for the ExaPlay text protocol, maps the device's
//! terse comma-separated replies into validated typed records, and exposes
//! a high-level controller over the TCP command client.
//!
//! The device protocol is CSV-over-text-lines: a status query reply looks
//! like `1,15.65,939,2,300.0` (state, time, frame, clipIndex, duration),
//! volume replies are a bare integer, and any reply starting with `ERR`
//! signals a device-level failure.

pub mod commands;
mod controller;
mod error;
pub mod mapper;
mod models;

pub use controller::ExaPlayController;
pub use error::{ApiError, MappingError};
pub use models::{CommandReply, CompositionStatus, PlaybackState};

/// Convenience type alias for Results using ApiError.
pub type Result<T> = std::result::Result<T, ApiError>;
