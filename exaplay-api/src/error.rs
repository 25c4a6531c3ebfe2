//! Error types for the typed ExaPlay API

use thiserror::Error;

/// A reply that was well-formed at the transport level but semantically
/// invalid for the requested structured type.
///
/// Always retains the untouched original reply for diagnostics. Mapping
/// errors are never retried; the reply was received fine, the device just
/// said something we cannot interpret.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (raw reply: {raw_response:?})")]
pub struct MappingError {
    /// What was wrong with the reply
    pub message: String,
    /// The untouched reply as received from the device
    pub raw_response: String,
}

impl MappingError {
    /// Create a mapping error, capturing the raw reply.
    pub fn new(message: impl Into<String>, raw_response: &str) -> Self {
        Self {
            message: message.into(),
            raw_response: raw_response.to_string(),
        }
    }
}

/// Errors surfaced by the high-level controller.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport or protocol failure from the command client
    #[error(transparent)]
    Client(#[from] tcp_client::ClientError),

    /// The reply could not be mapped to the requested typed record
    #[error(transparent)]
    Mapping(#[from] MappingError),
}
