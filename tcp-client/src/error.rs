//! Error types for the TCP command client

use thiserror::Error;

/// Errors that can occur during a command/reply exchange with ExaPlay.
///
/// Every variant carries the command that produced it, for diagnostics at
/// the caller. Timeouts and connection failures are transient and eligible
/// for retry; protocol errors are surfaced immediately.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// No response within the configured time budget
    #[error("timeout waiting for ExaPlay reply to {command:?}")]
    Timeout {
        /// The command that timed out
        command: String,
    },

    /// Socket-level failure while connecting or exchanging data
    #[error("connection failure for {command:?}: {message}")]
    Connection {
        /// The command that was being sent
        command: String,
        /// Description of the underlying socket failure
        message: String,
    },

    /// Malformed reply bytes, or an explicit `ERR` reply from the device
    #[error("protocol error for {command:?}: {message}")]
    Protocol {
        /// The command that was being sent
        command: String,
        /// Description of the protocol violation
        message: String,
    },
}

impl ClientError {
    /// The command this error was raised for.
    pub fn command(&self) -> &str {
        match self {
            ClientError::Timeout { command }
            | ClientError::Connection { command, .. }
            | ClientError::Protocol { command, .. } => command,
        }
    }

    /// Whether the retry loop may attempt this command again.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ClientError::Protocol { .. })
    }
}

/// Errors from decoding a raw reply frame, independent of any transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The frame does not end with the CRLF reply terminator
    #[error("reply frame missing CRLF terminator")]
    MissingTerminator,

    /// The frame is not valid UTF-8
    #[error("invalid UTF-8 in reply frame")]
    InvalidUtf8,
}
