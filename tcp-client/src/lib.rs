//! Private TCP client for the ExaPlay text-line protocol
//!
//! This crate provides a minimal command/reply client specifically designed
//! for talking to an ExaPlay media server. Commands are sent as UTF-8 text
//! lines terminated with CR (`\r`); replies arrive as single lines
//! terminated with CRLF (`\r\n`). One fresh TCP connection is opened per
//! command and closed afterwards, and transient failures are retried with
//! exponential backoff.

mod client;
pub mod codec;
mod error;
mod transport;

pub use client::{ClientConfig, ExaPlayClient};
pub use error::{ClientError, CodecError};
pub use transport::{CommandTransport, TcpTransport};

/// Convenience type alias for Results using ClientError.
pub type Result<T> = std::result::Result<T, ClientError>;
