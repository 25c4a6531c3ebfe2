//! Error types for the exaplay-stream crate.

use std::net::SocketAddr;

use thiserror::Error;

/// Errors from the event ingest transport.
///
/// Malformed or unmatched inbound traffic is deliberately *not* an error;
/// it is logged and skipped so that stray datagrams can never take the
/// ingest loop down. Only failures to establish the transport surface here.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Failed to bind the UDP listen socket
    #[error("failed to bind OSC listen socket on {addr}: {source}")]
    Bind {
        /// The address that could not be bound
        addr: SocketAddr,
        /// The underlying socket error
        #[source]
        source: std::io::Error,
    },
}
