//! Transport seam for the command client.
//!
//! `CommandTransport` covers exactly one command/reply exchange so the
//! retry loop in [`crate::ExaPlayClient`] stays independent of the socket
//! plumbing, and tests can substitute a scripted transport for the real
//! TCP one.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use crate::codec;
use crate::error::ClientError;

/// A single command/reply exchange against the device.
///
/// Implementations own the full connection lifecycle for one command:
/// open, send, receive, close. Connections are never reused across
/// commands.
#[async_trait]
pub trait CommandTransport: Send + Sync {
    /// Send one command and return the decoded reply line.
    async fn exchange(&self, command: &str) -> Result<String, ClientError>;
}

/// Production transport: one fresh TCP connection per command.
///
/// Connect, write+flush and read-until-terminator each run under the same
/// per-operation timeout budget. The connection is closed unconditionally
/// before returning, on success and on error alike.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpTransport {
    /// Create a transport targeting `host:port` with the given
    /// per-operation timeout.
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    async fn connect(&self, command: &str) -> Result<TcpStream, ClientError> {
        debug!(host = %self.host, port = self.port, "connecting to ExaPlay");

        match timeout(self.timeout, TcpStream::connect((self.host.as_str(), self.port))).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(ClientError::Connection {
                command: command.to_string(),
                message: format!("failed to connect to {}:{}: {e}", self.host, self.port),
            }),
            Err(_) => Err(ClientError::Timeout {
                command: command.to_string(),
            }),
        }
    }

    async fn exchange_on(
        &self,
        stream: &mut TcpStream,
        command: &str,
    ) -> Result<String, ClientError> {
        let frame = codec::encode_command(command);

        match timeout(self.timeout, write_frame(stream, &frame)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(ClientError::Connection {
                    command: command.to_string(),
                    message: format!("write failed: {e}"),
                })
            }
            Err(_) => {
                return Err(ClientError::Timeout {
                    command: command.to_string(),
                })
            }
        }

        let raw = match timeout(self.timeout, read_until_terminator(stream)).await {
            Ok(Ok(frame)) => frame,
            Ok(Err(e)) => {
                return Err(ClientError::Connection {
                    command: command.to_string(),
                    message: format!("read failed: {e}"),
                })
            }
            Err(_) => {
                return Err(ClientError::Timeout {
                    command: command.to_string(),
                })
            }
        };

        codec::decode_reply(&raw).map_err(|e| ClientError::Protocol {
            command: command.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl CommandTransport for TcpTransport {
    async fn exchange(&self, command: &str) -> Result<String, ClientError> {
        let mut stream = self.connect(command).await?;
        let result = self.exchange_on(&mut stream, command).await;

        // The connection is scoped to this one exchange; close it before
        // returning or retrying. Dropping the stream closes the socket
        // even if the graceful shutdown fails.
        if let Err(e) = stream.shutdown().await {
            debug!(error = %e, "error closing connection");
        }

        result
    }
}

async fn write_frame(stream: &mut TcpStream, frame: &[u8]) -> std::io::Result<()> {
    stream.write_all(frame).await?;
    stream.flush().await
}

/// Read bytes until the CRLF reply terminator, returning the full frame
/// including the terminator.
async fn read_until_terminator(stream: &mut TcpStream) -> std::io::Result<Vec<u8>> {
    let mut frame = Vec::with_capacity(64);
    let mut chunk = [0u8; 256];

    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "connection closed before reply terminator",
            ));
        }
        frame.extend_from_slice(&chunk[..n]);

        if let Some(pos) = frame
            .windows(codec::REPLY_TERMINATOR.len())
            .position(|w| w == codec::REPLY_TERMINATOR)
        {
            frame.truncate(pos + codec::REPLY_TERMINATOR.len());
            return Ok(frame);
        }
    }
}
