//! Command client with retry, backoff and caller serialization.

use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::error::ClientError;
use crate::transport::{CommandTransport, TcpTransport};
use crate::Result;

/// Connection parameters for [`ExaPlayClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// ExaPlay server hostname or IP
    pub host: String,
    /// ExaPlay TCP control port
    pub port: u16,
    /// Per-operation timeout (connect, write, read each get this budget)
    pub timeout: Duration,
    /// Maximum retry attempts after the initial one
    pub max_retries: u32,
    /// Base delay for exponential backoff between retries
    pub retry_backoff: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7000,
            timeout: Duration::from_secs(5),
            max_retries: 3,
            retry_backoff: Duration::from_secs(1),
        }
    }
}

/// Command client for the ExaPlay TCP control protocol.
///
/// Each command is one connection: the transport opens a fresh TCP session,
/// sends the command, reads the single-line reply and closes. Transient
/// failures (timeouts, connection failures) are retried with exponential
/// backoff up to `max_retries`; replies starting with `ERR` and malformed
/// frames are protocol errors and are never retried.
///
/// Concurrent callers are serialized through an internal lock so the device
/// sees at most one in-flight command at a time.
///
/// # Example
///
/// ```rust,ignore
/// use tcp_client::{ClientConfig, ExaPlayClient};
///
/// let client = ExaPlayClient::new(ClientConfig {
///     host: "192.168.1.174".to_string(),
///     ..ClientConfig::default()
/// });
/// let reply = client.send_command("play,comp1").await?;
/// ```
pub struct ExaPlayClient {
    transport: Box<dyn CommandTransport>,
    max_retries: u32,
    retry_backoff: Duration,
    /// Serializes concurrent callers onto the device one command at a time.
    command_lock: Mutex<()>,
}

impl ExaPlayClient {
    /// Create a client using the real TCP transport.
    pub fn new(config: ClientConfig) -> Self {
        let transport = TcpTransport::new(config.host.clone(), config.port, config.timeout);
        Self::with_transport(&config, Box::new(transport))
    }

    /// Create a client over a custom transport.
    ///
    /// Used by tests to inject scripted failures; the retry policy still
    /// comes from `config`.
    pub fn with_transport(config: &ClientConfig, transport: Box<dyn CommandTransport>) -> Self {
        Self {
            transport,
            max_retries: config.max_retries,
            retry_backoff: config.retry_backoff,
            command_lock: Mutex::new(()),
        }
    }

    /// Send a command and return ExaPlay's reply line.
    ///
    /// Holds the client-wide command lock for the whole attempt loop, so
    /// retries of one command are not interleaved with other commands.
    pub async fn send_command(&self, command: &str) -> Result<String> {
        let _guard = self.command_lock.lock().await;

        let mut attempt: u32 = 0;
        loop {
            match self.transport.exchange(command).await {
                Ok(reply) => {
                    // Device-level failure signal; surfaced immediately,
                    // never retried.
                    if reply.starts_with("ERR") {
                        return Err(ClientError::Protocol {
                            command: command.to_string(),
                            message: format!("ExaPlay returned error: {reply}"),
                        });
                    }

                    debug!(command, reply, attempt = attempt + 1, "command completed");
                    return Ok(reply);
                }
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let delay = self.retry_backoff * 2u32.saturating_pow(attempt);
                    warn!(
                        command,
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "command failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    if e.is_retryable() {
                        error!(
                            command,
                            attempts = attempt + 1,
                            error = %e,
                            "command failed after all retries"
                        );
                    }
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex as StdMutex};
    use std::time::Instant;

    use async_trait::async_trait;

    /// Transport that replays a scripted sequence of outcomes.
    struct ScriptedTransport {
        outcomes: StdMutex<VecDeque<Result<String>>>,
        attempts: Arc<AtomicUsize>,
    }

    impl ScriptedTransport {
        fn new(outcomes: Vec<Result<String>>) -> (Self, Arc<AtomicUsize>) {
            let attempts = Arc::new(AtomicUsize::new(0));
            let transport = Self {
                outcomes: StdMutex::new(outcomes.into_iter().collect()),
                attempts: Arc::clone(&attempts),
            };
            (transport, attempts)
        }
    }

    #[async_trait]
    impl CommandTransport for ScriptedTransport {
        async fn exchange(&self, command: &str) -> Result<String> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Err(ClientError::Connection {
                        command: command.to_string(),
                        message: "script exhausted".to_string(),
                    })
                })
        }
    }

    fn connection_failure(command: &str) -> ClientError {
        ClientError::Connection {
            command: command.to_string(),
            message: "connection refused".to_string(),
        }
    }

    fn test_config(max_retries: u32) -> ClientConfig {
        ClientConfig {
            max_retries,
            retry_backoff: Duration::from_millis(10),
            ..ClientConfig::default()
        }
    }

    #[tokio::test]
    async fn test_retries_transient_failures_with_backoff() {
        let (transport, attempts) = ScriptedTransport::new(vec![
            Err(connection_failure("get:ver")),
            Err(connection_failure("get:ver")),
            Ok("2.21.0.0".to_string()),
        ]);
        let client = ExaPlayClient::with_transport(&test_config(2), Box::new(transport));

        let started = Instant::now();
        let reply = client.send_command("get:ver").await.unwrap();
        let elapsed = started.elapsed();

        assert_eq!(reply, "2.21.0.0");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        // Backoff schedule: 10ms after the first failure, 20ms after the
        // second.
        assert!(elapsed >= Duration::from_millis(30), "elapsed: {elapsed:?}");
        assert!(elapsed < Duration::from_secs(1), "elapsed: {elapsed:?}");
    }

    #[tokio::test]
    async fn test_err_reply_uses_exactly_one_attempt() {
        let (transport, attempts) = ScriptedTransport::new(vec![
            Ok("ERR bad command".to_string()),
            Ok("should never be reached".to_string()),
        ]);
        let client = ExaPlayClient::with_transport(&test_config(2), Box::new(transport));

        let error = client.send_command("nonsense").await.unwrap_err();
        match error {
            ClientError::Protocol { command, message } => {
                assert_eq!(command, "nonsense");
                assert!(message.contains("ERR bad command"));
            }
            other => panic!("expected Protocol error, got {other:?}"),
        }
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhausted_retries_return_last_error() {
        let (transport, attempts) = ScriptedTransport::new(vec![
            Err(connection_failure("play,comp1")),
            Err(ClientError::Timeout {
                command: "play,comp1".to_string(),
            }),
        ]);
        let client = ExaPlayClient::with_transport(&test_config(1), Box::new(transport));

        let error = client.send_command("play,comp1").await.unwrap_err();
        assert!(matches!(error, ClientError::Timeout { .. }));
        assert_eq!(error.command(), "play,comp1");
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_retries_fails_on_first_transient_error() {
        let (transport, attempts) = ScriptedTransport::new(vec![Err(connection_failure("get:ver"))]);
        let client = ExaPlayClient::with_transport(&test_config(0), Box::new(transport));

        let error = client.send_command("get:ver").await.unwrap_err();
        assert!(matches!(error, ClientError::Connection { .. }));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
