//! High-level controller for ExaPlay operations.

use tracing::{info, warn};

use tcp_client::{ClientConfig, ExaPlayClient};

use crate::commands;
use crate::mapper;
use crate::models::{CommandReply, CompositionStatus};
use crate::Result;

/// High-level controller over the raw command client.
///
/// Control verbs (play/pause/stop and the setters) return the sent command
/// together with ExaPlay's raw reply; structured queries run the reply
/// through the response mapper.
pub struct ExaPlayController {
    client: ExaPlayClient,
}

impl ExaPlayController {
    /// Create a controller with the real TCP transport.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: ExaPlayClient::new(config),
        }
    }

    /// Create a controller over an existing client.
    ///
    /// Used by tests to inject a client with a scripted transport.
    pub fn with_client(client: ExaPlayClient) -> Self {
        Self { client }
    }

    /// Get access to the underlying command client for raw operations.
    pub fn client(&self) -> &ExaPlayClient {
        &self.client
    }

    /// Start playback of a composition.
    pub async fn play(&self, composition: &str) -> Result<CommandReply> {
        self.exchange(commands::play(composition)).await
    }

    /// Pause playback of a composition.
    pub async fn pause(&self, composition: &str) -> Result<CommandReply> {
        self.exchange(commands::pause(composition)).await
    }

    /// Stop playback of a composition.
    pub async fn stop(&self, composition: &str) -> Result<CommandReply> {
        self.exchange(commands::stop(composition)).await
    }

    /// Seek a timeline composition to a time in seconds.
    pub async fn set_cuetime(&self, composition: &str, seconds: f64) -> Result<CommandReply> {
        self.exchange(commands::set_cuetime(composition, seconds)).await
    }

    /// Jump to a cue (timeline) or clip (cuelist, 1-based index).
    pub async fn set_cue(&self, composition: &str, index: u32) -> Result<CommandReply> {
        self.exchange(commands::set_cue(composition, index)).await
    }

    /// Set composition volume (0-100).
    pub async fn set_volume(&self, composition: &str, value: u8) -> Result<CommandReply> {
        self.exchange(commands::set_volume(composition, value)).await
    }

    /// Query the ExaPlay version string.
    pub async fn version(&self) -> Result<String> {
        let reply = self.client.send_command(&commands::version()).await?;
        Ok(mapper::parse_version(&reply)?)
    }

    /// Query normalized composition status.
    pub async fn status(&self, composition: &str) -> Result<CompositionStatus> {
        let reply = self.client.send_command(&commands::status(composition)).await?;
        Ok(mapper::parse_status(&reply)?)
    }

    /// Query composition volume (0-100).
    pub async fn volume(&self, composition: &str) -> Result<u8> {
        let reply = self.client.send_command(&commands::volume(composition)).await?;
        Ok(mapper::parse_volume(&reply)?)
    }

    /// Check whether ExaPlay is reachable and responding.
    ///
    /// Round-trips a version query; any failure (transport, protocol or
    /// mapping) reports unhealthy.
    pub async fn health_check(&self) -> bool {
        match self.version().await {
            Ok(version) => {
                info!(version, "connection test successful");
                true
            }
            Err(e) => {
                warn!(error = %e, "connection test failed");
                false
            }
        }
    }

    async fn exchange(&self, command: String) -> Result<CommandReply> {
        let reply = self.client.send_command(&command).await?;
        Ok(CommandReply {
            sent: command,
            reply,
        })
    }
}
