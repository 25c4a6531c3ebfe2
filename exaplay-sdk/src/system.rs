//! ExaPlaySystem - main entry point wiring the command and event paths.

use std::net::SocketAddr;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use exaplay_api::ExaPlayController;
use exaplay_stream::{
    build_ingest, EventHub, EventIngest, HubConfig, IngestConfig, IngestError, Listener,
};
use tcp_client::ClientConfig;

/// Top-level configuration for an [`ExaPlaySystem`].
#[derive(Debug, Clone, Default)]
pub struct SystemConfig {
    /// TCP command connection settings
    pub client: ClientConfig,
    /// Broadcast hub settings
    pub hub: HubConfig,
    /// OSC event ingest settings (disabled by default)
    pub ingest: IngestConfig,
}

/// Errors from system startup.
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    /// The event ingest could not be established
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

/// Owns the command controller, the event hub, and the background ingest
/// task.
///
/// Dropping the system aborts the ingest task; listeners observe
/// [`exaplay_stream::DeliveryFrame::Closed`] once the hub itself is gone.
pub struct ExaPlaySystem {
    controller: ExaPlayController,
    hub: EventHub,
    ingest_addr: Option<SocketAddr>,
    ingest_task: Option<JoinHandle<()>>,
}

impl ExaPlaySystem {
    /// Start the system: build the command client, create the hub, and
    /// spawn the event ingest if enabled.
    ///
    /// Binding the ingest socket happens here, so a misconfigured listen
    /// address fails fast instead of silently dropping events later.
    pub async fn start(config: SystemConfig) -> Result<Self, SystemError> {
        let controller = ExaPlayController::new(config.client.clone());
        let hub = EventHub::new(config.hub);

        let ingest = build_ingest(&config.ingest).await?;
        let ingest_addr = ingest.local_addr();
        let ingest_task = {
            let hub = hub.clone();
            tokio::spawn(async move {
                if let Err(err) = ingest.run(hub).await {
                    error!(%err, "event ingest terminated");
                }
            })
        };

        info!(
            host = %config.client.host,
            port = config.client.port,
            ingest_enabled = config.ingest.enabled,
            "ExaPlay system started"
        );

        Ok(Self {
            controller,
            hub,
            ingest_addr,
            ingest_task: Some(ingest_task),
        })
    }

    /// The bound OSC listen address, when ingest is enabled.
    ///
    /// Carries the real port when the configuration asked for port 0.
    pub fn ingest_addr(&self) -> Option<SocketAddr> {
        self.ingest_addr
    }

    /// The typed command controller.
    pub fn controller(&self) -> &ExaPlayController {
        &self.controller
    }

    /// The broadcast hub, for publishing or inspection.
    pub fn hub(&self) -> &EventHub {
        &self.hub
    }

    /// Subscribe a new listener to live device events.
    pub fn subscribe(&self) -> Listener {
        self.hub.subscribe()
    }

    /// Probe device reachability via a version round-trip.
    pub async fn health_check(&self) -> bool {
        self.controller.health_check().await
    }

    /// Stop the background ingest. Idempotent; also invoked on drop.
    pub fn shutdown(&mut self) {
        if let Some(task) = self.ingest_task.take() {
            task.abort();
            debug!("event ingest stopped");
        }
    }
}

impl Drop for ExaPlaySystem {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exaplay_stream::DeliveryFrame;
    use std::time::Duration;

    #[tokio::test]
    async fn test_start_with_ingest_disabled() {
        let system = ExaPlaySystem::start(SystemConfig::default()).await.unwrap();
        assert_eq!(system.hub().subscriber_count(), 0);
        assert!(system.ingest_addr().is_none());

        let mut listener = system.subscribe();
        assert_eq!(system.hub().subscriber_count(), 1);

        system.hub().publish(&exaplay_stream::EventRecord::Status {
            composition: "comp1".to_string(),
            value: 1,
        });
        assert_eq!(
            listener.next_frame().await,
            DeliveryFrame::Event(exaplay_stream::EventRecord::Status {
                composition: "comp1".to_string(),
                value: 1,
            })
        );
    }

    #[tokio::test]
    async fn test_shutdown_is_idempotent() {
        let mut system = ExaPlaySystem::start(SystemConfig::default()).await.unwrap();
        system.shutdown();
        system.shutdown();
    }

    #[tokio::test]
    async fn test_listener_sees_closed_after_system_dropped() {
        let system = ExaPlaySystem::start(SystemConfig {
            hub: exaplay_stream::HubConfig {
                queue_capacity: 4,
                keepalive: Duration::from_millis(50),
            },
            ..SystemConfig::default()
        })
        .await
        .unwrap();

        let mut listener = system.subscribe();
        drop(system);

        // Ingest task teardown is asynchronous, so allow keepalives while
        // the last hub handle unwinds.
        for _ in 0..50 {
            match listener.next_frame().await {
                DeliveryFrame::Closed => return,
                DeliveryFrame::Keepalive => continue,
                DeliveryFrame::Event(event) => panic!("unexpected event: {event:?}"),
            }
        }
        panic!("listener never observed hub close");
    }
}
