//! Configuration for the event hub and ingest.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Configuration for the broadcast hub.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Maximum in-flight events buffered per listener; events beyond this
    /// are dropped for that listener only
    pub queue_capacity: usize,
    /// Idle interval after which a listener receives a keepalive frame
    pub keepalive: Duration,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 100,
            keepalive: Duration::from_secs(30),
        }
    }
}

/// Configuration for the OSC event ingest.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Whether live event ingest is enabled at all
    pub enabled: bool,
    /// UDP address to listen on for OSC datagrams
    pub listen_addr: SocketAddr,
    /// First address segment ExaPlay publishes events under
    /// (e.g. `exaplay` for `/exaplay/status/comp1`)
    pub address_prefix: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8000)),
            address_prefix: "exaplay".to_string(),
        }
    }
}
