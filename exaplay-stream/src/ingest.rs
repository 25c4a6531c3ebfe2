//! OSC-over-UDP event ingest.
//!
//! The ingest owns the UDP socket and pushes every decodable event into an
//! [`EventHub`]. It is modelled as a capability behind [`EventIngest`] so
//! deployments without the OSC feed can run the same wiring with
//! [`DisabledIngest`] instead of a live socket.

use std::net::SocketAddr;

use async_trait::async_trait;
use rosc::{decoder, OscPacket};
use tokio::net::UdpSocket;
use tracing::{debug, info, trace, warn};

use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::event::decode_event;
use crate::hub::EventHub;
use crate::Result;

/// Source of live device events.
#[async_trait]
pub trait EventIngest: Send {
    /// The bound listen address, if this ingest reads from a socket.
    ///
    /// Useful when binding port 0 and the embedding application needs the
    /// real port.
    fn local_addr(&self) -> Option<SocketAddr> {
        None
    }

    /// Consume the ingest and pump events into the hub until shutdown.
    async fn run(self: Box<Self>, hub: EventHub) -> Result<()>;
}

/// Live ingest reading OSC datagrams from a bound UDP socket.
#[derive(Debug)]
pub struct OscIngest {
    socket: UdpSocket,
    prefix: String,
}

impl OscIngest {
    /// Bind the listen socket up front so that configuration problems
    /// (port in use, bad address) surface at startup rather than from
    /// inside the receive loop.
    pub async fn bind(config: &IngestConfig) -> Result<Self> {
        let socket = UdpSocket::bind(config.listen_addr)
            .await
            .map_err(|source| IngestError::Bind {
                addr: config.listen_addr,
                source,
            })?;
        info!(addr = %config.listen_addr, prefix = %config.address_prefix, "OSC ingest listening");
        Ok(Self {
            socket,
            prefix: config.address_prefix.clone(),
        })
    }

    fn dispatch_packet(&self, packet: OscPacket, hub: &EventHub) {
        match packet {
            OscPacket::Message(message) => {
                if let Some(event) = decode_event(&self.prefix, &message) {
                    trace!(kind = ?event.kind(), composition = %event.composition(), "publishing event");
                    hub.publish(&event);
                }
            }
            OscPacket::Bundle(bundle) => {
                for inner in bundle.content {
                    self.dispatch_packet(inner, hub);
                }
            }
        }
    }
}

#[async_trait]
impl EventIngest for OscIngest {
    fn local_addr(&self) -> Option<SocketAddr> {
        self.socket.local_addr().ok()
    }

    async fn run(self: Box<Self>, hub: EventHub) -> Result<()> {
        let mut buf = vec![0u8; decoder::MTU];
        loop {
            let (len, peer) = match self.socket.recv_from(&mut buf).await {
                Ok(received) => received,
                Err(error) => {
                    // Transient receive errors must not kill the loop.
                    warn!(%error, "error receiving OSC datagram");
                    continue;
                }
            };

            match decoder::decode_udp(&buf[..len]) {
                Ok((_, packet)) => self.dispatch_packet(packet, &hub),
                Err(error) => {
                    debug!(%peer, ?error, "ignoring undecodable OSC datagram");
                }
            }
        }
    }
}

/// No-op ingest for deployments without the OSC feed.
///
/// Completes immediately; the hub stays usable for manually published
/// events and keepalives.
pub struct DisabledIngest;

#[async_trait]
impl EventIngest for DisabledIngest {
    async fn run(self: Box<Self>, _hub: EventHub) -> Result<()> {
        debug!("event ingest disabled, not listening for OSC updates");
        Ok(())
    }
}

/// Build the ingest matching the configuration.
pub async fn build_ingest(config: &IngestConfig) -> Result<Box<dyn EventIngest>> {
    if config.enabled {
        Ok(Box::new(OscIngest::bind(config).await?))
    } else {
        Ok(Box::new(DisabledIngest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, SocketAddr};

    fn loopback_config() -> IngestConfig {
        IngestConfig {
            enabled: true,
            listen_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 0)),
            address_prefix: "exaplay".to_string(),
        }
    }

    #[tokio::test]
    async fn test_bind_reports_local_addr() {
        let ingest = OscIngest::bind(&loopback_config()).await.unwrap();
        let addr = ingest.local_addr().unwrap();
        assert_ne!(addr.port(), 0);
    }

    #[tokio::test]
    async fn test_bind_failure_surfaces_address() {
        let first = OscIngest::bind(&loopback_config()).await.unwrap();
        let taken = first.local_addr().unwrap();

        let config = IngestConfig {
            listen_addr: taken,
            ..loopback_config()
        };
        let error = OscIngest::bind(&config).await.unwrap_err();
        assert!(error.to_string().contains(&taken.to_string()));
    }

    #[tokio::test]
    async fn test_build_ingest_disabled_completes_immediately() {
        let config = IngestConfig::default();
        assert!(!config.enabled);
        let ingest = build_ingest(&config).await.unwrap();
        let hub = EventHub::new(crate::HubConfig::default());
        ingest.run(hub).await.unwrap();
    }
}
