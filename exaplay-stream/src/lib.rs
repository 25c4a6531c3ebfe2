//! Live event ingest and broadcast for ExaPlay
//!
//! ExaPlay optionally publishes real-time playback updates as OSC messages
//! over UDP. This crate listens for those messages, decodes the known
//! address shapes into typed [`EventRecord`]s, and fans them out to any
//! number of subscribed listeners with bounded, independent backpressure
//! and periodic keepalives.
//!
//! The ingest transport is a capability: deployments without the OSC feed
//! construct the [`ingest::DisabledIngest`] no-op instead of the UDP
//! listener.

mod config;
mod error;
mod event;
mod hub;
pub mod ingest;

pub use config::{HubConfig, IngestConfig};
pub use error::IngestError;
pub use event::{decode_event, EventKind, EventRecord};
pub use hub::{DeliveryFrame, EventHub, Listener, ListenerId};
pub use ingest::{build_ingest, DisabledIngest, EventIngest, OscIngest};

/// Convenience type alias for Results using IngestError.
pub type Result<T> = std::result::Result<T, IngestError>;
