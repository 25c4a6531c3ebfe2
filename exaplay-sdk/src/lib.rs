//! # ExaPlay SDK
//!
//! High-level entry point for controlling ExaPlay media servers.
//!
//! ```rust,no_run
//! use exaplay_sdk::{ExaPlaySystem, SystemConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), exaplay_sdk::SystemError> {
//!     let system = ExaPlaySystem::start(SystemConfig::default()).await?;
//!
//!     // Command path: send control commands, read typed state.
//!     system.controller().play("comp1").await?;
//!     let status = system.controller().status("comp1").await?;
//!     println!("playing at {}s", status.time);
//!
//!     // Event path: subscribe to live OSC updates.
//!     let mut listener = system.subscribe();
//!     loop {
//!         match listener.next_frame().await {
//!             exaplay_sdk::DeliveryFrame::Event(event) => println!("{event:?}"),
//!             exaplay_sdk::DeliveryFrame::Keepalive => continue,
//!             exaplay_sdk::DeliveryFrame::Closed => break,
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! exaplay-sdk (system wiring + logging)
//!     ↓                     ↓
//! exaplay-api          exaplay-stream
//! (typed commands)     (OSC ingest + broadcast hub)
//!     ↓
//! tcp-client (framed TCP exchange with retry)
//! ```

pub use system::{ExaPlaySystem, SystemConfig, SystemError};

pub use exaplay_api::{
    ApiError, CommandReply, CompositionStatus, ExaPlayController, MappingError, PlaybackState,
};
pub use exaplay_stream::{
    DeliveryFrame, EventHub, EventKind, EventRecord, HubConfig, IngestConfig, Listener, ListenerId,
};
pub use tcp_client::{ClientConfig, ClientError};

pub mod logging;
mod system;
