//! Broadcast hub fanning decoded events out to subscribed listeners.
//!
//! The hub keeps an arena of listener queues indexed by a stable id.
//! Publishing is non-blocking: each listener gets an independent bounded
//! queue, a full queue drops the event for that listener only, and a
//! disconnected listener is pruned after the fan-out pass. There are no
//! references from listener consumption back into the hub beyond a weak
//! handle used for cleanup, so hub and listeners never form a cycle.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use crate::config::HubConfig;
use crate::event::EventRecord;

/// Unique identifier for a hub subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// One frame delivered to a subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryFrame {
    /// A decoded device event
    Event(EventRecord),
    /// No event arrived within the keepalive interval; the consumer
    /// should treat this as a liveness signal, not data
    Keepalive,
    /// The hub is gone; no further events will ever arrive
    Closed,
}

struct HubInner {
    listeners: RwLock<HashMap<ListenerId, mpsc::Sender<EventRecord>>>,
    next_id: AtomicU64,
    config: HubConfig,
}

impl HubInner {
    fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        listeners.remove(&id).is_some()
    }
}

/// Fan-out hub for live device events.
///
/// Clone handles freely; all clones share the same listener set. Dropping
/// the last hub handle closes every listener's queue, which surfaces as
/// [`DeliveryFrame::Closed`] on their next poll.
#[derive(Clone)]
pub struct EventHub {
    inner: Arc<HubInner>,
}

impl EventHub {
    /// Create a hub with the given configuration.
    pub fn new(config: HubConfig) -> Self {
        Self {
            inner: Arc::new(HubInner {
                listeners: RwLock::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                config,
            }),
        }
    }

    /// Register a new listener and return its consumption handle.
    ///
    /// The listener owns a fresh bounded queue; its id is unique for the
    /// lifetime of the hub, so the listener set can never hold two entries
    /// for the same subscription.
    pub fn subscribe(&self) -> Listener {
        let (tx, rx) = mpsc::channel(self.inner.config.queue_capacity);
        let id = ListenerId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));

        let total = {
            let mut listeners = self
                .inner
                .listeners
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            listeners.insert(id, tx);
            listeners.len()
        };
        debug!(%id, total_listeners = total, "listener subscribed");

        Listener {
            id,
            rx,
            keepalive: self.inner.config.keepalive,
            hub: Arc::downgrade(&self.inner),
        }
    }

    /// Remove a listener from the set.
    ///
    /// Idempotent: unsubscribing an id that is no longer registered is a
    /// no-op. Dropping a [`Listener`] unsubscribes it implicitly.
    pub fn unsubscribe(&self, id: ListenerId) {
        if self.inner.remove(id) {
            debug!(%id, "listener unsubscribed");
        }
    }

    /// Deliver an event to every currently registered listener.
    ///
    /// Never blocks and never fails for the publisher: a listener with a
    /// full queue misses this event (slow-consumer isolation), and
    /// listeners whose consumer is gone are pruned after the pass.
    pub fn publish(&self, event: &EventRecord) {
        let senders: Vec<(ListenerId, mpsc::Sender<EventRecord>)> = {
            let listeners = self
                .inner
                .listeners
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            listeners
                .iter()
                .map(|(id, tx)| (*id, tx.clone()))
                .collect()
        };

        if senders.is_empty() {
            trace!("no listeners subscribed, skipping broadcast");
            return;
        }

        let mut disconnected = Vec::new();
        for (id, tx) in senders {
            match tx.try_send(event.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    warn!(%id, kind = ?event.kind(), "listener queue full, dropping event");
                }
                Err(TrySendError::Closed(_)) => disconnected.push(id),
            }
        }

        // Prune after the fan-out pass so one dead listener cannot delay
        // delivery to the others.
        for id in disconnected {
            if self.inner.remove(id) {
                debug!(%id, "removed disconnected listener");
            }
        }
    }

    /// Number of currently registered listeners.
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .listeners
            .read()
            .map(|listeners| listeners.len())
            .unwrap_or_default()
    }
}

/// Consumption handle for one subscription.
///
/// Owns the receiving end of the listener's bounded queue. Dropping the
/// handle deterministically releases the subscription, including on abrupt
/// consumer disconnect.
pub struct Listener {
    id: ListenerId,
    rx: mpsc::Receiver<EventRecord>,
    keepalive: Duration,
    hub: Weak<HubInner>,
}

impl Listener {
    /// This subscription's stable identifier.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Await the next delivery frame.
    ///
    /// Yields the next queued event in publish order, a
    /// [`DeliveryFrame::Keepalive`] if nothing arrives within the
    /// keepalive interval, or [`DeliveryFrame::Closed`] once the hub is
    /// gone. Safe to call in a loop forever; cancellation-safe.
    pub async fn next_frame(&mut self) -> DeliveryFrame {
        match timeout(self.keepalive, self.rx.recv()).await {
            Ok(Some(event)) => DeliveryFrame::Event(event),
            Ok(None) => DeliveryFrame::Closed,
            Err(_) => DeliveryFrame::Keepalive,
        }
    }

    /// Take the next already-queued event without waiting.
    pub fn try_next(&mut self) -> Option<EventRecord> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            if hub.remove(self.id) {
                debug!(id = %self.id, "listener dropped, unsubscribed");
            }
        }
    }
}
