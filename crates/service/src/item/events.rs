//! In-process change notifications backed by a `tokio::sync::broadcast`
//! channel.
//!
//! The service publishes an [`ItemEvent`] per affected record so a live UI
//! layer can subscribe and refetch instead of polling. Delivery latency is
//! not contractual and lagging receivers simply miss events.

use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemAction {
    Created,
    Updated,
    Deleted,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemEvent {
    pub action: ItemAction,
    pub id: Uuid,
    /// Epoch milliseconds of the write that produced the event.
    pub at: i64,
}

/// Fan-out hub for item change events. Shared via the owning service.
pub struct ItemEvents {
    tx: broadcast::Sender<ItemEvent>,
}

impl ItemEvents {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ItemEvent> {
        self.tx.subscribe()
    }

    /// Publish an event. Having no subscribers is fine.
    pub fn publish(&self, event: ItemEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for ItemEvents {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
