//! Fan-out of stamped events to push clients.
//!
//! Every WebSocket and SSE connection holds its own receiver on the bus.
//! Polling clients never touch it; they read the [`super::EventLog`].

use tokio::sync::broadcast;

use super::RelayEvent;

/// Cloneable handle on a `tokio::broadcast` channel of [`RelayEvent`]s.
///
/// A receiver that falls more than `capacity` events behind loses the
/// oldest ones and sees `RecvError::Lagged` on its next read.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<RelayEvent>,
}

impl EventBus {
    /// Creates a bus buffering at most `capacity` events per receiver.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Sends `event` to every current receiver and returns how many there
    /// were. With no push clients connected the event only lives in the log.
    pub fn publish(&self, event: RelayEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Receiver for events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RelayEvent> {
        self.sender.subscribe()
    }

    /// Number of connected push clients.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
