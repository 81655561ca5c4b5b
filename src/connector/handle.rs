//! Caller-owned handles to an established connection.

use tokio::sync::watch;

use crate::transport::{PollingHandle, Transport};

/// Handle to a push transport (WebSocket or SSE) driver.
///
/// Dropping it closes the connection as well.
#[derive(Debug)]
pub struct StreamHandle {
    shutdown: watch::Sender<bool>,
}

impl StreamHandle {
    pub(crate) const fn new(shutdown: watch::Sender<bool>) -> Self {
        Self { shutdown }
    }

    /// Asks the driver to close the native connection. Safe to call any
    /// number of times.
    pub fn close(&self) {
        if !self.shutdown.send_replace(true) {
            tracing::debug!("stream close requested");
        }
    }

    /// `true` once [`StreamHandle::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        *self.shutdown.borrow()
    }
}

/// A live realtime channel, tagged with the transport that carries it.
///
/// Exclusively owned by the caller that requested it.
#[derive(Debug)]
pub enum ConnectionHandle {
    /// Connected over WebSocket.
    WebSocket(StreamHandle),
    /// Connected over Server-Sent Events.
    Sse(StreamHandle),
    /// Connected over HTTP polling.
    Polling(PollingHandle),
}

impl ConnectionHandle {
    /// Transport carrying this connection.
    #[must_use]
    pub const fn transport(&self) -> Transport {
        match self {
            Self::WebSocket(_) => Transport::WebSocket,
            Self::Sse(_) => Transport::Sse,
            Self::Polling(_) => Transport::Polling,
        }
    }

    /// Tears down the active transport. Idempotent and infallible.
    pub fn close(&self) {
        match self {
            Self::WebSocket(handle) | Self::Sse(handle) => handle.close(),
            Self::Polling(handle) => handle.close(),
        }
    }

    /// `true` once [`ConnectionHandle::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match self {
            Self::WebSocket(handle) | Self::Sse(handle) => handle.is_closed(),
            Self::Polling(handle) => handle.is_closed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_close_is_idempotent() {
        let (tx, rx) = watch::channel(false);
        let handle = ConnectionHandle::Sse(StreamHandle::new(tx));
        assert!(!handle.is_closed());
        handle.close();
        handle.close();
        assert!(handle.is_closed());
        assert!(*rx.borrow());
    }

    #[test]
    fn close_without_live_driver_does_not_panic() {
        let (tx, rx) = watch::channel(false);
        drop(rx);
        let handle = ConnectionHandle::WebSocket(StreamHandle::new(tx));
        handle.close();
        handle.close();
        assert_eq!(handle.transport(), Transport::WebSocket);
    }
}
