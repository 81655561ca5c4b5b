//! Negotiation state machine.
//!
//! Transitions are pure functions of the current state, the configured
//! endpoints and the environment verdict, so the fallback order can be
//! tested without any I/O.

use super::options::Endpoints;
use crate::transport::Transport;

/// Where one negotiation stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectState {
    /// Nothing attempted yet.
    Start,
    /// Waiting on the WebSocket handshake.
    TryingWebSocket,
    /// Waiting on the SSE response.
    TryingSse,
    /// Starting the polling loop.
    TryingPolling,
    /// A transport opened; terminal.
    Connected(Transport),
    /// Every configured transport failed or none was configured; terminal.
    Exhausted,
}

impl ConnectState {
    /// Leaves `Start`. WebSocket is chosen only when it has a URL and the
    /// environment is safe. Other states are returned unchanged.
    #[must_use]
    pub fn begin(self, endpoints: &Endpoints, websocket_safe: bool) -> Self {
        match self {
            Self::Start if websocket_safe && endpoints.has(Transport::WebSocket) => {
                Self::TryingWebSocket
            }
            Self::Start => Self::after_websocket(endpoints),
            other => other,
        }
    }

    /// The transport under attempt succeeded.
    #[must_use]
    pub const fn on_open(self) -> Self {
        match self.trying() {
            Some(transport) => Self::Connected(transport),
            None => self,
        }
    }

    /// The transport under attempt failed or timed out.
    #[must_use]
    pub fn on_failure(self, endpoints: &Endpoints) -> Self {
        match self {
            Self::TryingWebSocket => Self::after_websocket(endpoints),
            Self::TryingSse => Self::after_sse(endpoints),
            Self::TryingPolling => Self::Exhausted,
            other => other,
        }
    }

    /// Transport being attempted, if any.
    #[must_use]
    pub const fn trying(&self) -> Option<Transport> {
        match self {
            Self::TryingWebSocket => Some(Transport::WebSocket),
            Self::TryingSse => Some(Transport::Sse),
            Self::TryingPolling => Some(Transport::Polling),
            Self::Start | Self::Connected(_) | Self::Exhausted => None,
        }
    }

    fn after_websocket(endpoints: &Endpoints) -> Self {
        if endpoints.has(Transport::Sse) {
            Self::TryingSse
        } else {
            Self::after_sse(endpoints)
        }
    }

    fn after_sse(endpoints: &Endpoints) -> Self {
        if endpoints.has(Transport::Polling) {
            Self::TryingPolling
        } else {
            Self::Exhausted
        }
    }
}
