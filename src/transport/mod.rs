//! Transport layer: WebSocket, Server-Sent Events and HTTP polling drivers.
//!
//! Push transports (WebSocket, SSE) run as spawned driver tasks that report
//! [`TransportEvent`]s over an `mpsc` channel and stop when their shutdown
//! `watch` flips. Polling runs its own fixed-delay loop and calls the
//! callbacks directly.

pub mod callbacks;
pub mod event;
pub mod polling;
pub mod race;
pub mod sse;
pub mod sse_parser;
pub mod watermark;
pub mod websocket;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use callbacks::Callbacks;
pub use event::{RealtimeEvent, TransportEvent};
pub use polling::{PollBatch, PollingHandle};
pub use watermark::Watermark;

/// One of the three delivery mechanisms, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    /// Persistent WebSocket.
    #[serde(rename = "websocket")]
    WebSocket,
    /// Server-Sent Events stream.
    Sse,
    /// HTTP polling loop.
    Polling,
}

impl Transport {
    /// Returns the transport name as a static string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WebSocket => "websocket",
            Self::Sse => "sse",
            Self::Polling => "polling",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_wire_name() {
        for transport in [Transport::WebSocket, Transport::Sse, Transport::Polling] {
            let json = serde_json::to_string(&transport).unwrap_or_default();
            assert_eq!(json, format!("\"{transport}\""));
        }
    }
}
