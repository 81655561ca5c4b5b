//! Realtime connector: negotiates a channel over the best transport the
//! environment supports and returns a uniform [`ConnectionHandle`].
//!
//! ```text
//! Start ──► TryingWebSocket ──► TryingSse ──► TryingPolling ──► Connected(polling)
//!               │  (unsafe or no URL skips)        │
//!               ▼                                  ▼
//!        Connected(websocket)               Connected(sse)
//! ```
//!
//! Only the absence of any viable transport is reported to the caller, as
//! `None` from [`RealtimeConnector::connect`].

mod dispatch;
pub mod handle;
pub mod negotiate;
pub mod options;
pub mod state;

pub use handle::{ConnectionHandle, StreamHandle};
pub use negotiate::RealtimeConnector;
pub use options::{ConnectionOptions, ConnectionOptionsBuilder, Endpoints};
pub use state::ConnectState;
