//! # realtime-fallback
//!
//! Negotiates a realtime channel over the most capable transport the
//! environment allows: WebSocket, then Server-Sent Events, then HTTP
//! polling. The caller gets one [`connector::ConnectionHandle`] whose
//! `close()` tears down whichever transport won.
//!
//! The crate also contains a relay server (binary `realtime-relay`) that
//! serves all three transports from one event stream.
//!
//! ## Architecture
//!
//! ```text
//! Client side                              Relay server
//! ───────────                              ────────────
//! RealtimeConnector (connector/)           REST handlers (api/)
//!     │                                    WS handler (ws/)
//!     ├── CapabilityDetector (capability/)     │
//!     │      └── EnvironmentProbe          RelayService (service/)
//!     │                                        │
//!     └── transports (transport/)          EventLog + EventBus (domain/)
//!            ├── websocket  ──────────────► GET /ws
//!            ├── sse        ──────────────► GET /sse
//!            └── polling    ──────────────► GET /poll?since=
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use realtime_fallback::connector::{ConnectionOptions, RealtimeConnector};
//!
//! # async fn example() {
//! let connector = RealtimeConnector::default();
//! let options = ConnectionOptions::builder(|event| println!("{:?}", event.payload()))
//!     .websocket_url("wss://relay.example.com/ws")
//!     .sse_url("https://relay.example.com/sse")
//!     .polling_url("https://relay.example.com/poll")
//!     .on_connect(|transport| println!("connected over {transport}"))
//!     .build();
//!
//! if let Some(handle) = connector.connect(options).await {
//!     // ... later, on teardown
//!     handle.close();
//! }
//! # }
//! ```

pub mod api;
pub mod app_state;
pub mod capability;
pub mod config;
pub mod connector;
pub mod domain;
pub mod error;
pub mod service;
pub mod transport;
pub mod ws;
