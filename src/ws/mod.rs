//! WebSocket layer of the relay: upgrade handler and per-connection loop.
//!
//! The endpoint at `/ws` is push-only: every relay event is forwarded as a
//! JSON text frame; client frames other than close are ignored.

pub mod connection;
pub mod handler;
