//! Shared relay state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::RelayService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Relay service for publishing and polling.
    pub relay: Arc<RelayService>,
    /// Event bus for WebSocket and SSE subscriptions.
    pub event_bus: EventBus,
}

impl AppState {
    /// Wires a relay service and its event bus.
    #[must_use]
    pub fn new(relay: Arc<RelayService>) -> Self {
        let event_bus = relay.event_bus().clone();
        Self { relay, event_bus }
    }
}
