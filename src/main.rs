//! realtime-relay server entry point.
//!
//! Serves `/ws`, `/sse` and `/poll` from one event stream fed by
//! `POST /events`.

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use realtime_fallback::api;
use realtime_fallback::app_state::AppState;
use realtime_fallback::config::RelayConfig;
use realtime_fallback::domain::{EventBus, EventLog};
use realtime_fallback::service::RelayService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = RelayConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    tracing::info!(addr = %config.listen_addr, "starting realtime-relay");

    // Build domain layer
    let log = Arc::new(EventLog::new(config.event_log_capacity));
    let event_bus = EventBus::new(config.event_bus_capacity);

    // Build service layer
    let relay = Arc::new(RelayService::new(log, event_bus));

    // Build router
    let app = api::build_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState::new(relay));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
