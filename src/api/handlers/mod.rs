//! Relay endpoint handlers organized by concern.

pub mod events;
pub mod stream;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes the publish, polling and streaming routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(events::routes())
        .merge(stream::routes())
}
