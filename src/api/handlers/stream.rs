//! Server-Sent Events endpoint.

use std::convert::Infallible;

use axum::Router;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::get;
use futures_util::stream::{self, Stream};
use tokio::sync::broadcast;

use crate::app_state::AppState;
use crate::domain::RelayEvent;

/// `GET /sse`: Stream every relay event as an SSE `message`.
pub async fn sse_handler(State(state): State<AppState>) -> impl IntoResponse {
    let event_rx = state.event_bus.subscribe();
    Sse::new(event_stream(event_rx)).keep_alive(KeepAlive::default())
}

/// Turns a bus receiver into a stream of SSE events.
///
/// Lagging skips the lost events with a warning; the stream ends when the
/// bus closes.
fn event_stream(
    event_rx: broadcast::Receiver<RelayEvent>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::unfold(event_rx, |mut event_rx| async move {
        loop {
            match event_rx.recv().await {
                Ok(event) => match Event::default().json_data(&event) {
                    Ok(sse_event) => return Some((Ok(sse_event), event_rx)),
                    Err(err) => tracing::warn!(error = %err, "event not serializable"),
                },
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(lagged = n, "sse client lagged behind event bus");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    })
}

/// Streaming routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/sse", get(sse_handler))
}
