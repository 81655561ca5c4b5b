//! Publishing and polling endpoints.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::app_state::AppState;
use crate::error::RelayError;

/// Query string of `GET /poll`.
#[derive(Debug, Deserialize)]
pub struct PollQuery {
    /// Cursor in milliseconds; events at or below it are skipped.
    /// Missing means "everything retained".
    pub since: Option<i64>,
}

/// `POST /events`: Stamp a JSON object and fan it out to every client.
///
/// # Errors
///
/// Returns [`RelayError::InvalidRequest`] if the body is not a JSON object.
pub async fn publish_handler(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<impl IntoResponse, RelayError> {
    let event = state.relay.publish(payload).await?;
    Ok((StatusCode::ACCEPTED, Json(event)))
}

/// `GET /poll?since=<ms>`: Events newer than the cursor.
///
/// # Errors
///
/// Returns [`RelayError::Internal`] if a stored event cannot be encoded.
pub async fn poll_handler(
    State(state): State<AppState>,
    Query(query): Query<PollQuery>,
) -> Result<impl IntoResponse, RelayError> {
    let batch = state.relay.poll(query.since.unwrap_or(i64::MIN)).await?;
    Ok((StatusCode::OK, Json(batch)))
}

/// Publish and polling routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(publish_handler))
        .route("/poll", get(poll_handler))
}
