//! Relay HTTP surface: route handlers and router composition.
//!
//! | Method | Path      | Purpose                                   |
//! |--------|-----------|-------------------------------------------|
//! | POST   | `/events` | publish a JSON object                     |
//! | GET    | `/poll`   | events newer than `since`                 |
//! | GET    | `/sse`    | `text/event-stream` of published events   |
//! | GET    | `/ws`     | WebSocket stream of published events      |
//! | GET    | `/health` | service status                            |

pub mod handlers;

use axum::Router;
use axum::routing::get;

use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// Builds the complete relay router.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(handlers::routes())
        .merge(handlers::system::routes())
        .route("/ws", get(ws_handler))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::{EventBus, EventLog};
    use crate::service::RelayService;
    use crate::transport::PollBatch;

    fn app() -> Router {
        let relay = Arc::new(RelayService::new(
            Arc::new(EventLog::new(100)),
            EventBus::new(100),
        ));
        build_router().with_state(AppState::new(relay))
    }

    fn publish(body: &str) -> Request<Body> {
        let Ok(request) = Request::post("/events")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
        else {
            panic!("request build failed");
        };
        request
    }

    fn get(uri: &str) -> Request<Body> {
        let Ok(request) = Request::get(uri).body(Body::empty()) else {
            panic!("request build failed");
        };
        request
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body read failed");
        };
        serde_json::from_slice(&bytes).unwrap_or_default()
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let Ok(response) = app().oneshot(get("/health")).await else {
            panic!("request failed");
        };
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body.get("status"), Some(&serde_json::json!("healthy")));
    }

    #[tokio::test]
    async fn publish_then_poll() {
        let app = app();
        let Ok(response) = app.clone().oneshot(publish(r#"{"type":"job_posted"}"#)).await else {
            panic!("request failed");
        };
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let Ok(response) = app.oneshot(get("/poll?since=0")).await else {
            panic!("request failed");
        };
        assert_eq!(response.status(), StatusCode::OK);
        let Ok(batch) = serde_json::from_value::<PollBatch>(body_json(response).await) else {
            panic!("poll body did not decode");
        };
        assert_eq!(batch.events.len(), 1);
        assert!(batch.timestamp.is_some());
    }

    #[tokio::test]
    async fn publish_rejects_arrays() {
        let Ok(response) = app().oneshot(publish("[1,2]")).await else {
            panic!("request failed");
        };
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(
            body.pointer("/error/code"),
            Some(&serde_json::json!(1001))
        );
    }

    #[tokio::test]
    async fn poll_rejects_non_numeric_cursor() {
        let Ok(response) = app().oneshot(get("/poll?since=yesterday")).await else {
            panic!("request failed");
        };
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
