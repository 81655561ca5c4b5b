//! Relay service: stamps, stores and broadcasts events.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{EventBus, EventLog, RelayEvent};
use crate::error::RelayError;
use crate::transport::{PollBatch, RealtimeEvent};

/// Orchestration layer behind every relay endpoint.
///
/// Every publish follows the pattern: validate → append to log (assigns
/// the timestamp) → broadcast → return the stamped event. Append and
/// broadcast happen under one lock, so push clients see events in
/// timestamp order.
#[derive(Debug, Clone)]
pub struct RelayService {
    log: Arc<EventLog>,
    event_bus: EventBus,
    publish_lock: Arc<Mutex<()>>,
}

impl RelayService {
    /// Creates a new `RelayService`.
    #[must_use]
    pub fn new(log: Arc<EventLog>, event_bus: EventBus) -> Self {
        Self {
            log,
            event_bus,
            publish_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the inner [`EventLog`].
    #[must_use]
    pub fn log(&self) -> &Arc<EventLog> {
        &self.log
    }

    /// Publishes a JSON object to every client.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidRequest`] if `payload` is not a JSON
    /// object.
    pub async fn publish(&self, payload: serde_json::Value) -> Result<RelayEvent, RelayError> {
        let serde_json::Value::Object(fields) = payload else {
            return Err(RelayError::InvalidRequest(
                "event payload must be a JSON object".to_string(),
            ));
        };

        let (event, receivers) = {
            let _ordered = self.publish_lock.lock().await;
            let event = self.log.append(fields).await;
            let receivers = self.event_bus.publish(event.clone());
            (event, receivers)
        };
        tracing::debug!(
            id = %event.id,
            event_type = ?event.event_type(),
            timestamp = event.timestamp,
            receivers,
            "event published"
        );
        Ok(event)
    }

    /// Builds the polling response for a client whose cursor is `since`.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Internal`] if a stored event cannot be encoded.
    pub async fn poll(&self, since: i64) -> Result<PollBatch, RelayError> {
        let (events, latest) = self.log.since(since).await;
        let events = events
            .iter()
            .map(|event| serde_json::to_value(event).map(RealtimeEvent::new))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RelayError::Internal(e.to_string()))?;
        Ok(PollBatch {
            events,
            timestamp: latest,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_service() -> RelayService {
        RelayService::new(Arc::new(EventLog::new(100)), EventBus::new(100))
    }

    #[tokio::test]
    async fn publish_emits_on_bus_and_log() {
        let service = make_service();
        let mut rx = service.event_bus().subscribe();

        let Ok(event) = service.publish(json!({"type": "job_posted"})).await else {
            panic!("publish failed");
        };

        let Ok(received) = rx.recv().await else {
            panic!("expected event");
        };
        assert_eq!(received.id, event.id);
        assert_eq!(service.log().len().await, 1);
    }

    #[tokio::test]
    async fn publish_rejects_non_objects() {
        let service = make_service();
        let result = service.publish(json!([1, 2, 3])).await;
        let Err(err) = result else {
            panic!("expected rejection");
        };
        assert_eq!(err.error_code(), 1001);
    }

    #[tokio::test]
    async fn poll_returns_events_after_cursor() {
        let service = make_service();
        let Ok(first) = service.publish(json!({"n": 1})).await else {
            panic!("publish failed");
        };
        let Ok(second) = service.publish(json!({"n": 2})).await else {
            panic!("publish failed");
        };

        let Ok(batch) = service.poll(first.timestamp).await else {
            panic!("poll failed");
        };
        assert_eq!(batch.events.len(), 1);
        assert_eq!(batch.timestamp, Some(second.timestamp));
        let Some(event) = batch.events.first() else {
            panic!("missing event");
        };
        assert_eq!(event.timestamp(), Some(second.timestamp));
        assert_eq!(event.payload().get("n"), Some(&json!(2)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_publishes_broadcast_in_timestamp_order() {
        let service = make_service();
        let mut rx = service.event_bus().subscribe();

        let tasks: Vec<_> = (0..64)
            .map(|n| {
                let service = service.clone();
                tokio::spawn(async move { service.publish(json!({"n": n})).await })
            })
            .collect();
        for task in tasks {
            let Ok(Ok(_)) = task.await else {
                panic!("publish failed");
            };
        }

        let mut last = i64::MIN;
        for _ in 0..64 {
            let Ok(event) = rx.recv().await else {
                panic!("missing broadcast");
            };
            assert!(event.timestamp > last, "broadcast out of order");
            last = event.timestamp;
        }
    }
}
