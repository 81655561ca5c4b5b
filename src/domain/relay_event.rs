//! Events fanned out by the relay server.
//!
//! A [`RelayEvent`] is whatever JSON object a publisher posted, stamped with
//! a server-assigned `id` and a strictly increasing millisecond `timestamp`.
//! On the wire the stamp fields sit next to the payload fields, which is the
//! shape polling clients read their watermark from.

use serde::Serialize;

/// Keys owned by the relay; publishers cannot set them.
const RESERVED_KEYS: &[&str] = &["id", "timestamp"];

/// A stamped event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelayEvent {
    /// Server-assigned identifier.
    pub id: uuid::Uuid,
    /// Milliseconds since the Unix epoch, strictly increasing per relay.
    pub timestamp: i64,
    /// Publisher fields.
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl RelayEvent {
    /// Stamps `payload`, dropping any reserved keys it carries.
    #[must_use]
    pub fn stamp(mut payload: serde_json::Map<String, serde_json::Value>, timestamp: i64) -> Self {
        for key in RESERVED_KEYS {
            payload.remove(*key);
        }
        Self {
            id: uuid::Uuid::new_v4(),
            timestamp,
            payload,
        }
    }

    /// The `type` field of the payload, if it is a string.
    #[must_use]
    pub fn event_type(&self) -> Option<&str> {
        self.payload.get("type").and_then(serde_json::Value::as_str)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        let serde_json::Value::Object(map) = value else {
            panic!("expected object");
        };
        map
    }

    #[test]
    fn stamp_overrides_reserved_keys() {
        let event = RelayEvent::stamp(
            object(json!({"type": "job_posted", "timestamp": 1, "id": "x"})),
            1_700_000_000_000,
        );
        assert_eq!(event.timestamp, 1_700_000_000_000);
        assert_eq!(event.event_type(), Some("job_posted"));
        assert!(!event.payload.contains_key("timestamp"));
    }

    #[test]
    fn serializes_flat() {
        let event = RelayEvent::stamp(object(json!({"foo": 1})), 42);
        let Ok(value) = serde_json::to_value(&event) else {
            panic!("serialization failed");
        };
        assert_eq!(value.get("foo"), Some(&json!(1)));
        assert_eq!(value.get("timestamp"), Some(&json!(42)));
        assert!(value.get("payload").is_none());
    }
}
