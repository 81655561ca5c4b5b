//! Payloads delivered to callers and events exchanged with driver tasks.

use serde::{Deserialize, Serialize};

use crate::error::RealtimeError;

/// An opaque JSON payload received from the server.
///
/// The shape is defined by the server. The only field this crate reads is
/// an optional numeric `timestamp` (milliseconds), used by polling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RealtimeEvent(serde_json::Value);

impl RealtimeEvent {
    /// Wraps a JSON value.
    #[must_use]
    pub const fn new(payload: serde_json::Value) -> Self {
        Self(payload)
    }

    /// Returns the raw payload.
    #[must_use]
    pub const fn payload(&self) -> &serde_json::Value {
        &self.0
    }

    /// Consumes the event, returning the raw payload.
    #[must_use]
    pub fn into_payload(self) -> serde_json::Value {
        self.0
    }

    /// Returns the event's `timestamp` field in milliseconds, if present.
    ///
    /// Fractional timestamps are truncated.
    #[must_use]
    pub fn timestamp(&self) -> Option<i64> {
        self.0.get("timestamp").and_then(millis_from_value)
    }
}

/// Reads a JSON number as whole milliseconds.
pub(crate) fn millis_from_value(value: &serde_json::Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite())
            .map(|f| f.trunc() as i64)
    })
}

impl From<serde_json::Value> for RealtimeEvent {
    fn from(payload: serde_json::Value) -> Self {
        Self(payload)
    }
}

/// What a push-transport driver reports to its consumer.
#[derive(Debug)]
pub enum TransportEvent {
    /// The handshake completed.
    Opened,
    /// A text frame or SSE `message` data, not yet decoded.
    Frame(String),
    /// The transport failed; the driver stops after sending this.
    Failed(RealtimeError),
    /// The remote end closed the stream.
    Closed,
}
