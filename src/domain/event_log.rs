//! Bounded in-memory history for polling clients.
//!
//! [`EventLog`] keeps the most recent events behind a
//! [`tokio::sync::RwLock`]. Appends are serialized and assign strictly
//! increasing timestamps, so a cursor handed to one poller is always below
//! every event appended afterwards.

use std::collections::VecDeque;

use tokio::sync::RwLock;

use super::RelayEvent;

#[derive(Debug, Default)]
struct LogState {
    events: VecDeque<RelayEvent>,
    last_timestamp: Option<i64>,
}

/// Ring buffer of recent [`RelayEvent`]s.
#[derive(Debug)]
pub struct EventLog {
    state: RwLock<LogState>,
    capacity: usize,
}

impl EventLog {
    /// Creates an empty log retaining at most `capacity` events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            state: RwLock::new(LogState::default()),
            capacity: capacity.max(1),
        }
    }

    /// Stamps and stores `payload`, evicting the oldest event when full.
    pub async fn append(
        &self,
        payload: serde_json::Map<String, serde_json::Value>,
    ) -> RelayEvent {
        let now = chrono::Utc::now().timestamp_millis();
        let mut state = self.state.write().await;
        let timestamp = match state.last_timestamp {
            Some(last) if last >= now => last.saturating_add(1),
            _ => now,
        };
        state.last_timestamp = Some(timestamp);

        let event = RelayEvent::stamp(payload, timestamp);
        state.events.push_back(event.clone());
        while state.events.len() > self.capacity {
            state.events.pop_front();
        }
        event
    }

    /// Events with `timestamp > since`, oldest first, and the newest
    /// timestamp ever assigned.
    pub async fn since(&self, since: i64) -> (Vec<RelayEvent>, Option<i64>) {
        let state = self.state.read().await;
        let events = state
            .events
            .iter()
            .filter(|event| event.timestamp > since)
            .cloned()
            .collect();
        (events, state.last_timestamp)
    }

    /// Number of retained events.
    pub async fn len(&self) -> usize {
        self.state.read().await.events.len()
    }

    /// Returns `true` if nothing is retained.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.events.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(n: i64) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        map.insert("n".to_string(), json!(n));
        map
    }

    #[tokio::test]
    async fn timestamps_strictly_increase() {
        let log = EventLog::new(10);
        let mut last = i64::MIN;
        for n in 0..5 {
            let event = log.append(payload(n)).await;
            assert!(event.timestamp > last);
            last = event.timestamp;
        }
    }

    #[tokio::test]
    async fn since_is_strict() {
        let log = EventLog::new(10);
        let first = log.append(payload(1)).await;
        let second = log.append(payload(2)).await;

        let (events, latest) = log.since(first.timestamp).await;
        assert_eq!(events, vec![second.clone()]);
        assert_eq!(latest, Some(second.timestamp));

        let (events, _) = log.since(second.timestamp).await;
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn evicts_oldest_beyond_capacity() {
        let log = EventLog::new(2);
        for n in 0..3 {
            let _ = log.append(payload(n)).await;
        }
        assert_eq!(log.len().await, 2);
        let (events, _) = log.since(i64::MIN).await;
        let ns: Vec<_> = events.iter().filter_map(|e| e.payload.get("n")).collect();
        assert_eq!(ns, vec![&json!(1), &json!(2)]);
    }

    #[tokio::test]
    async fn empty_log_has_no_cursor() {
        let log = EventLog::new(4);
        assert!(log.is_empty().await);
        let (events, latest) = log.since(0).await;
        assert!(events.is_empty());
        assert_eq!(latest, None);
    }
}
