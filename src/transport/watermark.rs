//! Per-connection polling cursor.

use super::polling::PollBatch;

/// Highest event timestamp observed by one polling session, in
/// milliseconds. Sent as the `since` query parameter and never regresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Watermark(i64);

impl Watermark {
    /// Starts a watermark at `since`.
    #[must_use]
    pub const fn new(since: i64) -> Self {
        Self(since)
    }

    /// Starts a watermark at the current wall-clock time.
    #[must_use]
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp_millis())
    }

    /// Current cursor value.
    #[must_use]
    pub const fn current(&self) -> i64 {
        self.0
    }

    /// Folds a poll response into the cursor and returns the new value.
    ///
    /// The cursor becomes the maximum of itself, every event timestamp and
    /// the batch's top-level timestamp, regardless of event order.
    pub fn advance(&mut self, batch: &PollBatch) -> i64 {
        let newest_event = batch.events.iter().filter_map(|e| e.timestamp()).max();
        let candidates = [Some(self.0), newest_event, batch.timestamp];
        self.0 = candidates.into_iter().flatten().max().unwrap_or(self.0);
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RealtimeEvent;
    use serde_json::json;

    fn batch(timestamps: &[i64], top: Option<i64>) -> PollBatch {
        PollBatch {
            events: timestamps
                .iter()
                .map(|ts| RealtimeEvent::new(json!({ "timestamp": ts })))
                .collect(),
            timestamp: top,
        }
    }

    #[test]
    fn advances_to_newest_event() {
        let mut mark = Watermark::new(100);
        assert_eq!(mark.advance(&batch(&[150, 120], None)), 150);
    }

    #[test]
    fn top_level_timestamp_wins_when_larger() {
        let mut mark = Watermark::new(100);
        assert_eq!(mark.advance(&batch(&[150], Some(400))), 400);
    }

    #[test]
    fn never_regresses() {
        let mut mark = Watermark::new(500);
        assert_eq!(mark.advance(&batch(&[120, 480], Some(300))), 500);
        assert_eq!(mark.current(), 500);
    }

    #[test]
    fn events_without_timestamps_are_ignored() {
        let mut mark = Watermark::new(10);
        let batch = PollBatch {
            events: vec![RealtimeEvent::new(json!({"foo": 1}))],
            timestamp: None,
        };
        assert_eq!(mark.advance(&batch), 10);
    }

    #[test]
    fn now_is_recent() {
        let before = chrono::Utc::now().timestamp_millis();
        let mark = Watermark::now();
        assert!(mark.current() >= before);
    }
}
