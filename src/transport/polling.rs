//! HTTP polling driver.
//!
//! Fixed-delay loop: each request waits for the previous round-trip to
//! finish, then sleeps `interval` before the next one. Failures are reported
//! and the loop carries on. Closing is cooperative: an in-flight request is
//! not aborted, its result is discarded.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use reqwest::Url;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::Instrument;

use super::callbacks::Callbacks;
use super::event::{RealtimeEvent, millis_from_value};
use super::watermark::Watermark;
use crate::error::RealtimeError;

/// Body of a polling response.
///
/// ```json
/// { "events": [{ "timestamp": 1700000000123, "...": "..." }], "timestamp": 1700000000500 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PollBatch {
    /// Events in server order.
    #[serde(default)]
    pub events: Vec<RealtimeEvent>,
    /// Server-side cursor, in milliseconds.
    #[serde(
        default,
        deserialize_with = "lenient_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<i64>,
}

fn lenient_millis<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(millis_from_value))
}

/// Timing and cursor settings for one polling session.
#[derive(Debug, Clone, Copy)]
pub struct PollingSettings {
    /// Delay between the end of one request and the start of the next.
    pub interval: Duration,
    /// Delay before the first request.
    pub initial_delay: Duration,
    /// Initial `since` cursor; defaults to the current time.
    pub since: Option<i64>,
}

/// Stops a polling loop.
///
/// Dropping the handle stops the loop as well.
#[derive(Debug)]
pub struct PollingHandle {
    active: Arc<AtomicBool>,
}

impl PollingHandle {
    /// Clears the active flag. Safe to call any number of times.
    pub fn close(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            tracing::debug!("polling stopped");
        }
    }

    /// `true` once [`PollingHandle::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        !self.active.load(Ordering::SeqCst)
    }
}

impl Drop for PollingHandle {
    fn drop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

/// Starts a polling loop against `url` and returns its handle immediately.
///
/// # Errors
///
/// Returns [`RealtimeError::InvalidUrl`] if `url` cannot be parsed.
pub fn spawn(
    client: reqwest::Client,
    url: &str,
    settings: PollingSettings,
    callbacks: Callbacks,
) -> Result<PollingHandle, RealtimeError> {
    let url = Url::parse(url).map_err(|e| RealtimeError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let active = Arc::new(AtomicBool::new(true));
    let poller = Poller {
        client,
        url,
        interval: settings.interval,
        initial_delay: settings.initial_delay,
        watermark: settings.since.map_or_else(Watermark::now, Watermark::new),
        active: Arc::clone(&active),
        callbacks,
    };
    tokio::spawn(poller.run().in_current_span());
    Ok(PollingHandle { active })
}

struct Poller {
    client: reqwest::Client,
    url: Url,
    interval: Duration,
    initial_delay: Duration,
    watermark: Watermark,
    active: Arc<AtomicBool>,
    callbacks: Callbacks,
}

impl Poller {
    async fn run(mut self) {
        tokio::time::sleep(self.initial_delay).await;

        while self.is_active() {
            let since = self.watermark.current();
            let result = self.poll_once(since).await;
            if !self.is_active() {
                tracing::debug!(since, "discarding poll result after close");
                break;
            }

            match result {
                Ok(batch) => {
                    let next = self.watermark.advance(&batch);
                    tracing::trace!(count = batch.events.len(), since, next, "poll delivered");
                    for event in batch.events {
                        self.callbacks.message(event);
                    }
                }
                Err(err) => {
                    tracing::warn!(kind = err.kind(), error = %err, "poll failed");
                    self.callbacks.error(&err);
                }
            }

            tokio::time::sleep(self.interval).await;
        }
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// `url` with its `since` parameter replaced by `since`.
    fn request_url(&self, since: i64) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(self.url.query_pairs().filter(|(key, _)| *key != "since"))
            .append_pair("since", &since.to_string());
        url
    }

    async fn poll_once(&self, since: i64) -> Result<PollBatch, RealtimeError> {
        let url = self.request_url(since);
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RealtimeError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
