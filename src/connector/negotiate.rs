//! Realtime connector: drives the fallback chain.

use tokio::sync::{mpsc, watch};
use tracing::Instrument;

use super::dispatch;
use super::handle::{ConnectionHandle, StreamHandle};
use super::options::ConnectionOptions;
use super::state::ConnectState;
use crate::capability::CapabilityDetector;
use crate::config::ConnectorConfig;
use crate::error::RealtimeError;
use crate::transport::polling::{self, PollingSettings};
use crate::transport::race::{self, Race};
use crate::transport::{Transport, TransportEvent, sse, websocket};

/// Negotiates a realtime channel using the most capable transport the
/// environment allows.
///
/// Stateless between calls: every [`RealtimeConnector::connect`] builds an
/// independent transport with its own tasks, timers and watermark.
#[derive(Debug, Clone)]
pub struct RealtimeConnector {
    detector: CapabilityDetector,
    config: ConnectorConfig,
    client: reqwest::Client,
}

impl RealtimeConnector {
    /// Creates a connector with a fresh HTTP client.
    #[must_use]
    pub fn new(detector: CapabilityDetector, config: ConnectorConfig) -> Self {
        Self {
            detector,
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Replaces the HTTP client used for SSE and polling.
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Returns the capability detector.
    #[must_use]
    pub const fn detector(&self) -> &CapabilityDetector {
        &self.detector
    }

    /// Returns the connector configuration.
    #[must_use]
    pub const fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// Tries WebSocket, then SSE, then polling, and returns a handle to the
    /// first one that opens.
    ///
    /// WebSocket is skipped when the environment is not safe. Handshakes are
    /// bounded by the configured connect timeout. Returns `None` when no
    /// transport could be established; this method never panics and never
    /// reports connect failures through the error callback.
    pub async fn connect(&self, options: ConnectionOptions) -> Option<ConnectionHandle> {
        let connection_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("realtime_connect", %connection_id);
        self.negotiate(options).instrument(span).await
    }

    async fn negotiate(&self, options: ConnectionOptions) -> Option<ConnectionHandle> {
        let report = self.detector.report();
        tracing::debug!(?report, "environment capabilities");

        let endpoints = options.endpoints();
        if endpoints.has(Transport::WebSocket) && !report.websocket_safe {
            tracing::info!("skipping websocket: environment not safe");
        }

        let mut state = ConnectState::Start.begin(endpoints, report.websocket_safe);
        while let Some(transport) = state.trying() {
            let Some(url) = endpoints.url(transport) else {
                state = state.on_failure(endpoints);
                continue;
            };

            match self.attempt(transport, url, &options).await {
                Ok(handle) => {
                    state = state.on_open();
                    tracing::info!(?state, "realtime channel established");
                    options.callbacks().connected(transport);
                    return Some(handle);
                }
                Err(err) => {
                    state = state.on_failure(endpoints);
                    tracing::debug!(
                        %transport,
                        kind = err.kind(),
                        error = %err,
                        next = ?state,
                        "transport unavailable, falling back"
                    );
                }
            }
        }

        tracing::warn!("no realtime transport available");
        None
    }

    async fn attempt(
        &self,
        transport: Transport,
        url: &str,
        options: &ConnectionOptions,
    ) -> Result<ConnectionHandle, RealtimeError> {
        match transport {
            Transport::WebSocket => self
                .open_stream(transport, options, |events, shutdown| {
                    websocket::spawn(url.to_owned(), events, shutdown);
                })
                .await
                .map(ConnectionHandle::WebSocket),
            Transport::Sse => self
                .open_stream(transport, options, |events, shutdown| {
                    sse::spawn(self.client.clone(), url.to_owned(), events, shutdown);
                })
                .await
                .map(ConnectionHandle::Sse),
            Transport::Polling => self.start_polling(url, options),
        }
    }

    /// Starts a push driver and waits, bounded by the connect timeout, for it
    /// to open. On success the dispatcher takes over the event channel.
    async fn open_stream<F>(
        &self,
        transport: Transport,
        options: &ConnectionOptions,
        start_driver: F,
    ) -> Result<StreamHandle, RealtimeError>
    where
        F: FnOnce(mpsc::Sender<TransportEvent>, watch::Receiver<bool>),
    {
        let (events_tx, mut events_rx) = mpsc::channel(self.config.channel_capacity);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        start_driver(events_tx, shutdown_rx.clone());

        let timeout = self.config.connect_timeout;
        let opened = race::with_timeout(timeout, dispatch::wait_for_open(&mut events_rx)).await;
        let outcome = match opened {
            Race::Completed(result) => result,
            Race::TimedOut => Err(RealtimeError::ConnectTimeout(timeout)),
        };
        if let Err(err) = outcome {
            // stop a handshake that may still be in progress
            shutdown_tx.send_replace(true);
            return Err(err);
        }

        tokio::spawn(
            dispatch::run(events_rx, shutdown_rx, transport, options.callbacks().clone())
                .in_current_span(),
        );
        Ok(StreamHandle::new(shutdown_tx))
    }

    fn start_polling(
        &self,
        url: &str,
        options: &ConnectionOptions,
    ) -> Result<ConnectionHandle, RealtimeError> {
        let settings = PollingSettings {
            interval: options.poll_interval().unwrap_or(self.config.poll_interval),
            initial_delay: self.config.poll_initial_delay,
            since: None,
        };
        polling::spawn(self.client.clone(), url, settings, options.callbacks().clone())
            .map(ConnectionHandle::Polling)
    }
}

impl Default for RealtimeConnector {
    fn default() -> Self {
        Self::new(CapabilityDetector::default(), ConnectorConfig::default())
    }
}
