//! Per-connection options: candidate endpoints and callbacks.

use std::sync::Arc;
use std::time::Duration;

use crate::error::RealtimeError;
use crate::transport::{Callbacks, RealtimeEvent, Transport};

/// Candidate endpoint URLs, one per transport. Any may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoints {
    /// WebSocket URL (`ws://` or `wss://`).
    pub websocket: Option<String>,
    /// Server-Sent Events URL.
    pub sse: Option<String>,
    /// Polling URL; `since` is appended on every request.
    pub polling: Option<String>,
}

impl Endpoints {
    /// Returns the URL configured for `transport`.
    #[must_use]
    pub fn url(&self, transport: Transport) -> Option<&str> {
        match transport {
            Transport::WebSocket => self.websocket.as_deref(),
            Transport::Sse => self.sse.as_deref(),
            Transport::Polling => self.polling.as_deref(),
        }
    }

    /// `true` if `transport` has a URL.
    #[must_use]
    pub fn has(&self, transport: Transport) -> bool {
        self.url(transport).is_some()
    }

    /// `true` if no URL is configured at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.websocket.is_none() && self.sse.is_none() && self.polling.is_none()
    }
}

/// Immutable options for one negotiation.
///
/// Built with [`ConnectionOptions::builder`].
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    endpoints: Endpoints,
    callbacks: Callbacks,
    poll_interval: Option<Duration>,
}

impl ConnectionOptions {
    /// Starts a builder around the required message callback.
    pub fn builder<F>(on_message: F) -> ConnectionOptionsBuilder
    where
        F: Fn(RealtimeEvent) + Send + Sync + 'static,
    {
        ConnectionOptionsBuilder {
            endpoints: Endpoints::default(),
            callbacks: Callbacks::new(Arc::new(on_message)),
            poll_interval: None,
        }
    }

    /// Candidate endpoints.
    #[must_use]
    pub const fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Attached callbacks.
    #[must_use]
    pub const fn callbacks(&self) -> &Callbacks {
        &self.callbacks
    }

    /// Poll interval override; `None` means the connector default (3000 ms).
    #[must_use]
    pub const fn poll_interval(&self) -> Option<Duration> {
        self.poll_interval
    }
}

/// Builder for [`ConnectionOptions`].
#[derive(Debug)]
pub struct ConnectionOptionsBuilder {
    endpoints: Endpoints,
    callbacks: Callbacks,
    poll_interval: Option<Duration>,
}

impl ConnectionOptionsBuilder {
    /// Sets the WebSocket URL. An empty string leaves it unset.
    #[must_use]
    pub fn websocket_url(mut self, url: impl Into<String>) -> Self {
        self.endpoints.websocket = non_empty(url.into());
        self
    }

    /// Sets the Server-Sent Events URL. An empty string leaves it unset.
    #[must_use]
    pub fn sse_url(mut self, url: impl Into<String>) -> Self {
        self.endpoints.sse = non_empty(url.into());
        self
    }

    /// Sets the polling URL. An empty string leaves it unset.
    #[must_use]
    pub fn polling_url(mut self, url: impl Into<String>) -> Self {
        self.endpoints.polling = non_empty(url.into());
        self
    }

    /// Attaches an error callback for failures on an established channel.
    #[must_use]
    pub fn on_error<F>(mut self, on_error: F) -> Self
    where
        F: Fn(&RealtimeError) + Send + Sync + 'static,
    {
        self.callbacks = self.callbacks.with_error(Arc::new(on_error));
        self
    }

    /// Attaches a callback receiving the transport that won negotiation.
    #[must_use]
    pub fn on_connect<F>(mut self, on_connect: F) -> Self
    where
        F: Fn(Transport) + Send + Sync + 'static,
    {
        self.callbacks = self.callbacks.with_connect(Arc::new(on_connect));
        self
    }

    /// Overrides the polling interval.
    #[must_use]
    pub const fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Freezes the options.
    #[must_use]
    pub fn build(self) -> ConnectionOptions {
        ConnectionOptions {
            endpoints: self.endpoints,
            callbacks: self.callbacks,
            poll_interval: self.poll_interval,
        }
    }
}

fn non_empty(url: String) -> Option<String> {
    (!url.trim().is_empty()).then_some(url)
}
