//! Caller-supplied callbacks shared by every driver of one connection.

use std::fmt;
use std::sync::Arc;

use super::{RealtimeEvent, Transport};
use crate::error::RealtimeError;

/// Receives every decoded event.
pub type MessageCallback = Arc<dyn Fn(RealtimeEvent) + Send + Sync>;

/// Receives errors raised on an established connection.
pub type ErrorCallback = Arc<dyn Fn(&RealtimeError) + Send + Sync>;

/// Receives the transport that won negotiation.
pub type ConnectCallback = Arc<dyn Fn(Transport) + Send + Sync>;

/// The set of callbacks attached to one connection.
#[derive(Clone)]
pub struct Callbacks {
    on_message: MessageCallback,
    on_error: Option<ErrorCallback>,
    on_connect: Option<ConnectCallback>,
}

impl Callbacks {
    /// Creates callbacks with only a message handler.
    #[must_use]
    pub fn new(on_message: MessageCallback) -> Self {
        Self {
            on_message,
            on_error: None,
            on_connect: None,
        }
    }

    /// Attaches an error handler.
    #[must_use]
    pub fn with_error(mut self, on_error: ErrorCallback) -> Self {
        self.on_error = Some(on_error);
        self
    }

    /// Attaches a connect handler.
    #[must_use]
    pub fn with_connect(mut self, on_connect: ConnectCallback) -> Self {
        self.on_connect = Some(on_connect);
        self
    }

    /// Delivers an event to the message handler.
    pub fn message(&self, event: RealtimeEvent) {
        (self.on_message)(event);
    }

    /// Reports an error to the error handler, if any.
    pub fn error(&self, err: &RealtimeError) {
        match &self.on_error {
            Some(on_error) => on_error(err),
            None => tracing::debug!(kind = err.kind(), error = %err, "no error callback installed"),
        }
    }

    /// Announces the winning transport to the connect handler, if any.
    pub fn connected(&self, transport: Transport) {
        if let Some(on_connect) = &self.on_connect {
            on_connect(transport);
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_error", &self.on_error.is_some())
            .field("on_connect", &self.on_connect.is_some())
            .finish_non_exhaustive()
    }
}
