//! Consumer side of the push-transport event channel.

use tokio::sync::{mpsc, watch};

use crate::error::RealtimeError;
use crate::transport::{Callbacks, RealtimeEvent, Transport, TransportEvent};

/// Waits for the driver's handshake verdict.
///
/// # Errors
///
/// Returns the driver's failure, or [`RealtimeError::Closed`] if the stream
/// ended before opening.
pub(crate) async fn wait_for_open(
    events: &mut mpsc::Receiver<TransportEvent>,
) -> Result<(), RealtimeError> {
    loop {
        match events.recv().await {
            Some(TransportEvent::Opened) => return Ok(()),
            Some(TransportEvent::Failed(err)) => return Err(err),
            Some(TransportEvent::Closed) | None => return Err(RealtimeError::Closed),
            Some(TransportEvent::Frame(_)) => {
                tracing::trace!("frame before open ignored");
            }
        }
    }
}

/// Decodes frames and invokes callbacks until the driver stops or the
/// handle is closed.
///
/// A malformed frame is logged and dropped; it never ends the loop. Once
/// `shutdown` is set, nothing still buffered in `events` reaches a callback.
pub(crate) async fn run(
    mut events: mpsc::Receiver<TransportEvent>,
    mut shutdown: watch::Receiver<bool>,
    transport: Transport,
    callbacks: Callbacks,
) {
    loop {
        let event = tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            event = events.recv() => match event {
                Some(event) => event,
                None => break,
            },
        };
        if *shutdown.borrow() {
            break;
        }

        match event {
            TransportEvent::Frame(text) => match serde_json::from_str::<RealtimeEvent>(&text) {
                Ok(event) => callbacks.message(event),
                Err(err) => {
                    tracing::warn!(%transport, error = %err, "dropping malformed message");
                }
            },
            TransportEvent::Failed(err) => {
                tracing::warn!(%transport, kind = err.kind(), error = %err, "connection failed");
                callbacks.error(&err);
            }
            TransportEvent::Closed => {
                tracing::info!(%transport, "connection closed by remote");
                callbacks.error(&RealtimeError::Closed);
            }
            TransportEvent::Opened => {}
        }
    }
    tracing::debug!(%transport, "dispatcher stopped");
}
