//! Server-Sent Events driver.
//!
//! Opens a `text/event-stream` response, feeds the body through
//! [`SseParser`] and forwards `message` events as [`TransportEvent::Frame`].
//! There is no automatic reconnection: a broken stream is reported once and
//! the driver stops.

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::Instrument;

use super::TransportEvent;
use super::sse_parser::SseParser;
use crate::error::RealtimeError;

/// Spawns the driver task for `url`.
pub fn spawn(
    client: reqwest::Client,
    url: String,
    events: mpsc::Sender<TransportEvent>,
    shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(drive(client, url, events, shutdown).in_current_span())
}

async fn drive(
    client: reqwest::Client,
    url: String,
    events: mpsc::Sender<TransportEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    let request = client
        .get(url.as_str())
        .header(ACCEPT, "text/event-stream")
        .header(CACHE_CONTROL, "no-cache")
        .send();

    let response = tokio::select! {
        result = request => result,
        _ = shutdown.changed() => {
            tracing::debug!("sse request abandoned");
            return;
        }
    };

    let response = match response {
        Ok(response) if response.status().is_success() => response,
        Ok(response) => {
            let err = RealtimeError::HttpStatus {
                status: response.status().as_u16(),
                url,
            };
            let _ = events.send(TransportEvent::Failed(err)).await;
            return;
        }
        Err(err) => {
            let _ = events.send(TransportEvent::Failed(err.into())).await;
            return;
        }
    };
    if events.send(TransportEvent::Opened).await.is_err() {
        return;
    }

    let mut body = response.bytes_stream();
    let mut parser = SseParser::new();

    loop {
        tokio::select! {
            chunk = body.next() => match chunk {
                Some(Ok(bytes)) => {
                    for event in parser.feed(&bytes) {
                        if !event.is_message() {
                            tracing::trace!(event_type = %event.event_type, "ignoring named sse event");
                            continue;
                        }
                        tokio::select! {
                            sent = events.send(TransportEvent::Frame(event.data)) => {
                                if sent.is_err() {
                                    return;
                                }
                            }
                            _ = shutdown.changed() => return,
                        }
                    }
                }
                Some(Err(err)) => {
                    let _ = events.send(TransportEvent::Failed(err.into())).await;
                    break;
                }
                None => {
                    let _ = events.send(TransportEvent::Closed).await;
                    break;
                }
            },
            _ = shutdown.changed() => break,
        }
    }

    tracing::debug!("sse driver stopped");
}
