//! WebSocket driver.
//!
//! Runs the handshake and the read loop for a single client connection,
//! forwarding text frames as [`TransportEvent::Frame`]. A change on the
//! shutdown watch (or its sender being dropped) closes the socket.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tracing::Instrument;

use super::TransportEvent;

/// Spawns the driver task for `url`.
pub fn spawn(
    url: String,
    events: mpsc::Sender<TransportEvent>,
    shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(drive(url, events, shutdown).in_current_span())
}

async fn drive(
    url: String,
    events: mpsc::Sender<TransportEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    let handshake = tokio::select! {
        result = tokio_tungstenite::connect_async(url.as_str()) => result,
        _ = shutdown.changed() => {
            tracing::debug!("websocket handshake abandoned");
            return;
        }
    };

    let stream = match handshake {
        Ok((stream, _response)) => stream,
        Err(err) => {
            let _ = events.send(TransportEvent::Failed(err.into())).await;
            return;
        }
    };
    if events.send(TransportEvent::Opened).await.is_err() {
        return;
    }

    let (mut ws_tx, mut ws_rx) = stream.split();
    let mut closing = false;

    loop {
        tokio::select! {
            frame = ws_rx.next() => {
                let event = match frame {
                    Some(Ok(Message::Text(text))) => TransportEvent::Frame(text.as_str().to_owned()),
                    Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes.to_vec()) {
                        Ok(text) => TransportEvent::Frame(text),
                        Err(_) => {
                            tracing::warn!(len = bytes.len(), "dropping non-utf8 binary frame");
                            continue;
                        }
                    },
                    Some(Ok(Message::Close(_))) | None => {
                        let _ = events.send(TransportEvent::Closed).await;
                        break;
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(err)) => {
                        let _ = events.send(TransportEvent::Failed(err.into())).await;
                        break;
                    }
                };
                // a full channel must not keep the socket open past close()
                tokio::select! {
                    sent = events.send(event) => {
                        if sent.is_err() {
                            break;
                        }
                    }
                    _ = shutdown.changed() => {
                        closing = true;
                        break;
                    }
                }
            }
            _ = shutdown.changed() => {
                closing = true;
                break;
            }
        }
    }

    if closing {
        if let Err(err) = ws_tx.send(Message::Close(None)).await {
            tracing::debug!(error = %err, "close frame not sent");
        }
        if let Err(err) = ws_tx.close().await {
            tracing::debug!(error = %err, "websocket close failed");
        }
    }

    tracing::debug!("websocket driver stopped");
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn refused_connection_reports_failure() {
        // bind then drop to get a port nothing listens on
        let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
            panic!("bind failed");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("no local addr");
        };
        drop(listener);

        let (tx, mut rx) = mpsc::channel(4);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let _driver = spawn(format!("ws://{addr}/ws"), tx, shutdown_rx);

        let Some(TransportEvent::Failed(err)) = rx.recv().await else {
            panic!("expected failure event");
        };
        assert_eq!(err.kind(), "websocket");
    }

    #[tokio::test]
    async fn shutdown_during_handshake_stops_driver() {
        // accepts TCP but never answers the upgrade
        let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
            panic!("bind failed");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("no local addr");
        };
        let _server = tokio::spawn(async move {
            let _held = listener.accept().await;
            std::future::pending::<()>().await;
        });

        let (tx, mut rx) = mpsc::channel(4);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let driver = spawn(format!("ws://{addr}/ws"), tx, shutdown_rx);
        shutdown_tx.send_replace(true);

        tokio_test::assert_ok!(driver.await);
        assert!(rx.recv().await.is_none());
    }
}
