//! Helpers shared by the integration tests: ephemeral servers and a
//! callback recorder.

#![allow(dead_code, clippy::panic)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use realtime_fallback::connector::{ConnectionOptions, ConnectionOptionsBuilder};
use realtime_fallback::error::RealtimeError;
use tokio::net::TcpListener;

/// Serves `router` on an ephemeral local port.
pub async fn serve(router: Router) -> SocketAddr {
    let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// Accepts TCP connections and never answers, so handshakes hang.
pub async fn silent_listener() -> SocketAddr {
    let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    addr
}

/// A local address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    addr
}

/// Records everything the callbacks receive.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    messages: Arc<Mutex<Vec<serde_json::Value>>>,
    errors: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options builder wired to this recorder.
    pub fn options(&self) -> ConnectionOptionsBuilder {
        let messages = Arc::clone(&self.messages);
        let errors = Arc::clone(&self.errors);
        ConnectionOptions::builder(move |event| {
            if let Ok(mut guard) = messages.lock() {
                guard.push(event.into_payload());
            }
        })
        .on_error(move |err: &RealtimeError| {
            if let Ok(mut guard) = errors.lock() {
                guard.push(err.to_string());
            }
        })
    }

    pub fn messages(&self) -> Vec<serde_json::Value> {
        self.messages.lock().map(|g| g.clone()).unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

/// Polls `check` every 10 ms until it holds or `timeout` passes.
pub async fn eventually<F>(timeout: Duration, check: F) -> bool
where
    F: Fn() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if check() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
