//! First-of race between an operation and a timer.
//!
//! Used for both push-transport handshakes. The losing side is dropped, so
//! an operation that owns a socket releases it when the timer wins.

use std::future::Future;
use std::time::Duration;

/// Outcome of [`with_timeout`].
#[derive(Debug, PartialEq, Eq)]
pub enum Race<T> {
    /// The operation finished first.
    Completed(T),
    /// The timer fired first.
    TimedOut,
}

/// Races `operation` against a `timeout` timer.
pub async fn with_timeout<F>(timeout: Duration, operation: F) -> Race<F::Output>
where
    F: Future,
{
    tokio::select! {
        biased;
        value = operation => Race::Completed(value),
        () = tokio::time::sleep(timeout) => Race::TimedOut,
    }
}
