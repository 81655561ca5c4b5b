//! Configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Missing or unparsable values fall back
//! to the defaults documented on each field.

use std::net::SocketAddr;
use std::time::Duration;

/// Default handshake timeout for WebSocket and SSE attempts.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default delay between the end of one poll and the start of the next.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// Default delay before the first poll is issued.
pub const DEFAULT_POLL_INITIAL_DELAY: Duration = Duration::from_millis(100);

/// Connector-wide settings shared by every negotiation.
///
/// Built once and handed to [`crate::connector::RealtimeConnector`]. These
/// are not tunable per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorConfig {
    /// How long a WebSocket or SSE handshake may take before falling back
    /// (default 5 s).
    pub connect_timeout: Duration,

    /// Poll interval used when the options do not override it
    /// (default 3000 ms).
    pub poll_interval: Duration,

    /// Delay before the first poll (default 100 ms).
    pub poll_initial_delay: Duration,

    /// Capacity of the per-connection transport event channel (default 256).
    pub channel_capacity: usize,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_initial_delay: DEFAULT_POLL_INITIAL_DELAY,
            channel_capacity: 256,
        }
    }
}

impl ConnectorConfig {
    /// Loads connector settings from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    /// Recognized keys: `REALTIME_CONNECT_TIMEOUT_MS`,
    /// `REALTIME_POLL_INTERVAL_MS`, `REALTIME_POLL_INITIAL_DELAY_MS`,
    /// `REALTIME_CHANNEL_CAPACITY`.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        Self {
            connect_timeout: parse_env_millis(
                "REALTIME_CONNECT_TIMEOUT_MS",
                defaults.connect_timeout,
            ),
            poll_interval: parse_env_millis("REALTIME_POLL_INTERVAL_MS", defaults.poll_interval),
            poll_initial_delay: parse_env_millis(
                "REALTIME_POLL_INITIAL_DELAY_MS",
                defaults.poll_initial_delay,
            ),
            channel_capacity: parse_env("REALTIME_CHANNEL_CAPACITY", defaults.channel_capacity)
                .max(1),
        }
    }
}

/// Relay server configuration.
///
/// Loaded once at startup via [`RelayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Address the relay listens on. `LISTEN_ADDR`, default `0.0.0.0:3000`.
    pub listen_addr: SocketAddr,

    /// Per-receiver buffer of the push fan-out. `EVENT_BUS_CAPACITY`.
    pub event_bus_capacity: usize,

    /// Number of recent events retained for polling clients.
    pub event_log_capacity: usize,

    /// Emit JSON log lines instead of the human-readable format.
    pub log_json: bool,
}

impl RelayConfig {
    /// Reads the relay settings, loading a `.env` file first if present.
    ///
    /// # Errors
    ///
    /// Fails only when `LISTEN_ADDR` is set to something that is not a
    /// socket address; every other variable falls back to its default.
    pub fn from_env() -> Result<Self, std::net::AddrParseError> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()?;

        let event_bus_capacity = parse_env("EVENT_BUS_CAPACITY", 10_000_usize).max(1);
        let event_log_capacity = parse_env("EVENT_LOG_CAPACITY", 1_000_usize).max(1);
        let log_json = matches!(
            std::env::var("LOG_FORMAT").ok().as_deref(),
            Some("json") | Some("JSON")
        );

        Ok(Self {
            listen_addr,
            event_bus_capacity,
            event_log_capacity,
            log_json,
        })
    }
}

/// `key` parsed as `T`, or `default` when unset or unparsable.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable holding milliseconds.
fn parse_env_millis(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(default, Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = ConnectorConfig::default();
        assert_eq!(cfg.connect_timeout, Duration::from_secs(5));
        assert_eq!(cfg.poll_interval, Duration::from_millis(3000));
        assert_eq!(cfg.poll_initial_delay, Duration::from_millis(100));
        assert_eq!(cfg.channel_capacity, 256);
    }

    #[test]
    fn parse_env_falls_back_on_missing_key() {
        let value: u64 = parse_env("REALTIME_FALLBACK_TEST_UNSET_KEY", 42);
        assert_eq!(value, 42);
        let millis = parse_env_millis("REALTIME_FALLBACK_TEST_UNSET_KEY", Duration::from_millis(7));
        assert_eq!(millis, Duration::from_millis(7));
    }
}
