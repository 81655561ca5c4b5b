//! Environment probe abstraction.
//!
//! Every ambient read the capability checks need goes through
//! [`EnvironmentProbe`], so a fake environment can be injected in tests or
//! by hosts that know more about where they run (an embedding webview, a
//! desktop shell) than the process itself can discover.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Display mode reported by the host, mirroring the CSS `display-mode`
/// media feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Regular browser tab with browser chrome.
    #[default]
    Browser,
    /// Installed app launched without browser UI.
    Standalone,
    /// Installed app with a minimal navigation UI.
    MinimalUi,
    /// Full screen, no UI at all.
    Fullscreen,
}

/// Read-only view of the runtime environment.
pub trait EnvironmentProbe: fmt::Debug + Send + Sync {
    /// Whether the runtime reports a secure context.
    fn is_secure_context(&self) -> bool;

    /// Whether a WebSocket implementation is available.
    fn has_websocket(&self) -> bool;

    /// User-agent string, if the host exposes one.
    fn user_agent(&self) -> Option<&str>;

    /// Current display mode.
    fn display_mode(&self) -> DisplayMode;

    /// Platform "added to home screen" flag.
    fn navigator_standalone(&self) -> bool;
}

/// A fixed environment description.
///
/// Construct with [`StaticProbe::native`], [`StaticProbe::headless`] or
/// [`StaticProbe::for_origin`], then adjust with the builder setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticProbe {
    secure_context: bool,
    websocket: bool,
    user_agent: Option<String>,
    display_mode: DisplayMode,
    navigator_standalone: bool,
}

impl StaticProbe {
    /// A native process talking to the network directly: secure, WebSocket
    /// capable, no user agent, not installed as an app.
    #[must_use]
    pub const fn native() -> Self {
        Self {
            secure_context: true,
            websocket: true,
            user_agent: None,
            display_mode: DisplayMode::Browser,
            navigator_standalone: false,
        }
    }

    /// A non-browser-like environment where nothing can be assumed.
    #[must_use]
    pub const fn headless() -> Self {
        Self {
            secure_context: false,
            websocket: false,
            user_agent: None,
            display_mode: DisplayMode::Browser,
            navigator_standalone: false,
        }
    }

    /// A page served from `origin`.
    ///
    /// The context is secure when the scheme is `https`/`wss` or the host is
    /// a local development host.
    #[must_use]
    pub fn for_origin(origin: &str) -> Self {
        Self {
            secure_context: origin_is_secure(origin),
            ..Self::native()
        }
    }

    /// Sets the secure-context flag.
    #[must_use]
    pub const fn with_secure_context(mut self, secure: bool) -> Self {
        self.secure_context = secure;
        self
    }

    /// Sets WebSocket availability.
    #[must_use]
    pub const fn with_websocket(mut self, available: bool) -> Self {
        self.websocket = available;
        self
    }

    /// Sets the user-agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets the display mode.
    #[must_use]
    pub const fn with_display_mode(mut self, mode: DisplayMode) -> Self {
        self.display_mode = mode;
        self
    }

    /// Sets the "added to home screen" flag.
    #[must_use]
    pub const fn with_navigator_standalone(mut self, standalone: bool) -> Self {
        self.navigator_standalone = standalone;
        self
    }
}

impl Default for StaticProbe {
    fn default() -> Self {
        Self::native()
    }
}

impl EnvironmentProbe for StaticProbe {
    fn is_secure_context(&self) -> bool {
        self.secure_context
    }

    fn has_websocket(&self) -> bool {
        self.websocket
    }

    fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    fn navigator_standalone(&self) -> bool {
        self.navigator_standalone
    }
}

/// Hosts treated as secure even over plain HTTP.
const LOCAL_HOSTS: &[&str] = &["localhost", "127.0.0.1", "[::1]"];

fn origin_is_secure(origin: &str) -> bool {
    let Some((scheme, rest)) = origin.split_once("://") else {
        return false;
    };
    if scheme.eq_ignore_ascii_case("https") || scheme.eq_ignore_ascii_case("wss") {
        return true;
    }

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host = if authority.starts_with('[') {
        // IPv6 literal keeps its brackets
        authority
            .find(']')
            .and_then(|end| authority.get(..=end))
            .unwrap_or(authority)
    } else {
        authority.split(':').next().unwrap_or(authority)
    }
    .to_ascii_lowercase();

    LOCAL_HOSTS.contains(&host.as_str()) || host.ends_with(".localhost")
}
