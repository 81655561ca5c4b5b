//! WebSocket safety policy.
//!
//! [`CapabilityDetector`] turns the raw facts of an [`EnvironmentProbe`]
//! into verdicts. The composite [`CapabilityDetector::is_websocket_safe`]
//! defaults to "safe" and only vetoes known-bad combinations.

use std::sync::Arc;

use serde::Serialize;

use super::probe::{DisplayMode, EnvironmentProbe, StaticProbe};

/// Lower-case user-agent fragments of in-app browsers and generic webviews.
///
/// Matching is a case-insensitive substring search. Extend this list to
/// veto new embedders.
pub const WEBVIEW_SIGNATURES: &[&str] = &[
    "fban",
    "fbav",
    "fb_iab",
    "fbios",
    "instagram",
    " line/",
    "twitter",
    "linkedinapp",
    "snapchat",
    "pinterest",
    "tiktok",
    "bytedancewebview",
    "musical_ly",
    "micromessenger",
    "whatsapp",
    "telegram",
    "gsa/",
    "webview",
    "; wv)",
];

/// Lower-case user-agent fragments of iOS devices.
pub const IOS_SIGNATURES: &[&str] = &["iphone", "ipad", "ipod"];

/// Snapshot of every capability verdict, for logging and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapabilityReport {
    /// Secure context reported.
    pub secure_context: bool,
    /// WebSocket implementation available.
    pub websocket_support: bool,
    /// Running inside an in-app browser.
    pub embedded_webview: bool,
    /// Running as an installed app.
    pub standalone_pwa: bool,
    /// Running on an iOS device.
    pub ios_device: bool,
    /// Composite verdict.
    pub websocket_safe: bool,
}

/// Evaluates the environment exposed by an [`EnvironmentProbe`].
#[derive(Debug, Clone)]
pub struct CapabilityDetector {
    probe: Arc<dyn EnvironmentProbe>,
}

impl CapabilityDetector {
    /// Creates a detector over the given probe.
    #[must_use]
    pub fn new(probe: Arc<dyn EnvironmentProbe>) -> Self {
        Self { probe }
    }

    /// Creates a detector over a [`StaticProbe`].
    #[must_use]
    pub fn from_static(probe: StaticProbe) -> Self {
        Self::new(Arc::new(probe))
    }

    /// Returns the underlying probe.
    #[must_use]
    pub fn probe(&self) -> &Arc<dyn EnvironmentProbe> {
        &self.probe
    }

    /// `true` if the runtime reports a secure context.
    #[must_use]
    pub fn is_secure_context(&self) -> bool {
        self.probe.is_secure_context()
    }

    /// `true` if a WebSocket implementation is available.
    #[must_use]
    pub fn has_websocket_support(&self) -> bool {
        self.probe.has_websocket()
    }

    /// `true` if the user agent matches a known in-app browser signature.
    ///
    /// Returns `false` when no user agent is available.
    #[must_use]
    pub fn is_embedded_webview(&self) -> bool {
        self.user_agent_matches(WEBVIEW_SIGNATURES)
    }

    /// `true` if the app runs in standalone display mode or was launched
    /// from the home screen.
    #[must_use]
    pub fn is_standalone_pwa(&self) -> bool {
        self.probe.display_mode() == DisplayMode::Standalone || self.probe.navigator_standalone()
    }

    /// `true` if the user agent names an iOS device.
    #[must_use]
    pub fn is_ios_device(&self) -> bool {
        self.user_agent_matches(IOS_SIGNATURES)
    }

    /// Composite verdict on whether a persistent WebSocket may be attempted.
    ///
    /// Requires a secure context and WebSocket support. Vetoed for an iOS
    /// standalone app and for every embedded webview regardless of platform.
    #[must_use]
    pub fn is_websocket_safe(&self) -> bool {
        if !self.is_secure_context() || !self.has_websocket_support() {
            return false;
        }
        if self.is_ios_device() && self.is_standalone_pwa() {
            return false;
        }
        !self.is_embedded_webview()
    }

    /// Collects every verdict into a [`CapabilityReport`].
    #[must_use]
    pub fn report(&self) -> CapabilityReport {
        CapabilityReport {
            secure_context: self.is_secure_context(),
            websocket_support: self.has_websocket_support(),
            embedded_webview: self.is_embedded_webview(),
            standalone_pwa: self.is_standalone_pwa(),
            ios_device: self.is_ios_device(),
            websocket_safe: self.is_websocket_safe(),
        }
    }

    fn user_agent_matches(&self, signatures: &[&str]) -> bool {
        let Some(user_agent) = self.probe.user_agent().filter(|ua| !ua.is_empty()) else {
            return false;
        };
        let user_agent = user_agent.to_ascii_lowercase();
        signatures.iter().any(|sig| user_agent.contains(sig))
    }
}

impl Default for CapabilityDetector {
    fn default() -> Self {
        Self::from_static(StaticProbe::native())
    }
}
