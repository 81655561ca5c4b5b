//! Capability detection: decides whether a persistent WebSocket may be
//! attempted in the current environment.
//!
//! Ambient reads go through the [`EnvironmentProbe`] trait; the policy
//! lives in [`CapabilityDetector`].

pub mod detector;
pub mod probe;

pub use detector::{CapabilityDetector, CapabilityReport};
pub use probe::{DisplayMode, EnvironmentProbe, StaticProbe};
