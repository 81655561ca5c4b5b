//! Service layer: relay orchestration.
//!
//! [`RelayService`] records published events in the
//! [`super::domain::EventLog`] and fans them out through the
//! [`super::domain::EventBus`].

pub mod relay_service;

pub use relay_service::RelayService;
