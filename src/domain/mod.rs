//! Relay domain: stamped events, the broadcast bus feeding push clients and
//! the bounded log feeding polling clients.

pub mod event_bus;
pub mod event_log;
pub mod relay_event;

pub use event_bus::EventBus;
pub use event_log::EventLog;
pub use relay_event::RelayEvent;
