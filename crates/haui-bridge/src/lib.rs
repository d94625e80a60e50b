//! HAUI Bridge: runtime linking a host automation app to an NSPanel-style
//! panel device over a message bus.
//!
//! Responsibilities:
//! - a two-phase start/stop lifecycle every managed component follows
//! - topic derivation plus outbound command dedup and forgiving inbound
//!   decoding for one panel instance
//! - a retained liveness beacon companion devices can watch
//! - composing the above into a single embedder-facing controller

pub mod announcer;
pub mod channel;
pub mod config;
pub mod controller;
pub mod error;
pub mod host;
pub mod part;
pub mod telemetry;

#[cfg(test)]
mod test_support;

pub use announcer::{BridgeStatus, StatusAnnouncer};
pub use channel::{CommandChannel, TopicSet};
pub use config::BridgeConfig;
pub use controller::{BridgeController, EventHandler};
pub use error::BridgeError;
pub use host::{HostApp, StaticHost};
pub use part::{Part, PartState};
