//! Retained liveness beacon on the namespace status topic.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use panel_bus::Bus;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::BridgeError;
use crate::part::{Part, PartState};

/// Liveness states written to the status topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeStatus {
    Online,
    Offline,
}

impl BridgeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BridgeStatus::Online => "online",
            BridgeStatus::Offline => "offline",
        }
    }
}

impl std::fmt::Display for BridgeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publishes a retained `online` beacon immediately on start and on every
/// interval tick after that, and a retained `offline` on stop. Retained
/// delivery lets a companion subscribing late still learn the current state.
pub struct StatusAnnouncer {
    state: PartState,
    bus: Arc<dyn Bus>,
    topic: String,
    interval: Duration,
    beacon: Mutex<Option<JoinHandle<()>>>,
}

impl StatusAnnouncer {
    pub fn new(bus: Arc<dyn Bus>, topic: impl Into<String>, interval: Duration) -> Self {
        Self {
            state: PartState::new(),
            bus,
            topic: topic.into(),
            interval,
            beacon: Mutex::new(None),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// One retained status publish. Failures are logged and absorbed so the
    /// beacon keeps its cadence.
    fn announce(bus: &dyn Bus, topic: &str, status: BridgeStatus) {
        let payload = Bytes::from_static(status.as_str().as_bytes());
        if let Err(err) = bus.publish_retained(topic, payload) {
            warn!(
                target = "panel.status",
                topic,
                status = %status,
                error = %err,
                "status publish failed"
            );
        }
    }
}

impl Part for StatusAnnouncer {
    fn part_name(&self) -> &'static str {
        "status-announcer"
    }

    fn part_state(&self) -> &PartState {
        &self.state
    }

    fn start_part(&self) -> Result<(), BridgeError> {
        Self::announce(self.bus.as_ref(), &self.topic, BridgeStatus::Online);
        debug!(
            target = "panel.status",
            topic = %self.topic,
            interval_secs = self.interval.as_secs(),
            "beacon started"
        );
        let bus = self.bus.clone();
        let topic = self.topic.clone();
        // Built before the spawn: the ticker's epoch is this call, not the
        // task's first poll.
        let mut ticker = tokio::time::interval(self.interval);
        *self.beacon.lock() = Some(tokio::spawn(async move {
            // The first tick fires immediately; the start publish above
            // already covered it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                Self::announce(bus.as_ref(), &topic, BridgeStatus::Online);
            }
        }));
        Ok(())
    }

    fn stop_part(&self) -> Result<(), BridgeError> {
        if let Some(task) = self.beacon.lock().take() {
            task.abort();
        }
        Self::announce(self.bus.as_ref(), &self.topic, BridgeStatus::Offline);
        Ok(())
    }
}

impl Drop for StatusAnnouncer {
    fn drop(&mut self) {
        if let Some(task) = self.beacon.lock().take() {
            task.abort();
        }
    }
}
