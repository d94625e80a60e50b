//! Command and event traffic for one resolved panel instance.

use std::sync::Arc;

use bytes::Bytes;
use panel_bus::{Bus, BusError};
use panel_proto::{PanelCommand, PanelEvent, decode_event, preview, vocab};
use parking_lot::Mutex;
use tracing::{debug, warn};

/// Topics a bridge instance talks on. `status` is namespace-level and shared
/// by every instance under the same namespace; the rest derive from the
/// resolved instance name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSet {
    pub prefix: String,
    pub command: String,
    pub receive: String,
    pub status: String,
}

impl TopicSet {
    /// Namespace-level liveness topic.
    pub fn status_topic(namespace: &str) -> String {
        format!("{namespace}/status")
    }

    /// Derives the per-instance topics. A single trailing slash on the
    /// instance name is dropped so `living_room/` and `living_room` map to
    /// the same prefix.
    pub fn for_instance(namespace: &str, instance: &str) -> Self {
        let mut prefix = format!("{namespace}/{instance}");
        if prefix.ends_with('/') {
            prefix.pop();
        }
        let command = format!("{prefix}/cmd");
        let receive = format!("{prefix}/recv");
        let status = Self::status_topic(namespace);
        Self {
            prefix,
            command,
            receive,
            status,
        }
    }
}

/// Outbound command path plus the forgiving inbound decode for one panel.
///
/// Consecutive identical commands are suppressed unless forced. The dedup
/// memory lives and dies with the channel, so a restart always transmits its
/// first command.
pub struct CommandChannel {
    bus: Arc<dyn Bus>,
    topics: TopicSet,
    prev_cmd: Mutex<Option<String>>,
}

impl CommandChannel {
    pub fn new(bus: Arc<dyn Bus>, topics: TopicSet) -> Self {
        Self {
            bus,
            topics,
            prev_cmd: Mutex::new(None),
        }
    }

    pub fn topics(&self) -> &TopicSet {
        &self.topics
    }

    /// Sends one command to the panel. Unknown names are logged but sent
    /// anyway. A repeat of the previous record is dropped unless `force` is
    /// set; the record becomes the new "previous" whether or not the publish
    /// succeeded. The lock is held across compare, publish and remember so
    /// concurrent senders keep a coherent ordering.
    pub fn send(&self, cmd: &str, value: &str, force: bool) -> Result<(), BusError> {
        if !vocab::is_known_command(cmd) {
            warn!(
                target = "panel.channel",
                command = cmd,
                content = value,
                "unknown command, sending anyway"
            );
        }
        let record = PanelCommand::new(cmd, value)
            .encode()
            .map_err(|err| BusError::Transport(format!("command encode failed: {err}")))?;
        let mut prev = self.prev_cmd.lock();
        if !force && prev.as_deref() == Some(record.as_str()) {
            debug!(
                target = "panel.channel",
                command = cmd,
                "dropping identical consecutive command"
            );
            return Ok(());
        }
        let outcome = self
            .bus
            .publish(&self.topics.command, Bytes::from(record.clone()));
        if let Err(err) = &outcome {
            warn!(
                target = "panel.channel",
                topic = %self.topics.command,
                error = %err,
                "command publish failed"
            );
        }
        *prev = Some(record);
        outcome
    }

    /// Decodes one payload from the receive topic. Empty payloads are
    /// dropped silently, malformed JSON is logged and dropped, and anything
    /// that parses becomes an event even when its name is outside the
    /// advisory vocabulary.
    pub fn on_message(&self, payload: &str) -> Option<PanelEvent> {
        if payload.is_empty() {
            return None;
        }
        let event = match decode_event(payload) {
            Ok(event) => event,
            Err(err) => {
                warn!(
                    target = "panel.channel",
                    error = %err,
                    payload = %preview(payload),
                    "got invalid json from panel"
                );
                return None;
            }
        };
        if !vocab::is_known_event(&event.name) {
            warn!(
                target = "panel.channel",
                event = %event.name,
                content = %event.value_str(),
                "unknown event, forwarding anyway"
            );
        }
        Some(event)
    }
}
