//! Bridge controller tying the lifecycle, channel and announcer together.

use std::sync::Arc;

use panel_bus::{Bus, BusMessage};
use panel_proto::PanelEvent;
use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::announcer::StatusAnnouncer;
use crate::channel::{CommandChannel, TopicSet};
use crate::config::{BridgeConfig, DEFAULT_INSTANCE};
use crate::error::BridgeError;
use crate::host::HostApp;
use crate::part::{Part, PartState};

/// Callback invoked for every decoded panel event.
pub type EventHandler = Arc<dyn Fn(PanelEvent) + Send + Sync>;

/// One bridge instance: resolves its topics at start, pumps inbound panel
/// messages to the event handler, exposes the outbound command path and
/// keeps the status beacon alive for the instance's lifetime.
///
/// The channel (and with it the topic set and dedup memory) is rebuilt on
/// every start cycle, so a host whose name changed between stop and start
/// gets fresh topics.
pub struct BridgeController {
    state: PartState,
    config: BridgeConfig,
    bus: Arc<dyn Bus>,
    host: Arc<dyn HostApp>,
    handler: EventHandler,
    announcer: StatusAnnouncer,
    channel: RwLock<Option<Arc<CommandChannel>>>,
    pump: Mutex<Option<JoinHandle<()>>>,
}

impl BridgeController {
    pub fn new(
        config: BridgeConfig,
        bus: Arc<dyn Bus>,
        host: Arc<dyn HostApp>,
        handler: EventHandler,
    ) -> Self {
        let announcer = StatusAnnouncer::new(
            bus.clone(),
            TopicSet::status_topic(&config.namespace),
            config.beacon_interval,
        );
        Self {
            state: PartState::new(),
            config,
            bus,
            host,
            handler,
            announcer,
            channel: RwLock::new(None),
            pump: Mutex::new(None),
        }
    }

    /// Instance name for topic derivation: host-configured name first, then
    /// the device-reported name, then the namespace default. Blank names
    /// count as absent.
    fn resolve_instance(&self) -> String {
        if let Some(name) = self
            .host
            .instance_name()
            .filter(|name| !name.trim().is_empty())
        {
            return name;
        }
        if let Some(name) = self
            .host
            .device_name()
            .filter(|name| !name.trim().is_empty())
        {
            debug!(target = "panel.bridge", device = %name, "using device name for topics");
            return name;
        }
        warn!(
            target = "panel.bridge",
            fallback = DEFAULT_INSTANCE,
            "no instance or device name, using namespace default"
        );
        DEFAULT_INSTANCE.to_string()
    }

    /// Topic set of the current start cycle, `None` while stopped.
    pub fn topics(&self) -> Option<TopicSet> {
        self.channel
            .read()
            .as_ref()
            .map(|channel| channel.topics().clone())
    }

    /// Sends one command to the panel through the installed channel.
    pub fn send_cmd(&self, cmd: &str, value: &str, force: bool) -> Result<(), BridgeError> {
        let channel = self.channel.read().clone().ok_or(BridgeError::NotStarted)?;
        channel.send(cmd, value, force).map_err(BridgeError::from)
    }
}

impl Part for BridgeController {
    fn part_name(&self) -> &'static str {
        "bridge-controller"
    }

    fn part_state(&self) -> &PartState {
        &self.state
    }

    fn start_part(&self) -> Result<(), BridgeError> {
        let instance = self.resolve_instance();
        let topics = TopicSet::for_instance(&self.config.namespace, &instance);
        debug!(
            target = "panel.bridge",
            prefix = %topics.prefix,
            command = %topics.command,
            receive = %topics.receive,
            "topics resolved"
        );
        let channel = Arc::new(CommandChannel::new(self.bus.clone(), topics.clone()));
        // Installed before the subscription exists, so the pump and any
        // sender observe a configured channel.
        *self.channel.write() = Some(channel.clone());
        self.announcer.start()?;
        let rx = self.bus.subscribe(&topics.receive)?;
        let handler = self.handler.clone();
        *self.pump.lock() = Some(tokio::spawn(pump_events(rx, channel, handler)));
        Ok(())
    }

    fn stop_part(&self) -> Result<(), BridgeError> {
        if let Some(task) = self.pump.lock().take() {
            task.abort();
        }
        *self.channel.write() = None;
        self.announcer.stop();
        Ok(())
    }
}

impl Drop for BridgeController {
    fn drop(&mut self) {
        if let Some(task) = self.pump.lock().take() {
            task.abort();
        }
    }
}

/// Drains the receive subscription, decoding each payload and handing the
/// events to the handler. Ends when the bus side closes.
async fn pump_events(
    mut rx: broadcast::Receiver<BusMessage>,
    channel: Arc<CommandChannel>,
    handler: EventHandler,
) {
    loop {
        match rx.recv().await {
            Ok(msg) => {
                let payload = match std::str::from_utf8(&msg.payload) {
                    Ok(payload) => payload,
                    Err(err) => {
                        warn!(
                            target = "panel.bridge",
                            topic = %msg.topic,
                            error = %err,
                            "invalid utf8 from panel"
                        );
                        continue;
                    }
                };
                if let Some(event) = channel.on_message(payload) {
                    (handler)(event);
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(target = "panel.bridge", skipped, "receive stream lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
