//! Runs a bridge against an in-memory bus with a scripted panel on the
//! other side, printing the full command/event/beacon flow without a
//! broker:
//!
//! ```sh
//! cargo run -p haui-bridge --example loopback
//! ```

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use haui_bridge::{BridgeConfig, BridgeController, EventHandler, Part, StaticHost, telemetry};
use panel_bus::{Bus, LocalBus};
use serde_json::json;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = BridgeConfig::from_env();
    telemetry::init_tracing(&config.log_filter);

    let bus = Arc::new(LocalBus::new());
    let handler: EventHandler = Arc::new(|event| {
        println!("panel event: {} = {}", event.name, event.value_str());
    });

    let bridge = BridgeController::new(
        config,
        bus.clone() as Arc<dyn Bus>,
        Arc::new(StaticHost::named("living_room")),
        handler,
    );
    bridge.start()?;
    let topics = bridge.topics().expect("bridge started");

    // Scripted panel: acknowledge every command with a component event.
    let mut commands = bus.subscribe(&topics.command)?;
    let panel_side = bus.clone();
    let receive_topic = topics.receive.clone();
    let panel = tokio::spawn(async move {
        while let Ok(msg) = commands.recv().await {
            println!("panel got: {}", String::from_utf8_lossy(&msg.payload));
            let reply = json!({"name": "component", "value": "ack"}).to_string();
            let _ = panel_side.publish(&receive_topic, Bytes::from(reply));
        }
    });

    bridge.send_cmd("goto_page", "home", false)?;
    bridge.send_cmd("goto_page", "home", false)?;
    bridge.send_cmd("notify", "hello panel", false)?;
    tokio::time::sleep(Duration::from_millis(100)).await;

    bridge.stop();
    panel.abort();
    if let Some(status) = bus.retained(&topics.status) {
        println!("final status: {}", String::from_utf8_lossy(&status.payload));
    }
    Ok(())
}
