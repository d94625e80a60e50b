use bytes::Bytes;
use thiserror::Error;
use tokio::sync::broadcast;

/// A single message flowing over the panel bus. `retain` marks messages the
/// transport should store and replay to late subscribers (MQTT-style).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusMessage {
    pub topic: String,
    pub payload: Bytes,
    pub retain: bool,
}

#[derive(Debug, Error)]
pub enum BusError {
    #[error("bus channel closed")]
    Closed,
    #[error("bus transport error: {0}")]
    Transport(String),
}

pub type BusResult<T> = Result<T, BusError>;

/// Transport abstraction the bridge talks through. Subscribing is a request
/// to the underlying transport and may fail; publishing is fire-and-forget
/// from the caller's viewpoint.
pub trait Bus: Send + Sync {
    fn subscribe(&self, topic: &str) -> BusResult<broadcast::Receiver<BusMessage>>;
    fn publish(&self, topic: &str, payload: Bytes) -> BusResult<()>;
    fn publish_retained(&self, topic: &str, payload: Bytes) -> BusResult<()>;
}

/// Simple in-memory bus for tests and non-transport contexts. Keeps the last
/// retained message per topic so tests can observe beacon persistence.
#[derive(Debug, Default)]
pub struct LocalBus {
    topics: parking_lot::RwLock<std::collections::HashMap<String, broadcast::Sender<BusMessage>>>,
    retained: parking_lot::RwLock<std::collections::HashMap<String, BusMessage>>,
}

impl LocalBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn sender_for(&self, topic: &str) -> broadcast::Sender<BusMessage> {
        let mut guard = self.topics.write();
        guard
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(64).0)
            .clone()
    }

    /// Last retained message published on `topic`, if any.
    pub fn retained(&self, topic: &str) -> Option<BusMessage> {
        self.retained.read().get(topic).cloned()
    }

    fn deliver(&self, msg: BusMessage) -> BusResult<()> {
        if msg.retain {
            self.retained.write().insert(msg.topic.clone(), msg.clone());
        }
        // A publish with no live subscribers still succeeds; the message is
        // simply dropped (retained copies stay queryable).
        let _ = self.sender_for(&msg.topic).send(msg);
        Ok(())
    }
}

impl Bus for LocalBus {
    fn subscribe(&self, topic: &str) -> BusResult<broadcast::Receiver<BusMessage>> {
        Ok(self.sender_for(topic).subscribe())
    }

    fn publish(&self, topic: &str, payload: Bytes) -> BusResult<()> {
        self.deliver(BusMessage {
            topic: topic.to_string(),
            payload,
            retain: false,
        })
    }

    fn publish_retained(&self, topic: &str, payload: Bytes) -> BusResult<()> {
        self.deliver(BusMessage {
            topic: topic.to_string(),
            payload,
            retain: true,
        })
    }
}
