//! Test doubles shared by the unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use bytes::Bytes;
use panel_bus::{Bus, BusError, BusMessage, BusResult, LocalBus};
use parking_lot::Mutex;
use tokio::sync::broadcast;

/// Bus wrapper that records every successful publish and can be told to
/// reject publishes or subscriptions on demand. Traffic still flows through
/// the inner `LocalBus`, so subscribers and the retained store behave as
/// usual.
#[derive(Default)]
pub struct RecordingBus {
    inner: LocalBus,
    sent: Mutex<Vec<BusMessage>>,
    attempts: AtomicUsize,
    fail_publish: AtomicBool,
    fail_subscribe: AtomicBool,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages published on `topic`, in order.
    pub fn sent_on(&self, topic: &str) -> Vec<BusMessage> {
        self.sent
            .lock()
            .iter()
            .filter(|msg| msg.topic == topic)
            .cloned()
            .collect()
    }

    /// Publish calls made, failed ones included.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn retained(&self, topic: &str) -> Option<BusMessage> {
        self.inner.retained(topic)
    }

    pub fn fail_publishes(&self, fail: bool) {
        self.fail_publish.store(fail, Ordering::SeqCst);
    }

    pub fn fail_subscriptions(&self, fail: bool) {
        self.fail_subscribe.store(fail, Ordering::SeqCst);
    }

    fn record(&self, topic: &str, payload: &Bytes, retain: bool) -> BusResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_publish.load(Ordering::SeqCst) {
            return Err(BusError::Transport("publish rejected".into()));
        }
        self.sent.lock().push(BusMessage {
            topic: topic.to_string(),
            payload: payload.clone(),
            retain,
        });
        Ok(())
    }
}

impl Bus for RecordingBus {
    fn subscribe(&self, topic: &str) -> BusResult<broadcast::Receiver<BusMessage>> {
        if self.fail_subscribe.load(Ordering::SeqCst) {
            return Err(BusError::Transport("subscribe rejected".into()));
        }
        self.inner.subscribe(topic)
    }

    fn publish(&self, topic: &str, payload: Bytes) -> BusResult<()> {
        self.record(topic, &payload, false)?;
        self.inner.publish(topic, payload)
    }

    fn publish_retained(&self, topic: &str, payload: Bytes) -> BusResult<()> {
        self.record(topic, &payload, true)?;
        self.inner.publish_retained(topic, payload)
    }
}
