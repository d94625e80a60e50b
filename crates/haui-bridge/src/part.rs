//! Two-phase lifecycle shared by every managed part of the bridge.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, error, warn};

use crate::error::BridgeError;

/// Started/stopped flag for a managed part. Transitions are claimed by
/// compare-exchange so concurrent `start`/`stop` calls run each hook at most
/// once per transition without holding a lock across user code.
#[derive(Debug, Default)]
pub struct PartState {
    started: AtomicBool,
}

impl PartState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    fn claim_start(&self) -> bool {
        self.started
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn claim_stop(&self) -> bool {
        self.started
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

/// A part of the bridge with idempotent start/stop semantics.
///
/// `start` flips the started flag *before* running the hook, so a failing
/// hook leaves the part flagged started and repeated `start` calls cannot
/// retry it; the owner resolves the half-open state with `stop`. The
/// customization points are `start_part`/`stop_part`; nothing else is
/// overridable.
pub trait Part: Send + Sync {
    fn part_name(&self) -> &'static str;

    fn part_state(&self) -> &PartState;

    /// Startup hook. Runs once per start cycle, after the flag flips true.
    fn start_part(&self) -> Result<(), BridgeError> {
        Ok(())
    }

    /// Shutdown hook. Runs once per stop cycle.
    fn stop_part(&self) -> Result<(), BridgeError> {
        Ok(())
    }

    fn is_started(&self) -> bool {
        self.part_state().is_started()
    }

    /// Starts the part. A no-op when already started; a hook failure is
    /// logged and propagated to the owner.
    fn start(&self) -> Result<(), BridgeError> {
        if !self.part_state().claim_start() {
            debug!(part = self.part_name(), "already started, skipping");
            return Ok(());
        }
        debug!(part = self.part_name(), "starting");
        if let Err(err) = self.start_part() {
            error!(part = self.part_name(), error = %err, "start hook failed");
            return Err(err);
        }
        Ok(())
    }

    /// Stops the part. A no-op when not started. Hook failures are logged
    /// and absorbed; the part ends stopped either way.
    fn stop(&self) {
        if !self.part_state().claim_stop() {
            return;
        }
        debug!(part = self.part_name(), "stopping");
        if let Err(err) = self.stop_part() {
            warn!(part = self.part_name(), error = %err, "stop hook failed");
        }
    }
}
