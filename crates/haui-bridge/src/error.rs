use panel_bus::BusError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// The operation needs the configured channel `start()` installs.
    #[error("bridge is not started")]
    NotStarted,
    #[error(transparent)]
    Bus(#[from] BusError),
}
