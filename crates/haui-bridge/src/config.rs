use std::time::Duration;

/// Topic namespace every bridge instance lives under.
pub const DEFAULT_NAMESPACE: &str = "nspanel_haui";

/// Instance name of last resort when the host resolves nothing.
pub const DEFAULT_INSTANCE: &str = "nspanel_haui";

pub const DEFAULT_BEACON_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub namespace: String,
    pub beacon_interval: Duration,
    pub log_filter: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.into(),
            beacon_interval: DEFAULT_BEACON_INTERVAL,
            log_filter: "info".into(),
        }
    }
}

impl BridgeConfig {
    /// Reads configuration from the environment. Anything missing or
    /// unparsable falls back to the defaults; startup never fails on
    /// configuration.
    pub fn from_env() -> Self {
        let namespace = std::env::var("HAUI_BRIDGE_NAMESPACE")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.into());
        let beacon_interval = std::env::var("HAUI_BEACON_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_BEACON_INTERVAL);
        let log_filter =
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,haui_bridge=debug".into());
        Self {
            namespace,
            beacon_interval,
            log_filter,
        }
    }
}
