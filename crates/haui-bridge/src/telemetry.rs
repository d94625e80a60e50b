//! Tracing subscriber setup for binaries and demos.

use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global tracing subscriber. An unparsable filter falls back
/// to `info`; a second call is a no-op so embedding hosts keep whatever
/// subscriber they already installed.
pub fn init_tracing(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let _ = Registry::default()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
