/// Capabilities the owning application provides to the bridge, resolved at
/// construction rather than probed at runtime.
pub trait HostApp: Send + Sync {
    /// Name of this bridge instance, when the host knows it. Blank names
    /// count as unavailable and fall through to `device_name`.
    fn instance_name(&self) -> Option<String>;

    /// Device-reported name used when the host cannot supply one.
    fn device_name(&self) -> Option<String> {
        None
    }
}

/// Fixed-name host for tests, demos and embedders with static wiring.
#[derive(Debug, Clone, Default)]
pub struct StaticHost {
    instance: Option<String>,
    device: Option<String>,
}

impl StaticHost {
    pub fn named(instance: impl Into<String>) -> Self {
        Self {
            instance: Some(instance.into()),
            device: None,
        }
    }

    pub fn unnamed() -> Self {
        Self::default()
    }

    pub fn with_device_name(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }
}

impl HostApp for StaticHost {
    fn instance_name(&self) -> Option<String> {
        self.instance.clone()
    }

    fn device_name(&self) -> Option<String> {
        self.device.clone()
    }
}
