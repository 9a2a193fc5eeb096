//! UPnP renderer adapter configuration.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for the UPnP `RenderingControl` adapter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpnpConfig {
    /// Control port used when a device address carries none.
    pub control_port: u16,
    /// HTTP path of the `RenderingControl` control endpoint.
    pub control_path: String,
    /// `InstanceID` argument sent with every call.
    pub instance_id: u32,
    /// `Channel` argument sent with every call.
    pub channel: String,
    /// Per-request timeout, in seconds.
    pub timeout_secs: u16,
    /// Step applied by `volume_up` / `volume_down` when none is given.
    pub default_step: i64,
}

impl UpnpConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout_secs))
    }
}

impl Default for UpnpConfig {
    fn default() -> Self {
        Self {
            control_port: 2870,
            control_path: "/control/RenderingControl".to_string(),
            instance_id: 0,
            channel: "Master".to_string(),
            timeout_secs: 3,
            default_step: 5,
        }
    }
}
