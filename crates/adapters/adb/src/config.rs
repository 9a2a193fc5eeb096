//! Debug-bridge adapter configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// mDNS service type announced by devices accepting wireless debugging.
pub const SERVICE_TYPE: &str = "_adb-tls-connect._tcp.local.";

/// Configuration for the debug-bridge adapter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdbConfig {
    /// Path to the `adb` executable.
    pub binary: PathBuf,
    /// Upper bound for every `adb` invocation, in seconds.
    pub command_timeout_secs: u16,
    /// How long discovery listens for announcements, in seconds.
    pub discovery_window_secs: u16,
    /// mDNS service type to browse.
    pub service_type: String,
    /// Maximum number of characters of `status` output returned.
    pub status_output_limit: usize,
}

impl AdbConfig {
    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.command_timeout_secs))
    }

    #[must_use]
    pub fn discovery_window(&self) -> Duration {
        Duration::from_secs(u64::from(self.discovery_window_secs))
    }
}

impl Default for AdbConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("/opt/platform-tools/adb"),
            command_timeout_secs: 5,
            discovery_window_secs: 3,
            service_type: SERVICE_TYPE.to_string(),
            status_output_limit: 4000,
        }
    }
}
