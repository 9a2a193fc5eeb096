//! Debug-bridge adapter error types.

use std::path::PathBuf;
use std::time::Duration;

use lanhub_domain::error::LanHubError;

/// Errors specific to the debug-bridge adapter.
#[derive(Debug, thiserror::Error)]
pub enum AdbError {
    /// The `adb` executable could not be started.
    #[error("failed to run {}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An `adb` invocation did not finish in time.
    #[error("adb command timed out after {}s", timeout.as_secs())]
    Timeout { timeout: Duration },

    /// The mDNS daemon could not be started or browsed.
    #[error("mDNS discovery error")]
    Mdns(#[from] mdns_sd::Error),

    /// The blocking discovery task did not complete.
    #[error("discovery task failed")]
    Join(#[from] tokio::task::JoinError),
}

impl AdbError {
    /// Convert into a [`LanHubError`] for propagation across port boundaries.
    #[must_use]
    pub fn into_domain(self) -> LanHubError {
        LanHubError::Adapter(Box::new(self))
    }
}

impl From<AdbError> for LanHubError {
    fn from(err: AdbError) -> Self {
        err.into_domain()
    }
}
