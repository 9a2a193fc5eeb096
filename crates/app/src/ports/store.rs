//! Storage port: whole-set persistence for device records.
//!
//! The registry never persists individual records: every mutation hands the
//! complete device set to [`DeviceStore::save`], and every refresh reads the
//! complete set back with [`DeviceStore::load`].

use async_trait::async_trait;

use lanhub_domain::device::Device;
use lanhub_domain::error::LanHubError;

/// Backing store for the [`DeviceRegistry`](crate::services::device_registry::DeviceRegistry).
#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// Read every persisted device.
    ///
    /// A store that does not exist yet must yield an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`LanHubError::Storage`] when the store exists but cannot be
    /// read or does not have the expected shape.
    async fn load(&self) -> Result<Vec<Device>, LanHubError>;

    /// Replace the persisted contents with `devices`.
    ///
    /// # Errors
    ///
    /// Returns [`LanHubError::Storage`] when the store cannot be written.
    async fn save(&self, devices: &[Device]) -> Result<(), LanHubError>;
}
