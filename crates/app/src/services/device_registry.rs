//! Device registry: the single source of truth for known devices.
//!
//! Every mutation computes the next device set, persists it through the
//! [`DeviceStore`], and only then publishes it in memory, so a failed write
//! never leaves the registry ahead of the store.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::Mutex;

use lanhub_domain::device::Device;
use lanhub_domain::error::LanHubError;

use crate::ports::DeviceStore;

type DeviceMap = BTreeMap<String, Device>;

/// Persistent keyed collection of [`Device`] records.
///
/// Reads (`all`, `get`) take a short read lock and never wait on the store.
/// Mutations are serialized in-process by an async write guard held across
/// the read-modify-persist sequence. Writers in other processes sharing the
/// same store are not coordinated: the last save wins.
pub struct DeviceRegistry {
    store: Arc<dyn DeviceStore>,
    devices: RwLock<DeviceMap>,
    write_guard: Mutex<()>,
}

impl DeviceRegistry {
    /// Create an empty registry backed by `store`, without reading it.
    #[must_use]
    pub fn new(store: Arc<dyn DeviceStore>) -> Self {
        Self {
            store,
            devices: RwLock::new(DeviceMap::new()),
            write_guard: Mutex::new(()),
        }
    }

    /// Create a registry and populate it from `store`.
    pub async fn open(store: Arc<dyn DeviceStore>) -> Self {
        let registry = Self::new(store);
        registry.load().await;
        registry
    }

    /// Replace the in-memory set with the store's contents.
    ///
    /// A store that cannot be read or parsed yields an empty registry and a
    /// warning; the caller never sees the failure. Safe to call repeatedly to
    /// pick up writes made by other processes.
    ///
    /// Returns the number of devices loaded.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self) -> usize {
        let _guard = self.write_guard.lock().await;
        let devices = match self.store.load().await {
            Ok(devices) => index(devices),
            Err(err) => {
                tracing::warn!(
                    error = %err.describe(),
                    "device store unreadable, continuing with an empty registry"
                );
                DeviceMap::new()
            }
        };
        let count = devices.len();
        self.publish(devices);
        tracing::debug!(count, "device registry loaded");
        count
    }

    /// Persist the current device set, replacing the store's contents.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    #[tracing::instrument(skip(self))]
    pub async fn save(&self) -> Result<(), LanHubError> {
        let _guard = self.write_guard.lock().await;
        let devices = self.snapshot();
        self.persist(&devices).await
    }

    /// Every known device, sorted by id.
    #[must_use]
    pub fn all(&self) -> Vec<Device> {
        self.read(|devices| devices.values().cloned().collect())
    }

    /// The device with `id`, if any.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Device> {
        self.read(|devices| devices.get(id).cloned())
    }

    /// Number of known devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read(BTreeMap::len)
    }

    /// Whether no device is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert `device`, replacing any record with the same id, then persist.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the store cannot be written; the
    /// in-memory set is left unchanged in that case.
    #[tracing::instrument(skip(self, device), fields(device_id = %device.id, device_type = %device.device_type))]
    pub async fn upsert(&self, device: Device) -> Result<(), LanHubError> {
        let _guard = self.write_guard.lock().await;
        let mut next = self.snapshot();
        next.insert(device.id.clone(), device);
        self.persist(&next).await?;
        self.publish(next);
        Ok(())
    }

    /// Remove every device of `device_type`, then persist.
    ///
    /// The store is written even when nothing matched. Returns the number of
    /// devices removed.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the store cannot be written; the
    /// in-memory set is left unchanged in that case.
    #[tracing::instrument(skip(self))]
    pub async fn remove_type(&self, device_type: &str) -> Result<usize, LanHubError> {
        let _guard = self.write_guard.lock().await;
        let mut next = self.snapshot();
        let before = next.len();
        next.retain(|_, device| device.device_type != device_type);
        let removed = before - next.len();
        self.persist(&next).await?;
        self.publish(next);
        tracing::debug!(removed, "devices removed");
        Ok(removed)
    }

    async fn persist(&self, devices: &DeviceMap) -> Result<(), LanHubError> {
        let records: Vec<Device> = devices.values().cloned().collect();
        self.store.save(&records).await
    }

    fn snapshot(&self) -> DeviceMap {
        self.read(Clone::clone)
    }

    fn read<T>(&self, f: impl FnOnce(&DeviceMap) -> T) -> T {
        let devices = self
            .devices
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&devices)
    }

    fn publish(&self, next: DeviceMap) {
        let mut devices = self
            .devices
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *devices = next;
    }
}

fn index(devices: Vec<Device>) -> DeviceMap {
    devices
        .into_iter()
        .map(|device| (device.id.clone(), device))
        .collect()
}
