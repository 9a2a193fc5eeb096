//! File-backed implementation of [`DeviceStore`].

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use lanhub_app::ports::DeviceStore;
use lanhub_domain::device::Device;
use lanhub_domain::error::LanHubError;

use crate::error::StorageError;

/// On-disk shape of one device.
///
/// Every field is required and unknown fields are rejected, so a file written
/// by something else fails to parse instead of being half understood.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Record {
    id: String,
    name: String,
    #[serde(rename = "type")]
    device_type: String,
    address: String,
    meta: Map<String, Value>,
}

impl From<Record> for Device {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            name: record.name,
            device_type: record.device_type,
            address: record.address,
            meta: record.meta,
        }
    }
}

impl From<&Device> for Record {
    fn from(device: &Device) -> Self {
        Self {
            id: device.id.clone(),
            name: device.name.clone(),
            device_type: device.device_type.clone(),
            address: device.address.clone(),
            meta: device.meta.clone(),
        }
    }
}

/// Device store persisting the whole set as one JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store for the file at `path`. Nothing is read or created yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    async fn read(&self) -> Result<Vec<Device>, StorageError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "devices file absent");
                return Ok(Vec::new());
            }
            Err(err) => return Err(self.io_error(err)),
        };
        let records: BTreeMap<String, Record> =
            serde_json::from_slice(&raw).map_err(|source| StorageError::Json {
                path: self.path.clone(),
                source,
            })?;
        Ok(records.into_values().map(Device::from).collect())
    }

    async fn write(&self, devices: &[Device]) -> Result<(), StorageError> {
        let records: BTreeMap<&str, Record> = devices
            .iter()
            .map(|device| (device.id.as_str(), Record::from(device)))
            .collect();
        let body = serde_json::to_vec_pretty(&records).map_err(|source| StorageError::Json {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| self.io_error(err))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, body)
            .await
            .map_err(|err| self.io_error(err))?;
        if let Err(err) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(self.io_error(err));
        }
        tracing::debug!(path = %self.path.display(), count = devices.len(), "devices file written");
        Ok(())
    }
}

#[async_trait]
impl DeviceStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<Device>, LanHubError> {
        Ok(self.read().await?)
    }

    async fn save(&self, devices: &[Device]) -> Result<(), LanHubError> {
        Ok(self.write(devices).await?)
    }
}
