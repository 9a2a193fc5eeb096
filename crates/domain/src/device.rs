//! Device: a persisted record describing one controllable endpoint.
//!
//! A device is owned by exactly one protocol adapter, selected by its
//! [`Device::device_type`] tag. The `address` and `meta` fields are opaque to
//! the core and interpreted only by that adapter.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{LanHubError, ValidationError};

/// A controllable endpoint known to the hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub address: String,
    pub meta: Map<String, Value>,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`LanHubError::Validation`] when `id` or `device_type` is empty.
    pub fn validate(&self) -> Result<(), LanHubError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyId.into());
        }
        if self.device_type.is_empty() {
            return Err(ValidationError::EmptyType.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<String>,
    name: Option<String>,
    device_type: Option<String>,
    address: Option<String>,
    meta: Map<String, Value>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn device_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = Some(device_type.into());
        self
    }

    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    #[must_use]
    pub fn meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// The name defaults to the id when not set.
    ///
    /// # Errors
    ///
    /// Returns [`LanHubError::Validation`] if `id` or `device_type` is missing
    /// or empty.
    pub fn build(self) -> Result<Device, LanHubError> {
        let id = self.id.unwrap_or_default();
        let device = Device {
            name: self.name.unwrap_or_else(|| id.clone()),
            id,
            device_type: self.device_type.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            meta: self.meta,
        };
        device.validate()?;
        Ok(device)
    }
}
