//! Adapter directory: type tag → protocol adapter lookup.
//!
//! The directory is assembled once at start-up from an explicit registration
//! list in the composition root:
//!
//! ```ignore
//! let directory = AdapterDirectory::builder()
//!     .register(AdbAdapter::new(adb_config))
//!     .register(UpnpAdapter::new(upnp_config)?)
//!     .build();
//! ```
//!
//! Adding a device family means writing an adapter crate and adding one
//! `register` call.

use std::collections::HashMap;
use std::sync::Arc;

use lanhub_domain::action::ActionDescriptor;

use crate::ports::ProtocolAdapter;

/// Immutable index of every registered adapter, one instance per type.
pub struct AdapterDirectory {
    adapters: HashMap<&'static str, Arc<dyn ProtocolAdapter>>,
}

impl AdapterDirectory {
    #[must_use]
    pub fn builder() -> AdapterDirectoryBuilder {
        AdapterDirectoryBuilder::default()
    }

    /// The adapter owning `device_type`, if one is registered.
    #[must_use]
    pub fn get(&self, device_type: &str) -> Option<Arc<dyn ProtocolAdapter>> {
        self.adapters.get(device_type).cloned()
    }

    /// Actions declared by the adapter for `device_type`; empty when the type
    /// has no adapter.
    #[must_use]
    pub fn actions_for(&self, device_type: &str) -> &'static [ActionDescriptor] {
        match self.adapters.get(device_type) {
            Some(adapter) => adapter.actions(),
            None => &[],
        }
    }

    /// Registered type tags, sorted.
    #[must_use]
    pub fn types(&self) -> Vec<&'static str> {
        let mut types: Vec<_> = self.adapters.keys().copied().collect();
        types.sort_unstable();
        types
    }

    /// Every adapter, ordered by type tag.
    #[must_use]
    pub fn adapters(&self) -> Vec<Arc<dyn ProtocolAdapter>> {
        self.types()
            .into_iter()
            .filter_map(|device_type| self.get(device_type))
            .collect()
    }

    /// Number of registered adapters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Whether no adapter is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

/// Collects adapters before freezing them into an [`AdapterDirectory`].
#[derive(Default)]
pub struct AdapterDirectoryBuilder {
    adapters: HashMap<&'static str, Arc<dyn ProtocolAdapter>>,
}

impl AdapterDirectoryBuilder {
    /// Register `adapter` under its declared type.
    ///
    /// A later registration for the same type replaces the earlier one.
    #[must_use]
    pub fn register(self, adapter: impl ProtocolAdapter + 'static) -> Self {
        self.register_shared(Arc::new(adapter))
    }

    /// Register an adapter that is already shared.
    #[must_use]
    pub fn register_shared(mut self, adapter: Arc<dyn ProtocolAdapter>) -> Self {
        let device_type = adapter.device_type();
        tracing::debug!(
            device_type,
            name = adapter.friendly_name(),
            "adapter registered"
        );
        if self.adapters.insert(device_type, adapter).is_some() {
            tracing::warn!(device_type, "adapter registered twice, keeping the last one");
        }
        self
    }

    #[must_use]
    pub fn build(self) -> AdapterDirectory {
        AdapterDirectory {
            adapters: self.adapters,
        }
    }
}
