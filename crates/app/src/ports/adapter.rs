//! Protocol adapter port: discovery and action execution for one device family.
//!
//! An adapter bridges a control protocol (debug bridge, UPnP, …) into the hub.
//! It owns every device whose `type` equals its [`device_type`](ProtocolAdapter::device_type),
//! enumerates those devices during a discovery sweep, and executes actions
//! against them.

use async_trait::async_trait;

use lanhub_domain::action::{ActionDescriptor, ActionParams, Envelope};
use lanhub_domain::device::Device;
use lanhub_domain::error::LanHubError;

use crate::services::device_registry::DeviceRegistry;

/// A pluggable device-family integration.
///
/// Implementations live in adapter crates (e.g. `lanhub-adapter-adb`) and are
/// registered once at start-up in the
/// [`AdapterDirectory`](crate::services::adapter_directory::AdapterDirectory).
///
/// Adapters are expected to turn every fault of their own protocol calls into
/// an `{ok: false, error}` [`Envelope`]. An `Err` returned from
/// [`execute`](Self::execute) is still converted by the router, but it loses
/// the adapter's diagnostics.
#[async_trait]
pub trait ProtocolAdapter: Send + Sync {
    /// Type tag of the devices this adapter owns (e.g. `"gtv"`).
    fn device_type(&self) -> &'static str;

    /// Human-readable name of the device family.
    fn friendly_name(&self) -> &'static str;

    /// Whether [`discover`](Self::discover) actively enumerates devices.
    ///
    /// A discovery sweep only clears the registry entries of types whose
    /// adapter returns `true`, so devices of passive families can only be
    /// seeded manually and are never dropped by a sweep.
    fn has_discovery(&self) -> bool {
        true
    }

    /// Enumerate reachable devices of this family and upsert each one into
    /// `registry`. Must finish within a bounded window and tolerate finding
    /// nothing.
    ///
    /// Returns the number of devices upserted.
    ///
    /// # Errors
    ///
    /// Returns an error when the discovery mechanism itself cannot run or the
    /// registry cannot persist a discovered device.
    async fn discover(&self, registry: &DeviceRegistry) -> Result<usize, LanHubError>;

    /// Actions this adapter understands, for capability introspection.
    fn actions(&self) -> &'static [ActionDescriptor];

    /// Perform one action against `device`.
    ///
    /// Unknown action names are reported as `{ok: false, error}` envelopes,
    /// not as errors.
    ///
    /// # Errors
    ///
    /// Returns an error only for faults the adapter could not express as an
    /// envelope.
    async fn execute(
        &self,
        registry: &DeviceRegistry,
        device: &Device,
        action: &str,
        params: &ActionParams,
    ) -> Result<Envelope, LanHubError>;
}
