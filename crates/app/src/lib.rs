//! # lanhub-app
//!
//! Application layer: the device abstraction and routing core, plus the
//! **port definitions** (traits) adapters implement.
//!
//! ## Responsibilities
//! - Define **port traits** implemented by adapter crates:
//!   - `DeviceStore`: load and save the full device set
//!   - `ProtocolAdapter`: discovery and action execution for one device family
//! - Provide the **services** the front end and the CLI drive:
//!   - `DeviceRegistry`: keyed device records with persist-on-mutation
//!   - `AdapterDirectory`: type → adapter lookup, built once at start
//!   - `ActionRouter`: resolve, dispatch, and normalize action results
//!   - `DiscoverySweep`: type-scoped rediscovery across every adapter
//!
//! ## Dependency rule
//! Depends on `lanhub-domain` only (plus `tokio::sync` for the write guard).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;
