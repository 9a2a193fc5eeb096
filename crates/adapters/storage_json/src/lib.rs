//! # lanhub-adapter-storage-json
//!
//! JSON file persistence for the device registry.
//!
//! ## Responsibilities
//! - Implement the [`DeviceStore`](lanhub_app::ports::DeviceStore) port
//! - Map between domain [`Device`](lanhub_domain::device::Device) values and
//!   the on-disk record format
//! - Replace the devices file atomically on every save
//!
//! ## File format
//! A single JSON object mapping device id to a record with exactly the fields
//! `id`, `name`, `type`, `address` and `meta`, written with two-space
//! indentation.
//!
//! ## Dependency rule
//! Depends on `lanhub-app` (for the port trait) and `lanhub-domain` (for domain
//! types). The `app` and `domain` crates must never reference this adapter.

mod error;
mod store;

pub use error::StorageError;
pub use store::JsonFileStore;
