//! Application services: the routing core.
//!
//! Services receive their collaborators through constructors (an `Arc`-ed
//! store, registry, or directory), keeping this layer decoupled from concrete
//! adapters.

pub mod action_router;
pub mod adapter_directory;
pub mod device_registry;
pub mod discovery_sweep;
