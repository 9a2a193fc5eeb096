//! # lanhub-domain
//!
//! Pure domain model for the lanhub device-control hub.
//!
//! ## Responsibilities
//! - Define **Devices** (persisted records describing one controllable endpoint
//!   and the adapter type that owns it)
//! - Define the **action envelope** every adapter result is normalized into
//! - Define **action parameters** and **action descriptors** shared by adapters
//! - Define the error taxonomy used across the workspace
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod action;
pub mod device;
pub mod error;
