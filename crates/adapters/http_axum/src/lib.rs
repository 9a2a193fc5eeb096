//! # lanhub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the JSON API (`/api/devices`, `/api/adapters`,
//!   `/api/device/{id}/action/{action}`)
//! - Map HTTP requests into registry lookups and routed actions
//! - Relay action envelopes verbatim, choosing the status code from the
//!   envelope (200 when `ok`, 404 unknown device, 400 unknown type, 500
//!   otherwise)
//!
//! ## Dependency rule
//! Depends on `lanhub-app` (for services) and `lanhub-domain` (for domain
//! types used in request/response mapping). Never leaks axum types into the
//! domain.

pub mod api;
mod error;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use state::AppState;
