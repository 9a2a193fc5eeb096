//! JSON API handler modules.

pub mod actions;
pub mod adapters;
#[allow(clippy::missing_errors_doc)]
pub mod devices;

use axum::Router;
use axum::routing::get;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Devices
        .route("/devices", get(devices::list))
        .route("/devices/{id}", get(devices::get))
        // Capabilities
        .route("/adapters", get(adapters::list))
        // Actions
        .route(
            "/device/{id}/action/{action}",
            get(actions::perform).post(actions::perform),
        )
}
