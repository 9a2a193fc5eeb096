//! Shared application state for axum handlers.

use std::sync::Arc;

use lanhub_app::services::action_router::ActionRouter;
use lanhub_app::services::adapter_directory::AdapterDirectory;
use lanhub_app::services::device_registry::DeviceRegistry;

/// Application state shared across all axum handlers.
///
/// Every field is an `Arc`, so cloning the state per request is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Persistent device records.
    pub registry: Arc<DeviceRegistry>,
    /// Type → adapter lookup, for capability listings.
    pub directory: Arc<AdapterDirectory>,
    /// Dispatches actions and normalizes their results.
    pub router: Arc<ActionRouter>,
}

impl AppState {
    /// Create the state, building an [`ActionRouter`] over the given registry
    /// and directory.
    #[must_use]
    pub fn new(registry: Arc<DeviceRegistry>, directory: Arc<AdapterDirectory>) -> Self {
        let router = Arc::new(ActionRouter::new(
            Arc::clone(&registry),
            Arc::clone(&directory),
        ));
        Self {
            registry,
            directory,
            router,
        }
    }
}
