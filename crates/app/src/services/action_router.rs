//! Action router: resolve a device and its adapter, run one action, and
//! normalize whatever comes back into an [`Envelope`].

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt as _;

use lanhub_domain::action::{ActionParams, Envelope};
use lanhub_domain::error::NotFoundError;

use crate::services::adapter_directory::AdapterDirectory;
use crate::services::device_registry::DeviceRegistry;

/// Dispatches actions to the adapter owning each device.
///
/// The router does not know which actions exist: unknown names are passed
/// through and reported by the adapter itself.
pub struct ActionRouter {
    registry: Arc<DeviceRegistry>,
    directory: Arc<AdapterDirectory>,
}

impl ActionRouter {
    #[must_use]
    pub fn new(registry: Arc<DeviceRegistry>, directory: Arc<AdapterDirectory>) -> Self {
        Self {
            registry,
            directory,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<DeviceRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn directory(&self) -> &Arc<AdapterDirectory> {
        &self.directory
    }

    /// Perform `action` on the device `dev_id`.
    ///
    /// Never fails: unknown devices and types yield envelopes tagged with a
    /// [`FailureKind`](lanhub_domain::action::FailureKind), and adapter errors
    /// or panics become `{ok: false, error}`.
    #[tracing::instrument(skip(self, params))]
    pub async fn route(&self, dev_id: &str, action: &str, params: &ActionParams) -> Envelope {
        let Some(device) = self.registry.get(dev_id) else {
            tracing::debug!("unknown device");
            return Envelope::device_not_found(&NotFoundError {
                entity: "Device",
                id: dev_id.to_string(),
            });
        };

        let Some(adapter) = self.directory.get(&device.device_type) else {
            tracing::warn!(device_type = %device.device_type, "no adapter registered for device type");
            return Envelope::no_adapter(&device.device_type);
        };

        let execution = adapter.execute(&self.registry, &device, action, params);
        match AssertUnwindSafe(execution).catch_unwind().await {
            Ok(Ok(envelope)) => {
                if !envelope.ok {
                    tracing::info!(error = envelope.error(), "action reported failure");
                }
                envelope
            }
            Ok(Err(err)) => {
                let message = err.describe();
                tracing::error!(error = %message, "adapter failed");
                Envelope::failure(message)
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::error!(error = %message, "adapter panicked");
                Envelope::failure(message)
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("adapter panicked: {message}")
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("adapter panicked: {message}")
    } else {
        "adapter panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{DeviceStore, ProtocolAdapter};
    use crate::testing::{FakeAdapter, InMemoryStore, device};
    use lanhub_domain::action::FailureKind;
    use std::sync::atomic::Ordering;

    struct Fixture {
        adapter: Arc<FakeAdapter>,
        router: ActionRouter,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::with(vec![
            device("tv", "gtv"),
            device("fridge", "fridge"),
        ]));
        let registry = Arc::new(DeviceRegistry::open(store as Arc<dyn DeviceStore>).await);
        let adapter = Arc::new(FakeAdapter::new("gtv"));
        let directory = Arc::new(
            AdapterDirectory::builder()
                .register_shared(Arc::clone(&adapter) as Arc<dyn ProtocolAdapter>)
                .build(),
        );
        Fixture {
            adapter,
            router: ActionRouter::new(registry, directory),
        }
    }

    #[tokio::test]
    async fn should_report_not_found_without_invoking_adapter() {
        let fx = fixture().await;

        let envelope = fx
            .router
            .route("no-such-id", "button", &ActionParams::new())
            .await;

        assert!(!envelope.ok);
        assert_eq!(envelope.kind, Some(FailureKind::DeviceNotFound));
        assert_eq!(envelope.error(), Some("Unknown device no-such-id"));
        assert_eq!(fx.adapter.execute_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn should_report_missing_adapter_for_unregistered_type() {
        let fx = fixture().await;

        let envelope = fx.router.route("fridge", "ping", &ActionParams::new()).await;

        assert!(!envelope.ok);
        assert_eq!(envelope.kind, Some(FailureKind::NoAdapter));
        assert_eq!(envelope.error(), Some("No adapter for type fridge"));
    }

    #[tokio::test]
    async fn should_relay_adapter_envelope_verbatim() {
        let fx = fixture().await;

        let envelope = fx.router.route("tv", "ping", &ActionParams::new()).await;

        assert_eq!(envelope, Envelope::success().with("pong", "tv"));
        assert_eq!(fx.adapter.execute_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn should_let_adapter_report_unknown_actions() {
        let fx = fixture().await;

        let envelope = fx.router.route("tv", "self_destruct", &ActionParams::new()).await;

        assert!(!envelope.ok);
        assert!(envelope.kind.is_none());
        assert_eq!(envelope.error(), Some("Unknown action self_destruct"));
    }

    #[tokio::test]
    async fn should_convert_adapter_error_into_failure_envelope() {
        let fx = fixture().await;

        let envelope = fx.router.route("tv", "fail", &ActionParams::new()).await;

        assert!(!envelope.ok);
        assert_eq!(envelope.error(), Some("adapter error: wire cut"));
    }

    #[tokio::test]
    async fn should_convert_adapter_panic_into_failure_envelope() {
        let fx = fixture().await;

        let envelope = fx.router.route("tv", "panic", &ActionParams::new()).await;

        assert!(!envelope.ok);
        assert_eq!(envelope.error(), Some("adapter panicked: adapter bug"));
    }

    #[test]
    fn should_describe_opaque_panic_payload() {
        let payload: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(payload.as_ref()), "adapter panicked");
    }
}
