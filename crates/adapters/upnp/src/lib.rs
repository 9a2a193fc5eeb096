//! # lanhub-adapter-upnp
//!
//! UPnP media-renderer adapter (`type = "hisense"`): volume and mute control
//! through SOAP calls to the renderer's `RenderingControl` service.
//!
//! ## How it works
//!
//! Each action is one or two short HTTP round trips to
//! `http://<host>:<port>/control/RenderingControl`. Relative actions
//! (`volume_up`, `toggle_mute`, …) read the current value first, then write
//! the new one. Any transport fault, timeout or non-success status is
//! returned as `{ok: false, error}`.
//!
//! This family has no active discovery: devices are seeded into the registry
//! by hand and survive discovery sweeps.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `lanhub-app` and `lanhub-domain`.

mod client;
mod config;
mod error;
pub mod soap;

pub use client::RenderingControlClient;
pub use config::UpnpConfig;
pub use error::UpnpError;

use async_trait::async_trait;

use lanhub_app::ports::ProtocolAdapter;
use lanhub_app::services::device_registry::DeviceRegistry;
use lanhub_domain::action::{ActionDescriptor, ActionParams, Envelope};
use lanhub_domain::device::Device;
use lanhub_domain::error::{LanHubError, ValidationError, describe};

const ACTIONS: &[ActionDescriptor] = &[
    ActionDescriptor::new("get_volume", "Get current volume"),
    ActionDescriptor::new("set_volume", "Set volume 0-100"),
    ActionDescriptor::new("volume_up", "Increase volume by step"),
    ActionDescriptor::new("volume_down", "Decrease volume by step"),
    ActionDescriptor::new("get_mute", "Get mute state"),
    ActionDescriptor::new("set_mute", "Set mute true/false"),
    ActionDescriptor::new("toggle_mute", "Toggle mute"),
];

const MIN_VOLUME: i64 = 0;
const MAX_VOLUME: i64 = 100;

/// Protocol adapter for UPnP renderers exposing `RenderingControl`.
pub struct UpnpAdapter {
    client: RenderingControlClient,
    default_step: i64,
}

impl UpnpAdapter {
    /// Create an adapter with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`UpnpError::Http`] if the HTTP client cannot be initialised.
    pub fn new(config: UpnpConfig) -> Result<Self, UpnpError> {
        let default_step = config.default_step;
        Ok(Self {
            client: RenderingControlClient::new(config)?,
            default_step,
        })
    }

    async fn perform(
        &self,
        device: &Device,
        action: &str,
        params: &ActionParams,
    ) -> Result<Envelope, UpnpError> {
        let url = self.client.control_url(&device.address)?;
        let envelope = match action {
            "get_volume" => {
                let volume = self.client.get_volume(&url).await?;
                Envelope::success().with("volume", volume)
            }
            "set_volume" => {
                let volume = clamp_volume(params.int_or("volume", 0)?);
                self.client.set_volume(&url, volume).await?;
                Envelope::success().with("volume", volume)
            }
            "volume_up" | "volume_down" => {
                let step = params.int_or("step", self.default_step)?;
                let delta = if action == "volume_up" {
                    step
                } else {
                    step.checked_neg().ok_or_else(|| ValidationError::InvalidParam {
                        name: "step".to_string(),
                        value: step.to_string(),
                    })?
                };
                let from = self.client.get_volume(&url).await?;
                let to = clamp_volume(from.saturating_add(delta));
                self.client.set_volume(&url, to).await?;
                Envelope::success().with("from", from).with("to", to)
            }
            "get_mute" => {
                let mute = self.client.get_mute(&url).await?;
                Envelope::success().with("mute", mute)
            }
            "set_mute" => {
                let mute = params.flag_or("mute", false);
                self.client.set_mute(&url, mute).await?;
                Envelope::success().with("mute", mute)
            }
            "toggle_mute" => {
                let from = self.client.get_mute(&url).await?;
                let to = !from;
                self.client.set_mute(&url, to).await?;
                Envelope::success().with("from", from).with("to", to)
            }
            other => Envelope::failure(format!("Unknown action {other}")),
        };
        Ok(envelope)
    }
}

fn clamp_volume(volume: i64) -> i64 {
    volume.clamp(MIN_VOLUME, MAX_VOLUME)
}

#[async_trait]
impl ProtocolAdapter for UpnpAdapter {
    fn device_type(&self) -> &'static str {
        "hisense"
    }

    fn friendly_name(&self) -> &'static str {
        "Hisense TV (UPnP DMR)"
    }

    fn has_discovery(&self) -> bool {
        false
    }

    async fn discover(&self, _registry: &DeviceRegistry) -> Result<usize, LanHubError> {
        tracing::debug!("no active discovery for UPnP renderers, keeping seeded devices");
        Ok(0)
    }

    fn actions(&self) -> &'static [ActionDescriptor] {
        ACTIONS
    }

    async fn execute(
        &self,
        _registry: &DeviceRegistry,
        device: &Device,
        action: &str,
        params: &ActionParams,
    ) -> Result<Envelope, LanHubError> {
        match self.perform(device, action, params).await {
            Ok(envelope) => Ok(envelope),
            Err(err) => {
                let message = describe(&err);
                tracing::warn!(device_id = %device.id, action, error = %message, "renderer call failed");
                Ok(Envelope::failure(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanhub_app::ports::DeviceStore;
    use mockito::{Matcher, Mock, Server, ServerGuard};
    use serde_json::json;
    use std::sync::Arc;

    const CONTROL_PATH: &str = "/control/RenderingControl";

    struct NullStore;

    #[async_trait]
    impl DeviceStore for NullStore {
        async fn load(&self) -> Result<Vec<Device>, LanHubError> {
            Ok(Vec::new())
        }

        async fn save(&self, _devices: &[Device]) -> Result<(), LanHubError> {
            Ok(())
        }
    }

    fn response(action: &str, inner: &str) -> String {
        format!(
            r#"<?xml version="1.0"?><s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body><u:{action}Response xmlns:u="{}">{inner}</u:{action}Response></s:Body></s:Envelope>"#,
            soap::RENDERING_CONTROL_URN
        )
    }

    async fn mock_action(server: &mut ServerGuard, action: &str, body: String) -> Mock {
        server
            .mock("POST", CONTROL_PATH)
            .match_header("soapaction", soap::soap_action(action).as_str())
            .with_status(200)
            .with_header("content-type", "text/xml")
            .with_body(body)
            .create_async()
            .await
    }

    async fn mock_set(server: &mut ServerGuard, action: &str, argument: &str) -> Mock {
        server
            .mock("POST", CONTROL_PATH)
            .match_header("soapaction", soap::soap_action(action).as_str())
            .match_body(Matcher::Regex(argument.to_string()))
            .with_status(200)
            .with_body(response(action, ""))
            .expect(1)
            .create_async()
            .await
    }

    fn renderer(server: &ServerGuard) -> Device {
        Device::builder()
            .id("living-room")
            .device_type("hisense")
            .address(server.host_with_port())
            .build()
            .unwrap()
    }

    async fn run(server: &ServerGuard, action: &str, params: ActionParams) -> Envelope {
        let adapter = UpnpAdapter::new(UpnpConfig::default()).unwrap();
        let registry = DeviceRegistry::new(Arc::new(NullStore));
        adapter
            .execute(&registry, &renderer(server), action, &params)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn should_read_current_volume() {
        let mut server = Server::new_async().await;
        let _current = mock_action(
            &mut server,
            "GetVolume",
            response("GetVolume", "<CurrentVolume>23</CurrentVolume>"),
        )
        .await;

        let envelope = run(&server, "get_volume", ActionParams::new()).await;

        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"ok": true, "volume": 23})
        );
    }

    #[tokio::test]
    async fn should_send_standard_arguments_and_headers() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", CONTROL_PATH)
            .match_header("content-type", r#"text/xml; charset="utf-8""#)
            .match_header(
                "soapaction",
                "\"urn:schemas-upnp-org:service:RenderingControl:1#GetMute\"",
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("<InstanceID>0</InstanceID>".to_string()),
                Matcher::Regex("<Channel>Master</Channel>".to_string()),
            ]))
            .with_body(response("GetMute", "<CurrentMute>0</CurrentMute>"))
            .expect(1)
            .create_async()
            .await;

        let envelope = run(&server, "get_mute", ActionParams::new()).await;

        assert_eq!(envelope.get("mute"), Some(&json!(false)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn should_clamp_volume_above_range() {
        let mut server = Server::new_async().await;
        let set = mock_set(&mut server, "SetVolume", "<DesiredVolume>100</DesiredVolume>").await;

        let envelope = run(&server, "set_volume", ActionParams::new().with("volume", 150)).await;

        assert_eq!(envelope.get("volume"), Some(&json!(100)));
        set.assert_async().await;
    }

    #[tokio::test]
    async fn should_clamp_volume_below_range() {
        let mut server = Server::new_async().await;
        let set = mock_set(&mut server, "SetVolume", "<DesiredVolume>0</DesiredVolume>").await;

        let envelope = run(&server, "set_volume", ActionParams::new().with("volume", "-10")).await;

        assert!(envelope.ok);
        assert_eq!(envelope.get("volume"), Some(&json!(0)));
        set.assert_async().await;
    }

    #[tokio::test]
    async fn should_stop_volume_down_at_zero() {
        let mut server = Server::new_async().await;
        let _current = mock_action(
            &mut server,
            "GetVolume",
            response("GetVolume", "<CurrentVolume>3</CurrentVolume>"),
        )
        .await;
        let set = mock_set(&mut server, "SetVolume", "<DesiredVolume>0</DesiredVolume>").await;

        let envelope = run(&server, "volume_down", ActionParams::new().with("step", 5)).await;

        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"ok": true, "from": 3, "to": 0})
        );
        set.assert_async().await;
    }

    #[tokio::test]
    async fn should_raise_volume_by_default_step() {
        let mut server = Server::new_async().await;
        let _current = mock_action(
            &mut server,
            "GetVolume",
            response("GetVolume", "<CurrentVolume>40</CurrentVolume>"),
        )
        .await;
        let set = mock_set(&mut server, "SetVolume", "<DesiredVolume>45</DesiredVolume>").await;

        let envelope = run(&server, "volume_up", ActionParams::new()).await;

        assert_eq!(envelope.get("from"), Some(&json!(40)));
        assert_eq!(envelope.get("to"), Some(&json!(45)));
        set.assert_async().await;
    }

    #[tokio::test]
    async fn should_toggle_mute_back_and_forth() {
        let mut server = Server::new_async().await;
        let unmuted = mock_action(
            &mut server,
            "GetMute",
            response("GetMute", "<CurrentMute>0</CurrentMute>"),
        )
        .await;
        let mute = mock_set(&mut server, "SetMute", "<DesiredMute>1</DesiredMute>").await;

        let first = run(&server, "toggle_mute", ActionParams::new()).await;
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            json!({"ok": true, "from": false, "to": true})
        );
        mute.assert_async().await;

        unmuted.remove_async().await;
        let _muted = mock_action(
            &mut server,
            "GetMute",
            response("GetMute", "<CurrentMute>1</CurrentMute>"),
        )
        .await;
        let unmute = mock_set(&mut server, "SetMute", "<DesiredMute>0</DesiredMute>").await;

        let second = run(&server, "toggle_mute", ActionParams::new()).await;
        assert_eq!(
            serde_json::to_value(&second).unwrap(),
            json!({"ok": true, "from": true, "to": false})
        );
        unmute.assert_async().await;
    }

    #[tokio::test]
    async fn should_set_mute_from_flag() {
        let mut server = Server::new_async().await;
        let set = mock_set(&mut server, "SetMute", "<DesiredMute>1</DesiredMute>").await;

        let envelope = run(&server, "set_mute", ActionParams::new().with("mute", "true")).await;

        assert_eq!(envelope.get("mute"), Some(&json!(true)));
        set.assert_async().await;
    }

    #[tokio::test]
    async fn should_report_http_error_status_as_failure() {
        let mut server = Server::new_async().await;
        let _failing = server
            .mock("POST", CONTROL_PATH)
            .with_status(500)
            .create_async()
            .await;

        let envelope = run(&server, "get_volume", ActionParams::new()).await;

        assert!(!envelope.ok);
        assert!(envelope.error().unwrap().starts_with("SOAP request failed"));
    }

    #[tokio::test]
    async fn should_default_to_zero_for_malformed_volume() {
        let mut server = Server::new_async().await;
        let _current = mock_action(&mut server, "GetVolume", "<html>oops".to_string()).await;

        let envelope = run(&server, "get_volume", ActionParams::new()).await;

        assert!(envelope.ok);
        assert_eq!(envelope.get("volume"), Some(&json!(0)));
    }

    #[tokio::test]
    async fn should_report_invalid_step_without_calling_renderer() {
        let server = Server::new_async().await;

        let envelope = run(&server, "volume_up", ActionParams::new().with("step", "loud")).await;

        assert!(!envelope.ok);
        assert_eq!(
            envelope.error(),
            Some("invalid value for parameter step: loud")
        );
    }

    #[tokio::test]
    async fn should_reject_step_that_cannot_be_negated_when_lowering_volume() {
        let server = Server::new_async().await;

        let envelope = run(
            &server,
            "volume_down",
            ActionParams::new().with("step", "-9223372036854775808"),
        )
        .await;

        assert!(!envelope.ok);
        assert_eq!(
            envelope.error(),
            Some("invalid value for parameter step: -9223372036854775808")
        );
    }

    #[tokio::test]
    async fn should_report_unknown_action() {
        let server = Server::new_async().await;

        let envelope = run(&server, "power_off", ActionParams::new()).await;

        assert_eq!(envelope.error(), Some("Unknown action power_off"));
    }

    #[tokio::test]
    async fn should_not_touch_registry_during_discovery() {
        let adapter = UpnpAdapter::new(UpnpConfig::default()).unwrap();
        let registry = DeviceRegistry::new(Arc::new(NullStore));

        assert!(!adapter.has_discovery());
        assert_eq!(adapter.discover(&registry).await.unwrap(), 0);
        assert_eq!(adapter.device_type(), "hisense");
        assert_eq!(adapter.actions().len(), 7);
    }
}
