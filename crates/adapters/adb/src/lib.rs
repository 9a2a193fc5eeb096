//! # lanhub-adapter-adb
//!
//! Debug-bridge adapter: controls Android TV devices (`type = "gtv"`) by
//! invoking the `adb` command-line tool, one subprocess per command.
//!
//! ## How it works
//!
//! No session is kept between actions. Every action first runs
//! `adb connect <address>` (its outcome is ignored) and then
//! `adb -s <address> shell …`. Each invocation is bounded by
//! [`AdbConfig::command_timeout_secs`]; a non-zero exit, a timeout or a spawn
//! failure comes back as `{ok: false}` with whatever stdout and stderr were
//! captured.
//!
//! Devices are found by browsing mDNS for wireless-debugging announcements.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `lanhub-app` and `lanhub-domain`.

mod config;
mod discovery;
mod error;
pub mod keycodes;
mod runner;

pub use config::AdbConfig;
pub use error::AdbError;
pub use runner::{CommandOutput, CommandRunner, ProcessRunner};

use async_trait::async_trait;

use lanhub_app::ports::ProtocolAdapter;
use lanhub_app::services::device_registry::DeviceRegistry;
use lanhub_domain::action::{ActionDescriptor, ActionParams, Envelope};
use lanhub_domain::device::Device;
use lanhub_domain::error::{LanHubError, describe};

const DEVICE_TYPE: &str = "gtv";

const ACTIONS: &[ActionDescriptor] = &[
    ActionDescriptor::new("button", "Send a remote button by name or keycode"),
    ActionDescriptor::new("text", "Send text input"),
    ActionDescriptor::new("keyevent", "Send a raw numeric keyevent"),
    ActionDescriptor::new("status", "Basic adb shell dumpsys activity activities"),
];

const DEFAULT_KEYCODE: i64 = 3;

const RESUMED_MARKERS: [&str; 2] = ["ResumedActivity:", "topResumedActivity="];

/// Protocol adapter for devices reachable through `adb`.
pub struct AdbAdapter<R = ProcessRunner> {
    config: AdbConfig,
    runner: R,
}

impl AdbAdapter<ProcessRunner> {
    /// Create an adapter spawning the configured `adb` binary.
    #[must_use]
    pub fn new(config: AdbConfig) -> Self {
        let runner = ProcessRunner::new(config.binary.clone(), config.command_timeout());
        Self::with_runner(config, runner)
    }
}

impl<R: CommandRunner> AdbAdapter<R> {
    /// Create an adapter issuing its commands through `runner`.
    #[must_use]
    pub fn with_runner(config: AdbConfig, runner: R) -> Self {
        Self { config, runner }
    }

    async fn connect(&self, address: &str) {
        match self.runner.run(&args(&["connect", address])).await {
            Ok(output) => tracing::trace!(address, success = output.success, "adb connect"),
            Err(err) => tracing::debug!(address, error = %err, "adb connect failed"),
        }
    }

    async fn shell(&self, device: &Device, command: &[&str]) -> Envelope {
        self.connect(&device.address).await;
        let mut argv = args(&["-s", device.address.as_str(), "shell"]);
        argv.extend(command.iter().map(ToString::to_string));
        match self.runner.run(&argv).await {
            Ok(output) => {
                if !output.success {
                    tracing::debug!(device_id = %device.id, stderr = %output.stderr, "adb shell failed");
                }
                Envelope::status(output.success)
                    .with("stdout", output.stdout)
                    .with("stderr", output.stderr)
            }
            Err(err) => {
                tracing::warn!(device_id = %device.id, error = %err, "adb shell did not complete");
                Envelope::failure(describe(&err))
                    .with("stdout", "")
                    .with("stderr", "")
            }
        }
    }

    async fn press(&self, device: &Device, key: &str) -> Envelope {
        let key = key.to_uppercase();
        let Some(code) = keycodes::resolve(&key) else {
            return Envelope::failure("Unknown key").with("input", key);
        };
        self.send_keycode(device, code).await
    }

    /// Send `code` unchanged; it never goes through the key-name table.
    async fn keyevent(&self, device: &Device, params: &ActionParams) -> Envelope {
        match params.int_or("code", DEFAULT_KEYCODE).map(u32::try_from) {
            Ok(Ok(code)) => self.send_keycode(device, code).await,
            Ok(Err(_)) | Err(_) => Envelope::failure("Invalid keycode")
                .with("input", params.str_or("code", "")),
        }
    }

    async fn send_keycode(&self, device: &Device, code: u32) -> Envelope {
        let code_arg = code.to_string();
        self.shell(device, &["input", "keyevent", code_arg.as_str()])
            .await
            .with("code", code)
    }

    /// Type `text` on the device.
    ///
    /// `adb shell` joins its arguments into one remote command line, so the
    /// text is single-quoted for the device shell after spaces become `%s`.
    async fn text(&self, device: &Device, text: &str) -> Envelope {
        let quoted = shell_quote(&text.replace(' ', "%s"));
        self.shell(device, &["input", "text", quoted.as_str()]).await
    }

    async fn status(&self, device: &Device) -> Envelope {
        let envelope = self
            .shell(device, &["dumpsys", "activity", "activities"])
            .await;
        let stdout = envelope
            .get("stdout")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        let top = if envelope.ok {
            stdout
                .lines()
                .map(str::trim)
                .find(|line| RESUMED_MARKERS.iter().any(|marker| line.contains(marker)))
                .map(ToString::to_string)
        } else {
            None
        };
        let truncated: String = stdout
            .chars()
            .take(self.config.status_output_limit)
            .collect();
        envelope.with("top", top).with("stdout", truncated)
    }
}

#[async_trait]
impl<R: CommandRunner + 'static> ProtocolAdapter for AdbAdapter<R> {
    fn device_type(&self) -> &'static str {
        DEVICE_TYPE
    }

    fn friendly_name(&self) -> &'static str {
        "Google TV (ADB)"
    }

    async fn discover(&self, registry: &DeviceRegistry) -> Result<usize, LanHubError> {
        tracing::info!(
            service_type = %self.config.service_type,
            window_secs = self.config.discovery_window_secs,
            "adb discovery started"
        );
        let announcements =
            discovery::browse(self.config.service_type.clone(), self.config.discovery_window())
                .await?;

        let mut count = 0;
        for announcement in &announcements {
            if let Some(device) = discovery::device_from_announcement(announcement, DEVICE_TYPE) {
                tracing::debug!(device_id = %device.id, address = %device.address, "adb device found");
                registry.upsert(device).await?;
                count += 1;
            }
        }
        tracing::info!(count, "adb discovery complete");
        Ok(count)
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
        let envelope = match action {
            "button" => self.press(device, &params.str_or("key", "HOME")).await,
            "keyevent" => self.keyevent(device, params).await,
            "text" => self.text(device, &params.str_or("text", "")).await,
            "status" => self.status(device).await,
            other => Envelope::failure(format!("Unknown action {other}")),
        };
        Ok(envelope)
    }
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(ToString::to_string).collect()
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
