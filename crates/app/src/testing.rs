//! In-memory fakes for the ports, shared by the service tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use lanhub_domain::action::{ActionDescriptor, ActionParams, Envelope};
use lanhub_domain::device::Device;
use lanhub_domain::error::LanHubError;

use crate::ports::{DeviceStore, ProtocolAdapter};
use crate::services::device_registry::DeviceRegistry;

/// Store keeping the last saved device set in memory.
#[derive(Default)]
pub struct InMemoryStore {
    pub contents: Mutex<Vec<Device>>,
    pub saves: AtomicUsize,
    pub corrupt: AtomicBool,
    pub fail_saves: AtomicBool,
}

impl InMemoryStore {
    pub fn with(devices: Vec<Device>) -> Self {
        Self {
            contents: Mutex::new(devices),
            ..Self::default()
        }
    }

    pub fn saved(&self) -> Vec<Device> {
        self.contents.lock().unwrap().clone()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct FakeFailure(&'static str);

#[async_trait]
impl DeviceStore for InMemoryStore {
    async fn load(&self) -> Result<Vec<Device>, LanHubError> {
        if self.corrupt.load(Ordering::SeqCst) {
            return Err(LanHubError::Storage(Box::new(FakeFailure("corrupt"))));
        }
        Ok(self.saved())
    }

    async fn save(&self, devices: &[Device]) -> Result<(), LanHubError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(LanHubError::Storage(Box::new(FakeFailure("read-only"))));
        }
        *self.contents.lock().unwrap() = devices.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn device(id: &str, device_type: &str) -> Device {
    Device::builder()
        .id(id)
        .device_type(device_type)
        .address("192.168.1.10")
        .build()
        .unwrap()
}

const FAKE_ACTIONS: &[ActionDescriptor] = &[
    ActionDescriptor::new("ping", "Answer with pong"),
    ActionDescriptor::new("fail", "Return an error"),
    ActionDescriptor::new("panic", "Panic mid-action"),
];

/// Adapter with scripted discovery results and trivial actions.
pub struct FakeAdapter {
    pub device_type: &'static str,
    pub active: bool,
    pub announced: Mutex<Vec<Device>>,
    pub fail_discovery: bool,
    pub discover_calls: AtomicUsize,
    pub execute_calls: AtomicUsize,
}

impl FakeAdapter {
    pub fn new(device_type: &'static str) -> Self {
        Self {
            device_type,
            active: true,
            announced: Mutex::new(Vec::new()),
            fail_discovery: false,
            discover_calls: AtomicUsize::new(0),
            execute_calls: AtomicUsize::new(0),
        }
    }

    pub fn announcing(mut self, devices: Vec<Device>) -> Self {
        self.announced = Mutex::new(devices);
        self
    }

    pub fn passive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn failing_discovery(mut self) -> Self {
        self.fail_discovery = true;
        self
    }
}

#[async_trait]
impl ProtocolAdapter for FakeAdapter {
    fn device_type(&self) -> &'static str {
        self.device_type
    }

    fn friendly_name(&self) -> &'static str {
        "Fake"
    }

    fn has_discovery(&self) -> bool {
        self.active
    }

    async fn discover(&self, registry: &DeviceRegistry) -> Result<usize, LanHubError> {
        self.discover_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_discovery {
            return Err(LanHubError::Adapter(Box::new(FakeFailure(
                "multicast socket unavailable",
            ))));
        }
        let announced = self.announced.lock().unwrap().clone();
        let count = announced.len();
        for device in announced {
            registry.upsert(device).await?;
        }
        Ok(count)
    }

    fn actions(&self) -> &'static [ActionDescriptor] {
        FAKE_ACTIONS
    }

    async fn execute(
        &self,
        _registry: &DeviceRegistry,
        device: &Device,
        action: &str,
        _params: &ActionParams,
    ) -> Result<Envelope, LanHubError> {
        self.execute_calls.fetch_add(1, Ordering::SeqCst);
        match action {
            "ping" => Ok(Envelope::success().with("pong", device.id.clone())),
            "fail" => Err(LanHubError::Adapter(Box::new(FakeFailure("wire cut")))),
            "panic" => panic!("adapter bug"),
            other => Ok(Envelope::failure(format!("Unknown action {other}"))),
        }
    }
}
