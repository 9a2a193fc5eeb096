//! JSON handlers for devices.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use lanhub_domain::device::Device;
use lanhub_domain::error::{LanHubError, NotFoundError};

use crate::error::ApiError;
use crate::state::AppState;

/// A device record together with the action names its adapter accepts.
#[derive(Debug, Serialize)]
pub struct DeviceView {
    #[serde(flatten)]
    pub device: Device,
    pub actions: Vec<&'static str>,
}

/// Body of the list endpoint.
#[derive(Debug, Serialize)]
pub struct DeviceList {
    pub ok: bool,
    pub devices: Vec<DeviceView>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<DeviceList>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<DeviceView>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

fn view(state: &AppState, device: Device) -> DeviceView {
    let actions = state
        .directory
        .actions_for(&device.device_type)
        .iter()
        .map(|action| action.name)
        .collect();
    DeviceView { device, actions }
}

/// `GET /api/devices`
///
/// Reloads the store first so devices written by an out-of-process discovery
/// run show up.
pub async fn list(State(state): State<AppState>) -> ListResponse {
    state.registry.load().await;
    let devices = state
        .registry
        .all()
        .into_iter()
        .map(|device| view(&state, device))
        .collect();
    ListResponse::Ok(Json(DeviceList { ok: true, devices }))
}

/// `GET /api/devices/{id}`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError> {
    let device = state.registry.get(&id).ok_or_else(|| {
        LanHubError::from(NotFoundError {
            entity: "Device",
            id: id.clone(),
        })
    })?;
    Ok(GetResponse::Ok(Json(view(&state, device))))
}
