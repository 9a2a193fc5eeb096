//! JSON handler listing registered adapters and their actions.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use lanhub_domain::action::ActionDescriptor;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AdapterView {
    #[serde(rename = "type")]
    pub device_type: &'static str,
    pub name: &'static str,
    pub discovery: bool,
    pub actions: &'static [ActionDescriptor],
}

#[derive(Debug, Serialize)]
pub struct AdapterList {
    pub ok: bool,
    pub adapters: Vec<AdapterView>,
}

/// `GET /api/adapters`
pub async fn list(State(state): State<AppState>) -> Json<AdapterList> {
    let adapters = state
        .directory
        .adapters()
        .iter()
        .map(|adapter| AdapterView {
            device_type: adapter.device_type(),
            name: adapter.friendly_name(),
            discovery: adapter.has_discovery(),
            actions: adapter.actions(),
        })
        .collect();
    Json(AdapterList { ok: true, adapters })
}
