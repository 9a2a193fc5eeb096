//! Action endpoint: run one action on one device and relay the envelope.

use std::collections::HashMap;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value};

use lanhub_domain::action::{ActionParams, Envelope, FailureKind};

use crate::state::AppState;

/// An envelope paired with the status code it maps to.
pub struct ActionResponse(Envelope);

impl ActionResponse {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match (self.0.ok, self.0.kind) {
            (true, _) => StatusCode::OK,
            (false, Some(FailureKind::DeviceNotFound)) => StatusCode::NOT_FOUND,
            (false, Some(FailureKind::NoAdapter)) => StatusCode::BAD_REQUEST,
            (false, None) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ActionResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self.0)).into_response()
    }
}

/// `GET|POST /api/device/{id}/action/{action}`
///
/// Parameters come from the query string and, for POST requests with a JSON
/// content type, from a JSON object body. Query values override body values.
/// A body that is not a JSON object is ignored.
pub async fn perform(
    State(state): State<AppState>,
    Path((id, action)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> ActionResponse {
    let mut params = if method == Method::POST && is_json(&headers) {
        json_params(&body)
    } else {
        ActionParams::new()
    };
    params.merge(
        query
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect(),
    );

    let envelope = state.router.route(&id, &action, &params).await;
    ActionResponse(envelope)
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| {
            value
                .split(';')
                .next()
                .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
        })
}

fn json_params(body: &[u8]) -> ActionParams {
    match serde_json::from_slice::<Map<String, Value>>(body) {
        Ok(map) => ActionParams::from(map),
        Err(err) => {
            tracing::debug!(error = %err, "ignoring non-object action body");
            ActionParams::new()
        }
    }
}
