//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use lanhub_domain::action::Envelope;
use lanhub_domain::error::LanHubError;

/// Maps [`LanHubError`] to an HTTP response with an appropriate status code.
///
/// The body uses the same `{ok: false, error}` shape as action envelopes.
#[derive(Debug)]
pub struct ApiError(LanHubError);

impl From<LanHubError> for ApiError {
    fn from(err: LanHubError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            LanHubError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            LanHubError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            LanHubError::Storage(_) | LanHubError::Adapter(_) => {
                tracing::error!(error = %self.0.describe(), "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(Envelope::failure(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanhub_domain::error::{NotFoundError, ValidationError};

    #[test]
    fn should_map_not_found_to_404() {
        let response = ApiError::from(LanHubError::from(NotFoundError {
            entity: "Device",
            id: "tv".to_string(),
        }))
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn should_map_validation_to_400() {
        let response =
            ApiError::from(LanHubError::from(ValidationError::EmptyId)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn should_hide_storage_details_behind_500() {
        let err = LanHubError::Storage("disk full".into());
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
