//! UPnP renderer adapter error types.

use lanhub_domain::error::{LanHubError, ValidationError};

/// Errors specific to the UPnP renderer adapter.
#[derive(Debug, thiserror::Error)]
pub enum UpnpError {
    /// The device address cannot be turned into a control URL.
    #[error("invalid device address {0:?}")]
    InvalidAddress(String),

    /// Building the client, sending the request or reading the response
    /// failed, or the renderer answered with a non-success status.
    #[error("SOAP request failed")]
    Http(#[from] reqwest::Error),

    /// An action parameter could not be read.
    #[error(transparent)]
    Param(#[from] ValidationError),
}

impl UpnpError {
    /// Convert into a [`LanHubError`] for propagation across port boundaries.
    #[must_use]
    pub fn into_domain(self) -> LanHubError {
        match self {
            Self::Param(err) => LanHubError::Validation(err),
            other => LanHubError::Adapter(Box::new(other)),
        }
    }
}

impl From<UpnpError> for LanHubError {
    fn from(err: UpnpError) -> Self {
        err.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_invalid_address_error() {
        let err = UpnpError::InvalidAddress("tv:port".to_string());
        assert_eq!(err.to_string(), "invalid device address \"tv:port\"");
    }

    #[test]
    fn should_display_param_error_transparently() {
        let err = UpnpError::from(ValidationError::InvalidParam {
            name: "step".to_string(),
            value: "loud".to_string(),
        });
        assert_eq!(
            lanhub_domain::error::describe(&err),
            "invalid value for parameter step: loud"
        );
    }

    #[test]
    fn should_convert_param_error_to_validation_error() {
        let err: LanHubError = UpnpError::from(ValidationError::EmptyId).into();
        assert!(matches!(err, LanHubError::Validation(_)));
    }

    #[test]
    fn should_convert_address_error_to_adapter_error() {
        let err: LanHubError = UpnpError::InvalidAddress(String::new()).into();
        assert!(matches!(err, LanHubError::Adapter(_)));
    }
}
