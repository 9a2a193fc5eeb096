//! Storage-specific error type wrapping filesystem and JSON errors.

use std::path::PathBuf;

use lanhub_domain::error::LanHubError;

/// Errors originating from the JSON file store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading, writing or renaming the devices file failed.
    #[error("i/o error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The devices file is not a valid device map.
    #[error("invalid devices file {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl From<StorageError> for LanHubError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
