//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`LanHubError`]
//! via `From`, so the application core only ever sees this enum.

/// Boxed error used for IO-backed variants whose concrete type lives in an
/// adapter crate.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Base error type for the lanhub workspace.
#[derive(Debug, thiserror::Error)]
pub enum LanHubError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced record does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The persisted device store could not be read or written.
    #[error("storage error")]
    Storage(#[source] BoxError),

    /// A protocol adapter failed outside of its own envelope handling.
    #[error("adapter error")]
    Adapter(#[source] BoxError),
}

impl LanHubError {
    /// Render this error together with its source chain on a single line.
    ///
    /// Used when an error has to be flattened into an `{ok: false, error}`
    /// envelope.
    #[must_use]
    pub fn describe(&self) -> String {
        describe(self)
    }
}

/// Render `err` followed by each of its sources, joined with `": "`.
#[must_use]
pub fn describe(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

/// Invariant violations detected while building or reading domain values.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("device id must not be empty")]
    EmptyId,

    #[error("device type must not be empty")]
    EmptyType,

    #[error("invalid value for parameter {name}: {value}")]
    InvalidParam { name: String, value: String },
}

/// A lookup by identifier found nothing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
