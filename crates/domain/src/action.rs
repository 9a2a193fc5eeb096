//! Actions: parameters in, envelopes out.
//!
//! Every adapter receives its parameters as an [`ActionParams`] bag and
//! answers with an [`Envelope`]: a flat JSON object that always carries an
//! explicit `ok` flag next to adapter-specific fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{NotFoundError, ValidationError};

/// Router-level failure categories.
///
/// Adapter-reported failures (including unknown actions) carry no kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    DeviceNotFound,
    NoAdapter,
}

/// The uniform `{ok, ...}` shape every action result is normalized into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Envelope {
    /// A successful envelope without fields.
    #[must_use]
    pub fn success() -> Self {
        Self::status(true)
    }

    /// An envelope whose `ok` flag mirrors the outcome of a protocol call.
    #[must_use]
    pub fn status(ok: bool) -> Self {
        Self {
            ok,
            kind: None,
            fields: Map::new(),
        }
    }

    /// A failed envelope carrying a human-readable `error` message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self::status(false).with("error", message.into())
    }

    /// Failure for a device id the registry does not know.
    #[must_use]
    pub fn device_not_found(err: &NotFoundError) -> Self {
        let mut envelope = Self::failure(format!("Unknown device {}", err.id));
        envelope.kind = Some(FailureKind::DeviceNotFound);
        envelope
    }

    /// Failure for a device whose type has no registered adapter.
    #[must_use]
    pub fn no_adapter(device_type: &str) -> Self {
        let mut envelope = Self::failure(format!("No adapter for type {device_type}"));
        envelope.kind = Some(FailureKind::NoAdapter);
        envelope
    }

    /// Attach a field, replacing any previous value under the same key.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The `error` message of a failed envelope.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.fields.get("error").and_then(Value::as_str)
    }
}

/// Name and one-line description of an action an adapter supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionDescriptor {
    pub name: &'static str,
    pub description: &'static str,
}

impl ActionDescriptor {
    #[must_use]
    pub const fn new(name: &'static str, description: &'static str) -> Self {
        Self { name, description }
    }
}

/// Free-form action parameters.
///
/// Values may arrive as JSON scalars (request bodies) or as strings (query
/// strings), so the typed accessors coerce between the two.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionParams(Map<String, Value>);

impl ActionParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Overlay `other` on top of `self`; keys present in both take `other`'s value.
    pub fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|value| !value.is_null())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Read `key` as text, falling back to `default` when absent.
    ///
    /// Non-string scalars are rendered with their JSON text (`3`, `true`).
    #[must_use]
    pub fn str_or(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            None => default.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Read `key` as an integer, falling back to `default` when absent.
    ///
    /// Accepts JSON integers, floats (truncated toward zero), booleans, and
    /// decimal strings.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidParam`] when the value cannot be
    /// read as an integer.
    pub fn int_or(&self, key: &str, default: i64) -> Result<i64, ValidationError> {
        let invalid = |value: &Value| ValidationError::InvalidParam {
            name: key.to_string(),
            value: match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        };

        match self.get(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(i64::from(*b)),
            Some(value @ Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(truncate))
                .ok_or_else(|| invalid(value)),
            Some(value @ Value::String(s)) => s.trim().parse().map_err(|_| invalid(value)),
            Some(value) => Err(invalid(value)),
        }
    }

    /// Read `key` as a boolean flag, falling back to `default` when absent.
    ///
    /// `true`, `1`, `"1"`, `"true"`, `"yes"` and `"on"` (any case) are true;
    /// every other present value is false.
    #[must_use]
    pub fn flag_or(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            None => default,
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => is_truthy(s),
            Some(other) => is_truthy(&other.to_string()),
        }
    }
}

impl From<Map<String, Value>> for ActionParams {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for ActionParams {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[allow(clippy::cast_possible_truncation)]
fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}
