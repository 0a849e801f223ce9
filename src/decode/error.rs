//! Errors occurring while decoding.

use serde_json::Value;
use thiserror::Error;

/// An error decoding a value.
///
/// Errors are single-cause: collections report the first element or entry
/// that failed, in iteration order.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// A required key was absent from an object.
    #[error("Missing key `{0}`.")]
    Missing(String),
    /// A value was present but could not be converted.
    #[error("Invalid value for {context}: {value}.")]
    Invalid { context: String, value: Value },
}

impl DecodeError {
    /// Construct an [`Invalid`](Self::Invalid) error, cloning the offending
    /// value for diagnostics.
    pub fn invalid(context: impl Into<String>, value: &Value) -> Self {
        Self::Invalid {
            context: context.into(),
            value: value.clone(),
        }
    }

    /// Whether this error reports an absent key.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing(_))
    }
}
