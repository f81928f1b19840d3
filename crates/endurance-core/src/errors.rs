//! Cross-cutting error types for Endurance.
//!
//! Store and relay errors live in their own crates (`StoreError`,
//! `RelayError`). The server converges them into its `ApiError`.

use thiserror::Error;

/// Errors that can be raised by any Endurance crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A request parameter failed validation.
    #[error("Invalid parameter '{field}': {reason}")]
    InvalidParam { field: String, reason: String },

    /// A required request field was missing or empty.
    #[error("Missing required field '{0}'")]
    MissingField(String),
}

impl CoreError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParam {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
