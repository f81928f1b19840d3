//! # endurance-metrics
//!
//! One module per dashboard endpoint. Each exposes an async `load` that
//! queries a single store and a pure `compose` that reduces the rows into
//! the endpoint's payload. Composers never build fallbacks; they report
//! [`Outcome::Empty`] and leave the substitution to the server.

pub mod blockers;
pub mod code_quality;
pub mod collaboration;
pub mod dora;
pub mod employees;
pub mod financials;
pub mod pipelines;
pub mod skills;
pub mod sprints;
mod window;

pub use window::Window;

use endurance_stores::StoreError;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A composed payload could not be encoded as JSON.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<sqlx::Error> for MetricsError {
    fn from(error: sqlx::Error) -> Self {
        Self::Store(StoreError::Postgres(error))
    }
}

/// Result of a composer run.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Live payload, ready to be wrapped in the envelope.
    Live(Value),
    /// The store answered with no rows.
    Empty,
}

impl Outcome {
    /// # Errors
    ///
    /// Returns [`MetricsError::Encode`] if `payload` fails to serialize.
    pub fn live<T: Serialize>(payload: &T) -> Result<Self, MetricsError> {
        Ok(Self::Live(serde_json::to_value(payload)?))
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}
