//! Store error types.

use thiserror::Error;

/// Errors from any of the three backing stores.
///
/// Callers do not distinguish transient from permanent failures; every
/// variant degrades the route to its fallback payload.
#[derive(Debug, Error)]
pub enum StoreError {
    /// PostgreSQL driver or pool error.
    #[error("Postgres error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// HTTP transport error talking to Neo4j or ClickHouse.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store's HTTP API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the store.
        status: u16,
        /// Response body.
        message: String,
    },

    /// The store accepted the request but reported a query error.
    #[error("Query failed: {0}")]
    Query(String),

    /// The response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// The adapter could not be built from configuration.
    #[error("Store configuration error: {0}")]
    Config(String),
}
