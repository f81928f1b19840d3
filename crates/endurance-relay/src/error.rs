//! Relay error types.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream service returned a non-success status code.
    #[error("upstream error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the service.
        status: u16,
        /// Response body.
        message: String,
    },

    /// Still rate limited after every retry.
    #[error("rate limited after {attempts} attempts")]
    RateLimited { attempts: u32 },

    /// No response within the per-request timeout.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The named service has no base URL or API key configured.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// The response could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}
