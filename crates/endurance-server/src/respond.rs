//! The single place where results become HTTP responses.
//!
//! Handlers return `Result<Outcome, ApiError>` and never build fallback
//! payloads themselves. [`respond`] picks the envelope and status:
//!
//! | Result                   | Status                     | Body                          |
//! |--------------------------|----------------------------|-------------------------------|
//! | `Ok(Live)`               | 200                        | payload + success marker      |
//! | `Ok(Empty)`              | 200                        | fallback, no `error`          |
//! | `Err(BadRequest)`        | 400                        | fallback + `error`            |
//! | any other `Err`          | `Endpoint::failure_status` | fallback + `error`            |

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use endurance_core::{CoreError, Endpoint, envelope};
use endurance_metrics::{MetricsError, Outcome};
use endurance_relay::RelayError;
use endurance_stores::StoreError;
use thiserror::Error;
use tracing::warn;

use crate::state::AppState;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Metrics(#[from] MetricsError),

    #[error(transparent)]
    Relay(#[from] RelayError),

    /// The request itself was invalid.
    #[error(transparent)]
    BadRequest(#[from] CoreError),
}

/// Wrap `result` in the envelope for `endpoint`.
pub fn respond(state: &AppState, endpoint: Endpoint, result: Result<Outcome, ApiError>) -> Response {
    let (status, body) = match result {
        Ok(Outcome::Live(payload)) => (StatusCode::OK, envelope::live(endpoint, payload)),
        Ok(Outcome::Empty) => (
            StatusCode::OK,
            envelope::empty(endpoint, state.fallbacks.payload(endpoint)),
        ),
        Err(ApiError::BadRequest(error)) => {
            warn!(endpoint = endpoint.name(), %error, "rejected request");
            (
                StatusCode::BAD_REQUEST,
                envelope::degraded(endpoint, state.fallbacks.payload(endpoint), &error.to_string()),
            )
        }
        Err(error) => {
            warn!(endpoint = endpoint.name(), %error, "serving fallback");
            let status = StatusCode::from_u16(endpoint.failure_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                envelope::degraded(endpoint, state.fallbacks.payload(endpoint), &error.to_string()),
            )
        }
    };
    (status, Json(body)).into_response()
}
