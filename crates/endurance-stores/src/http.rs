//! Shared HTTP helpers for the Neo4j and ClickHouse adapters.

use std::time::Duration;

use crate::error::StoreError;

const USER_AGENT: &str = "endurance/0.1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub fn client() -> Result<reqwest::Client, StoreError> {
    Ok(reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()?)
}

/// Return the response unchanged on success, otherwise
/// [`StoreError::Api`] with the status code and body text.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    if !resp.status().is_success() {
        return Err(StoreError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default().trim().to_string(),
        });
    }
    Ok(resp)
}
