//! HTTP client shared by every outbound AI call.
//!
//! Applies one retry policy everywhere: HTTP 429 is retried with
//! exponential backoff, anything else is returned to the caller at once.

use std::time::Duration;

use endurance_config::RelayConfig;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::RelayError;
use crate::extract::extract_json;
use crate::sanitize::{sanitize, sanitize_value};
use crate::stream::accumulate;

const USER_AGENT: &str = "endurance-relay/0.1";

/// Retry policy for rate-limited responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each one after.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (1-based).
    #[must_use]
    pub fn delay(&self, retry: u32) -> Duration {
        let factor = 2_u32.saturating_pow(retry.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }
}

/// A reply from an endpoint that was expected to return JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Parsed JSON, either directly or recovered from surrounding text.
    Json(Value),
    /// Unstructured text, already sanitized.
    Text(String),
}

impl Reply {
    /// Artifacts are stripped before JSON is looked for, so nothing inside a
    /// reasoning block can be mistaken for the answer.
    fn from_body(body: &str) -> Self {
        let cleaned = sanitize(body);
        match extract_json(&cleaned) {
            Some(mut value) => {
                sanitize_value(&mut value);
                Self::Json(value)
            }
            None => Self::Text(cleaned),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    retry: RetryPolicy,
    timeout: Duration,
}

impl RelayClient {
    /// # Errors
    ///
    /// Returns [`RelayError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let retry = RetryPolicy {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.retry_base_delay_ms),
        };
        Self::with_policy(retry, Duration::from_secs(config.request_timeout_secs))
    }

    /// # Errors
    ///
    /// Returns [`RelayError::Http`] if the HTTP client cannot be built.
    pub fn with_policy(retry: RetryPolicy, timeout: Duration) -> Result<Self, RelayError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            retry,
            timeout,
        })
    }

    /// Same client and retry policy with a different per-request timeout.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            http: self.http.clone(),
            retry: self.retry,
            timeout,
        }
    }

    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `GET url`, decoding the body as JSON or unstructured text.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError`] on transport failure, timeout, a non-success
    /// status, or exhausted 429 retries.
    pub async fn get_json(&self, url: &str, token: Option<&str>) -> Result<Reply, RelayError> {
        let body = self.execute(Method::GET, url, token, None).await?;
        Ok(Reply::from_body(&body))
    }

    /// `POST url` with a JSON body, decoding the reply as JSON or text.
    ///
    /// # Errors
    ///
    /// See [`get_json`](Self::get_json).
    pub async fn post_json(
        &self,
        url: &str,
        token: Option<&str>,
        body: &Value,
    ) -> Result<Reply, RelayError> {
        let text = self.execute(Method::POST, url, token, Some(body)).await?;
        Ok(Reply::from_body(&text))
    }

    /// `POST url` and fold an event-stream reply into one sanitized string.
    ///
    /// # Errors
    ///
    /// See [`get_json`](Self::get_json).
    pub async fn post_stream(
        &self,
        url: &str,
        token: Option<&str>,
        body: &Value,
    ) -> Result<String, RelayError> {
        let text = self.execute(Method::POST, url, token, Some(body)).await?;
        Ok(sanitize(&accumulate(&text)))
    }

    /// Send with the retry policy and return the body of the first
    /// successful response.
    async fn execute(
        &self,
        method: Method,
        url: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> Result<String, RelayError> {
        let mut attempt = 0_u32;
        loop {
            attempt += 1;
            let mut request = self
                .http
                .request(method.clone(), url)
                .timeout(self.timeout)
                .header(reqwest::header::ACCEPT, "application/json, text/event-stream");
            if let Some(token) = token {
                request = request.bearer_auth(token);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            debug!(%url, attempt, "relay request");
            let resp = request.send().await.map_err(|e| self.transport(e))?;
            let status = resp.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                if attempt > self.retry.max_retries {
                    warn!(%url, attempt, "rate limited, giving up");
                    return Err(RelayError::RateLimited { attempts: attempt });
                }
                let delay = self.retry.delay(attempt);
                warn!(
                    %url,
                    attempt,
                    wait_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "rate limited, retrying after backoff"
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            let text = resp.text().await.map_err(|e| self.transport(e))?;
            if !status.is_success() {
                return Err(RelayError::Api {
                    status: status.as_u16(),
                    message: text.trim().to_string(),
                });
            }
            return Ok(text);
        }
    }

    fn transport(&self, error: reqwest::Error) -> RelayError {
        if error.is_timeout() {
            RelayError::Timeout(self.timeout)
        } else {
            RelayError::Http(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay(1), Duration::from_secs(1));
        assert_eq!(policy.delay(2), Duration::from_secs(2));
        assert_eq!(policy.delay(3), Duration::from_secs(4));
    }

    #[test]
    fn policy_from_config() {
        let client = RelayClient::new(&RelayConfig::default()).unwrap();
        assert_eq!(client.retry_policy(), RetryPolicy::default());
        assert_eq!(client.timeout(), Duration::from_secs(60));
        let reports = client.with_timeout(Duration::from_secs(30));
        assert_eq!(reports.timeout(), Duration::from_secs(30));
        assert_eq!(reports.retry_policy(), client.retry_policy());
    }

    #[test]
    fn reply_from_body() {
        assert_eq!(Reply::from_body("{\"a\":1}"), Reply::Json(json!({"a": 1})));
        assert_eq!(
            Reply::from_body("*[m]* plain answer"),
            Reply::Text("plain answer".into())
        );
    }

    #[test]
    fn json_inside_reasoning_is_ignored() {
        assert_eq!(
            Reply::from_body(
                "<think>draft: {\"risks\": [\"invented\"]}</think>No major risks this week."
            ),
            Reply::Text("No major risks this week.".into())
        );
    }

    #[test]
    fn json_string_fields_are_sanitized() {
        assert_eq!(
            Reply::from_body(
                "{\"analysis\": \"*[gpt-4o-mini]* <think>x</think>Deploys are steady\"}"
            ),
            Reply::Json(json!({"analysis": "Deploys are steady"}))
        );
    }
}
