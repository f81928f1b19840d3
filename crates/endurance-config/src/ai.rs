//! Configuration for the AI relay: the Featherless chat API
//! (`FEATHERLESS_*`), the hosted inference services (`HF_*_BASE_URL`), and
//! the relay's retry/timeout policy (`ENDURANCE_AI__*`).

use serde::{Deserialize, Serialize};

fn default_featherless_base_url() -> String {
    "https://api.featherless.ai/v1".to_string()
}

fn default_featherless_model() -> String {
    "meta-llama/Meta-Llama-3.1-8B-Instruct".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeatherlessConfig {
    /// Bearer token for the OpenAI-compatible chat completions API.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_featherless_base_url")]
    pub base_url: String,

    #[serde(default = "default_featherless_model")]
    pub model: String,
}

impl Default for FeatherlessConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_featherless_base_url(),
            model: default_featherless_model(),
        }
    }
}

impl FeatherlessConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.base_url.is_empty()
    }
}

/// Hosted inference services, one base URL each.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HostedServicesConfig {
    /// DORA analysis service (`HF_INSIGHTS_BASE_URL`).
    #[serde(default)]
    pub insights_base_url: String,

    /// Anomaly detection service (`HF_ANOMALY_BASE_URL`).
    #[serde(default)]
    pub anomaly_base_url: String,

    /// Agent service for experts, chat and 1:1 prep (`HF_AGENTS_BASE_URL`).
    #[serde(default)]
    pub agents_base_url: String,

    /// Report generation service (`HF_REPORTS_BASE_URL`).
    #[serde(default)]
    pub reports_base_url: String,

    /// Optional bearer token sent to every hosted service (`HF_TOKEN`).
    #[serde(default)]
    pub token: String,
}

impl HostedServicesConfig {
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        (!self.token.is_empty()).then_some(self.token.as_str())
    }
}

const fn default_request_timeout_secs() -> u64 {
    60
}

const fn default_report_timeout_secs() -> u64 {
    30
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_retry_base_delay_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelayConfig {
    /// Whole-request timeout applied to every outbound call.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Tighter timeout for the report routes.
    #[serde(default = "default_report_timeout_secs")]
    pub report_timeout_secs: u64,

    /// Retries after an HTTP 429, on top of the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// First backoff delay; doubles on each retry.
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            report_timeout_secs: default_report_timeout_secs(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
        }
    }
}
