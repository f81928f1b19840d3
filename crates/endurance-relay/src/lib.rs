//! # endurance-relay
//!
//! Outbound calls to the AI services behind the dashboard's assistant
//! features. Every call goes through [`RelayClient`], which retries HTTP 429
//! with exponential backoff and nothing else.
//!
//! - [`FeatherlessClient`]: chat completions for search and recommendations
//! - [`HostedServices`]: insights, anomaly detection, agents, and reports
//!
//! Replies are cleaned before they leave this crate: event streams are
//! folded into one string ([`stream`]), model artifacts are stripped
//! ([`sanitize`]), and JSON is recovered from prose where possible
//! ([`extract`]).

pub mod client;
pub mod error;
pub mod extract;
pub mod featherless;
pub mod sanitize;
pub mod services;
pub mod stream;

pub use client::{RelayClient, Reply, RetryPolicy};
pub use error::RelayError;
pub use extract::extract_json;
pub use featherless::FeatherlessClient;
pub use sanitize::{sanitize, sanitize_value};
pub use services::HostedServices;

use std::time::Duration;

use endurance_config::EnduranceConfig;

/// Every AI client the server needs, built from one config.
#[derive(Debug, Clone)]
pub struct Relay {
    pub featherless: FeatherlessClient,
    pub hosted: HostedServices,
}

impl Relay {
    /// # Errors
    ///
    /// Returns [`RelayError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &EnduranceConfig) -> Result<Self, RelayError> {
        let client = RelayClient::new(&config.ai)?;
        Ok(Self {
            featherless: FeatherlessClient::new(&config.featherless, client.clone()),
            hosted: HostedServices::new(
                &config.hf,
                client,
                Duration::from_secs(config.ai.report_timeout_secs),
            ),
        })
    }
}
