//! Hosted inference services: insights, anomaly detection, agents, reports.

use std::time::Duration;

use endurance_config::HostedServicesConfig;
use serde_json::Value;

use crate::client::{RelayClient, Reply};
use crate::error::RelayError;

/// One hosted service: a base URL plus the shared client.
#[derive(Debug, Clone)]
struct Service {
    name: &'static str,
    base_url: String,
}

impl Service {
    fn new(name: &'static str, base_url: &str) -> Self {
        Self {
            name,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> Result<String, RelayError> {
        if self.base_url.is_empty() {
            return Err(RelayError::NotConfigured(self.name));
        }
        Ok(format!("{}{path}", self.base_url))
    }
}

#[derive(Debug, Clone)]
pub struct HostedServices {
    relay: RelayClient,
    reports_relay: RelayClient,
    token: Option<String>,
    insights: Service,
    anomaly: Service,
    agents: Service,
    reports: Service,
}

impl HostedServices {
    /// `report_timeout` bounds the two report calls; everything else uses
    /// the relay's own timeout.
    #[must_use]
    pub fn new(config: &HostedServicesConfig, relay: RelayClient, report_timeout: Duration) -> Self {
        Self {
            reports_relay: relay.with_timeout(report_timeout),
            relay,
            token: config.token().map(str::to_string),
            insights: Service::new("insights service", &config.insights_base_url),
            anomaly: Service::new("anomaly service", &config.anomaly_base_url),
            agents: Service::new("agents service", &config.agents_base_url),
            reports: Service::new("reports service", &config.reports_base_url),
        }
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// `POST {insights}/metrics/dora`
    ///
    /// # Errors
    ///
    /// Returns [`RelayError`] if the service is unconfigured or the call fails.
    pub async fn dora_analysis(&self, body: &Value) -> Result<Reply, RelayError> {
        let url = self.insights.url("/metrics/dora")?;
        self.relay.post_json(&url, self.token(), body).await
    }

    /// `POST {anomaly}/detect`
    ///
    /// # Errors
    ///
    /// Returns [`RelayError`] if the service is unconfigured or the call fails.
    pub async fn detect_anomalies(&self, body: &Value) -> Result<Reply, RelayError> {
        let url = self.anomaly.url("/detect")?;
        self.relay.post_json(&url, self.token(), body).await
    }

    /// `POST {agents}/experts/find`
    ///
    /// # Errors
    ///
    /// Returns [`RelayError`] if the service is unconfigured or the call fails.
    pub async fn find_experts(&self, body: &Value) -> Result<Reply, RelayError> {
        let url = self.agents.url("/experts/find")?;
        self.relay.post_json(&url, self.token(), body).await
    }

    /// `POST {agents}/message`, answered as an event stream.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError`] if the service is unconfigured or the call fails.
    pub async fn message(&self, body: &Value) -> Result<String, RelayError> {
        let url = self.agents.url("/message")?;
        self.relay.post_stream(&url, self.token(), body).await
    }

    /// `POST {agents}/prep/1on1`
    ///
    /// # Errors
    ///
    /// Returns [`RelayError`] if the service is unconfigured or the call fails.
    pub async fn one_on_one_prep(&self, body: &Value) -> Result<Reply, RelayError> {
        let url = self.agents.url("/prep/1on1")?;
        self.relay.post_json(&url, self.token(), body).await
    }

    /// `POST {reports}/reports/weekly` under the report timeout.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError`] if the service is unconfigured or the call fails.
    pub async fn weekly_report(&self, body: &Value) -> Result<Reply, RelayError> {
        let url = self.reports.url("/reports/weekly")?;
        self.reports_relay.post_json(&url, self.token(), body).await
    }

    /// `GET {reports}/reports/risks` under the report timeout.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError`] if the service is unconfigured or the call fails.
    pub async fn risks(&self) -> Result<Reply, RelayError> {
        let url = self.reports.url("/reports/risks")?;
        self.reports_relay.get_json(&url, self.token()).await
    }
}
