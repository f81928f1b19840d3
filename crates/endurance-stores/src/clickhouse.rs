//! ClickHouse adapter over the HTTP interface.
//!
//! Queries are posted as the request body. Values never enter the SQL text:
//! each parameter is sent as `param_<name>` and referenced server-side as
//! `{name:Type}`. Rows come back in the `JSON` output format, where 64-bit
//! integers are quoted strings; see `endurance_core::normalize`.

use endurance_config::ClickHouseConfig;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::http::{check_response, client};

/// One result row keyed by column name.
pub type Row = Map<String, Value>;

#[derive(Debug, Deserialize)]
struct JsonFormat {
    #[serde(default)]
    data: Vec<Row>,
}

#[derive(Debug, Clone)]
pub struct ClickHouseStore {
    http: reqwest::Client,
    base_url: String,
    database: String,
    user: String,
    password: String,
}

impl ClickHouseStore {
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &ClickHouseConfig) -> Result<Self, StoreError> {
        Ok(Self {
            http: client()?,
            base_url: config.url(),
            database: config.database.clone(),
            user: config.user.clone(),
            password: config.password.clone(),
        })
    }

    /// Run `sql` with named parameters and return every row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport failure, a non-success status
    /// (ClickHouse reports SQL errors this way), or an undecodable body.
    pub async fn query(&self, sql: &str, params: &[(&str, String)]) -> Result<Vec<Row>, StoreError> {
        let url = self.query_url(params)?;

        let resp = self
            .http
            .post(url)
            .header("X-ClickHouse-User", &self.user)
            .header("X-ClickHouse-Key", &self.password)
            .body(sql.to_string())
            .send()
            .await?;
        let resp = check_response(resp).await?;

        let text = resp.text().await?;
        let parsed: JsonFormat =
            serde_json::from_str(&text).map_err(|e| StoreError::Parse(e.to_string()))?;
        Ok(parsed.data)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the server cannot run `SELECT 1`.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.query("SELECT 1 AS ok", &[]).await.map(|_| ())
    }

    fn query_url(&self, params: &[(&str, String)]) -> Result<reqwest::Url, StoreError> {
        let mut pairs: Vec<(String, &str)> = vec![
            ("database".to_string(), self.database.as_str()),
            ("default_format".to_string(), "JSON"),
        ];
        pairs.extend(
            params
                .iter()
                .map(|(name, value)| (format!("param_{name}"), value.as_str())),
        );

        reqwest::Url::parse_with_params(&format!("{}/", self.base_url), &pairs)
            .map_err(|e| StoreError::Config(format!("invalid ClickHouse URL: {e}")))
    }
}
