//! Neo4j adapter over the HTTP transactional endpoint.
//!
//! Each call is a single auto-commit transaction:
//! `POST {base}/db/{database}/tx/commit` with one statement and its
//! parameters. Rows come back positionally and are zipped with the column
//! names into [`Record`]s.

use endurance_config::Neo4jConfig;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::error::StoreError;
use crate::http::{check_response, client};

/// One result row keyed by column name.
pub type Record = Map<String, Value>;

#[derive(Debug, Deserialize)]
struct CommitResponse {
    #[serde(default)]
    results: Vec<StatementResult>,
    #[serde(default)]
    errors: Vec<Neo4jError>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    columns: Vec<String>,
    #[serde(default)]
    data: Vec<RowData>,
}

#[derive(Debug, Deserialize)]
struct RowData {
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct Neo4jError {
    code: String,
    message: String,
}

#[derive(Debug, Clone)]
pub struct Neo4jStore {
    http: reqwest::Client,
    commit_url: String,
    username: String,
    password: String,
}

impl Neo4jStore {
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] for an unusable URI and
    /// [`StoreError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &Neo4jConfig) -> Result<Self, StoreError> {
        let base = config
            .http_base()
            .map_err(|e| StoreError::Config(e.to_string()))?;
        Ok(Self {
            http: client()?,
            commit_url: format!("{base}/db/{}/tx/commit", config.database),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Run one Cypher statement with named `$parameters`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport failure, non-success status, a
    /// Neo4j-reported error, or an undecodable body.
    pub async fn run(&self, statement: &str, parameters: Value) -> Result<Vec<Record>, StoreError> {
        let body = json!({
            "statements": [{
                "statement": statement,
                "parameters": parameters,
            }]
        });

        let resp = self
            .http
            .post(&self.commit_url)
            .basic_auth(&self.username, Some(&self.password))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;
        let resp = check_response(resp).await?;

        let text = resp.text().await?;
        let parsed: CommitResponse =
            serde_json::from_str(&text).map_err(|e| StoreError::Parse(e.to_string()))?;
        into_records(parsed)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the server cannot run a trivial statement.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.run("RETURN 1 AS ok", json!({})).await.map(|_| ())
    }
}

fn into_records(parsed: CommitResponse) -> Result<Vec<Record>, StoreError> {
    if let Some(err) = parsed.errors.first() {
        return Err(StoreError::Query(format!("{}: {}", err.code, err.message)));
    }

    let Some(result) = parsed.results.into_iter().next() else {
        return Ok(Vec::new());
    };

    let records = result
        .data
        .into_iter()
        .map(|data| {
            result
                .columns
                .iter()
                .cloned()
                .zip(data.row)
                .collect::<Record>()
        })
        .collect();
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn zips_columns_with_rows() {
        let parsed: CommitResponse = serde_json::from_value(json!({
            "results": [{
                "columns": ["name", "developers"],
                "data": [
                    {"row": ["rust", 3], "meta": [null, null]},
                    {"row": ["go", {"low": 1, "high": 0}], "meta": [null, null]}
                ]
            }],
            "errors": []
        }))
        .unwrap();

        let records = into_records(parsed).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["name"], "rust");
        assert_eq!(records[0]["developers"], 3);
        assert_eq!(records[1]["developers"], json!({"low": 1, "high": 0}));
    }

    #[test]
    fn reported_errors_fail_the_query() {
        let parsed: CommitResponse = serde_json::from_value(json!({
            "results": [],
            "errors": [{
                "code": "Neo.ClientError.Security.Unauthorized",
                "message": "The client is unauthorized due to authentication failure."
            }]
        }))
        .unwrap();

        let err = into_records(parsed).unwrap_err();
        assert!(matches!(err, StoreError::Query(msg) if msg.contains("Unauthorized")));
    }

    #[test]
    fn no_results_is_empty() {
        let parsed: CommitResponse = serde_json::from_value(json!({})).unwrap();
        assert!(into_records(parsed).unwrap().is_empty());
    }

    #[test]
    fn commit_url_uses_database() {
        let config = Neo4jConfig {
            uri: "neo4j+s://graph.example.io".into(),
            database: "org".into(),
            ..Default::default()
        };
        let store = Neo4jStore::new(&config).unwrap();
        assert_eq!(store.commit_url, "https://graph.example.io/db/org/tx/commit");
    }
}
