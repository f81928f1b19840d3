//! Neo4j configuration (`NEO4J_*`).
//!
//! The graph store is reached over Neo4j's HTTP transactional endpoint, so
//! Bolt-style URIs from the environment are translated into an HTTP base URL.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_username() -> String {
    "neo4j".to_string()
}

fn default_database() -> String {
    "neo4j".to_string()
}

const BOLT_PORT: &str = ":7687";
const HTTP_PORT: &str = ":7474";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Neo4jConfig {
    /// `neo4j://`, `neo4j+s://`, `bolt://`, `bolt+s://`, or `http(s)://` URI.
    #[serde(default = "default_uri")]
    pub uri: String,

    /// Accepts `NEO4J_USERNAME` or `NEO4J_USER`.
    #[serde(default = "default_username", alias = "user")]
    pub username: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_database")]
    pub database: String,
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            username: default_username(),
            password: String::new(),
            database: default_database(),
        }
    }
}

impl Neo4jConfig {
    /// HTTP base URL derived from [`uri`](Self::uri).
    ///
    /// `+s`/`+ssc` schemes map to `https`, plain schemes to `http`, and the
    /// default Bolt port 7687 is swapped for the HTTP port 7474.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unrecognized scheme.
    pub fn http_base(&self) -> Result<String, ConfigError> {
        let (scheme, rest) = self
            .uri
            .split_once("://")
            .ok_or_else(|| invalid_uri(&self.uri))?;

        let http_scheme = match scheme {
            "http" | "bolt" | "neo4j" => "http",
            "https" | "bolt+s" | "bolt+ssc" | "neo4j+s" | "neo4j+ssc" => "https",
            _ => return Err(invalid_uri(&self.uri)),
        };

        let host = rest.trim_end_matches('/');
        if host.is_empty() {
            return Err(invalid_uri(&self.uri));
        }
        let host = host
            .strip_suffix(BOLT_PORT)
            .map_or_else(|| host.to_string(), |h| format!("{h}{HTTP_PORT}"));

        Ok(format!("{http_scheme}://{host}"))
    }
}

fn invalid_uri(uri: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: "neo4j.uri".to_string(),
        reason: format!("unsupported URI '{uri}'"),
    }
}
