//! PostgreSQL connection configuration (`POSTGRES_*`).

use serde::{Deserialize, Serialize};

fn default_host() -> String {
    "localhost".to_string()
}

const fn default_port() -> u16 {
    5432
}

fn default_user() -> String {
    "postgres".to_string()
}

fn default_db() -> String {
    "endurance".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

const fn default_acquire_timeout_secs() -> u64 {
    5
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PostgresConfig {
    /// Full connection URL. When set it wins over the discrete fields.
    #[serde(default)]
    pub url: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default)]
    pub password: String,

    /// Database name (`POSTGRES_DB` or `POSTGRES_DATABASE`).
    #[serde(default = "default_db", alias = "database")]
    pub db: String,

    /// Upper bound on pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long a query waits for a connection before failing.
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            host: default_host(),
            port: default_port(),
            user: default_user(),
            password: String::new(),
            db: default_db(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

impl PostgresConfig {
    #[must_use]
    pub fn has_url(&self) -> bool {
        !self.url.is_empty()
    }
}
