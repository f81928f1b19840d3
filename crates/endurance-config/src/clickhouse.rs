//! ClickHouse HTTP interface configuration (`CLICKHOUSE_*`).

use serde::{Deserialize, Serialize};

fn default_host() -> String {
    "localhost".to_string()
}

const fn default_port() -> u16 {
    8123
}

fn default_user() -> String {
    "default".to_string()
}

fn default_database() -> String {
    "default".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClickHouseConfig {
    /// Hostname, or a full `http(s)://` URL which is then used verbatim.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_database")]
    pub database: String,

    /// Use TLS when building the URL from `host` and `port`.
    #[serde(default)]
    pub secure: bool,
}

impl Default for ClickHouseConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user: default_user(),
            password: String::new(),
            database: default_database(),
            secure: false,
        }
    }
}

impl ClickHouseConfig {
    /// Base URL of the HTTP interface.
    #[must_use]
    pub fn url(&self) -> String {
        if self.host.starts_with("http://") || self.host.starts_with("https://") {
            return self.host.trim_end_matches('/').to_string();
        }
        let scheme = if self.secure { "https" } else { "http" };
        format!("{scheme}://{}:{}", self.host, self.port)
    }
}
