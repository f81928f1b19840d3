//! # endurance-config
//!
//! Layered configuration loading for Endurance using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. `ENDURANCE_*` environment variables (`__` as separator)
//! 2. Store and AI environment variables (`POSTGRES_*`, `NEO4J_*`,
//!    `CLICKHOUSE_*`, `FEATHERLESS_*`, `HF_*`)
//! 3. An explicit TOML file passed on the command line
//! 4. Project-level `endurance.toml`
//! 5. User-level `~/.config/endurance/config.toml`
//! 6. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Store variables map onto their section with the prefix stripped:
//! `POSTGRES_HOST` -> `postgres.host`, `NEO4J_URI` -> `neo4j.uri`,
//! `HF_ANOMALY_BASE_URL` -> `hf.anomaly_base_url`.
//! Everything else goes through the `ENDURANCE_` prefix:
//! `ENDURANCE_SERVER__PORT` -> `server.port`.
//!
//! # Usage
//!
//! ```no_run
//! use endurance_config::EnduranceConfig;
//!
//! let config = EnduranceConfig::load_with_dotenv(None).expect("config");
//! println!("listening on {}", config.server.bind_addr());
//! ```

mod ai;
mod clickhouse;
mod dashboard;
mod error;
mod neo4j;
mod postgres;
mod server;

pub use ai::{FeatherlessConfig, HostedServicesConfig, RelayConfig};
pub use clickhouse::ClickHouseConfig;
pub use dashboard::DashboardConfig;
pub use error::ConfigError;
pub use neo4j::Neo4jConfig;
pub use postgres::PostgresConfig;
pub use server::ServerConfig;

use endurance_core::Placeholders;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment prefixes owned by a single config section.
const SECTION_PREFIXES: [(&str, &str); 5] = [
    ("POSTGRES_", "postgres"),
    ("NEO4J_", "neo4j"),
    ("CLICKHOUSE_", "clickhouse"),
    ("FEATHERLESS_", "featherless"),
    ("HF_", "hf"),
];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EnduranceConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub postgres: PostgresConfig,
    #[serde(default)]
    pub neo4j: Neo4jConfig,
    #[serde(default)]
    pub clickhouse: ClickHouseConfig,
    #[serde(default)]
    pub featherless: FeatherlessConfig,
    #[serde(default)]
    pub hf: HostedServicesConfig,
    #[serde(default)]
    pub ai: RelayConfig,
    #[serde(default)]
    pub fallbacks: Placeholders,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl EnduranceConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`load_with_dotenv`](Self::load_with_dotenv)
    /// if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source cannot be parsed or a value is invalid.
    pub fn load(extra: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(extra).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source cannot be parsed or a value is invalid.
    pub fn load_with_dotenv(extra: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load(extra)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment(extra: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from("endurance.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        if let Some(path) = extra {
            figment = figment.merge(Toml::file(path));
        }

        for (prefix, section) in SECTION_PREFIXES {
            figment = figment.merge(section_env(prefix, section));
        }

        figment.merge(Env::prefixed("ENDURANCE_").split("__"))
    }

    /// Reject values that would only fail later at request time.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unusable Neo4j URI or a
    /// zero connection limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.neo4j.http_base()?;
        if self.postgres.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "postgres.max_connections".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("endurance").join("config.toml"))
    }
}

/// `PREFIX_SOME_KEY` -> `section.some_key`.
fn section_env(prefix: &'static str, section: &'static str) -> Env {
    Env::prefixed(prefix)
        .map(move |key| format!("{section}.{}", key.as_str().to_ascii_lowercase()).into())
}
