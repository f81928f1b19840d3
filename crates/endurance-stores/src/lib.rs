//! # endurance-stores
//!
//! Thin adapters around the three backing stores:
//! - [`PostgresStore`]: employees, teams, sprints (sqlx pool)
//! - [`Neo4jStore`]: developer/skill/project graph (HTTP transactional API)
//! - [`ClickHouseStore`]: engineering event stream (HTTP interface)
//!
//! Adapters are plain values built once from configuration and handed to
//! whoever needs them. No retries or backoff happen at this layer.

mod clickhouse;
mod error;
mod http;
mod neo4j;
mod postgres;

pub use clickhouse::{ClickHouseStore, Row};
pub use error::StoreError;
pub use neo4j::{Neo4jStore, Record};
pub use postgres::PostgresStore;

use endurance_config::EnduranceConfig;

/// All three adapters, built together.
#[derive(Debug, Clone)]
pub struct Stores {
    pub postgres: PostgresStore,
    pub neo4j: Neo4jStore,
    pub clickhouse: ClickHouseStore,
}

/// Reachability of each store, as reported by `ping`.
#[derive(Debug)]
pub struct StoreHealth {
    pub postgres: Result<(), StoreError>,
    pub neo4j: Result<(), StoreError>,
    pub clickhouse: Result<(), StoreError>,
}

impl StoreHealth {
    #[must_use]
    pub const fn all_up(&self) -> bool {
        self.postgres.is_ok() && self.neo4j.is_ok() && self.clickhouse.is_ok()
    }
}

impl Stores {
    /// Build every adapter. Nothing connects until the first query.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if any adapter rejects its configuration.
    pub fn from_config(config: &EnduranceConfig) -> Result<Self, StoreError> {
        Ok(Self {
            postgres: PostgresStore::new(&config.postgres)?,
            neo4j: Neo4jStore::new(&config.neo4j)?,
            clickhouse: ClickHouseStore::new(&config.clickhouse)?,
        })
    }

    /// Ping all stores concurrently.
    pub async fn health(&self) -> StoreHealth {
        let (postgres, neo4j, clickhouse) = tokio::join!(
            self.postgres.ping(),
            self.neo4j.ping(),
            self.clickhouse.ping(),
        );

        for (store, result) in [
            ("postgres", &postgres),
            ("neo4j", &neo4j),
            ("clickhouse", &clickhouse),
        ] {
            if let Err(e) = result {
                tracing::warn!(store, %e, "store ping failed");
            }
        }

        StoreHealth {
            postgres,
            neo4j,
            clickhouse,
        }
    }
}
