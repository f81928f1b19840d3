//! PostgreSQL adapter.
//!
//! The pool is created lazily: building a [`PostgresStore`] never touches the
//! network, and an unreachable server only surfaces as an error on the first
//! query (after `acquire_timeout_secs`).

use std::str::FromStr;
use std::time::Duration;

use endurance_config::PostgresConfig;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::error::StoreError;

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Build a lazily-connecting pool from configuration.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Postgres`] if `url` is set but cannot be parsed.
    pub fn new(config: &PostgresConfig) -> Result<Self, StoreError> {
        let options = if config.has_url() {
            PgConnectOptions::from_str(&config.url)?
        } else {
            PgConnectOptions::new()
                .host(&config.host)
                .port(config.port)
                .username(&config.user)
                .password(&config.password)
                .database(&config.db)
        };

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_lazy_with(options);

        Ok(Self { pool })
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Postgres`] if no connection can be acquired.
    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
