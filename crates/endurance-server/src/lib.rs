//! # endurance-server
//!
//! HTTP API behind the Endurance dashboard. Data routes compose metrics
//! from Postgres, Neo4j and ClickHouse; AI routes relay to the hosted
//! services. Every route answers with a flat JSON envelope and falls back
//! to a static payload when its backend is unavailable.

pub mod cli;
pub mod respond;
pub mod routes;
pub mod state;

pub use respond::{ApiError, respond};
pub use routes::router;
pub use state::AppState;
