use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use endurance_stores::StoreError;
use serde_json::{Value, json};

use crate::state::AppState;

fn store_status(result: &Result<(), StoreError>) -> Value {
    match result {
        Ok(()) => Value::from("up"),
        Err(e) => Value::from(e.to_string()),
    }
}

/// `GET /api/health`: always 200, `degraded` when any store is down.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let health = state.stores.health().await;
    Json(json!({
        "status": if health.all_up() { "ok" } else { "degraded" },
        "stores": {
            "postgres": store_status(&health.postgres),
            "neo4j": store_status(&health.neo4j),
            "clickhouse": store_status(&health.clickhouse),
        }
    }))
}
