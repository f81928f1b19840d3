//! Route table.

pub mod ai;
pub mod data;
pub mod health;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use endurance_core::Endpoint;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub const HEALTH_PATH: &str = "/api/health";

/// Every dashboard, AI, and health route with CORS and request tracing.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(Endpoint::Employees.path(), get(data::employees))
        .route(Endpoint::Sprints.path(), get(data::sprints))
        .route(Endpoint::Pipelines.path(), get(data::pipelines))
        .route(Endpoint::Dora.path(), get(data::dora))
        .route(Endpoint::CodeQuality.path(), get(data::code_quality))
        .route(Endpoint::Collaboration.path(), get(data::collaboration))
        .route(Endpoint::Skills.path(), get(data::skills))
        .route(Endpoint::Blockers.path(), get(data::blockers))
        .route(Endpoint::Financials.path(), get(data::financials))
        .route(
            Endpoint::AiSearch.path(),
            get(ai::search_get).post(ai::search_post),
        )
        .route(Endpoint::Anomalies.path(), post(ai::anomalies))
        .route(Endpoint::ExpertsFind.path(), post(ai::experts))
        .route(Endpoint::Message.path(), post(ai::message))
        .route(Endpoint::OneOnOnePrep.path(), post(ai::prep))
        .route(Endpoint::DoraAnalysis.path(), post(ai::dora_analysis))
        .route(Endpoint::WeeklyReport.path(), post(ai::weekly_report))
        .route(Endpoint::RiskReport.path(), get(ai::risks))
        .route(Endpoint::AiRecommendations.path(), get(ai::recommendations))
        .route(HEALTH_PATH, get(health::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
