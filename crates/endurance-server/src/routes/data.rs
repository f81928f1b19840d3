//! Store-backed dashboard routes.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Response;
use endurance_core::Endpoint;
use endurance_core::params::{DateRange, validate_project};
use endurance_metrics::{
    Window, blockers, code_quality, collaboration, dora, employees, financials, pipelines, skills,
    sprints,
};
use serde::Deserialize;

use crate::respond::{ApiError, respond};
use crate::state::AppState;

/// Optional filters accepted by the event-stream routes.
#[derive(Debug, Default, Deserialize)]
pub struct WindowParams {
    pub project: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl WindowParams {
    /// Validate against the dashboard allow-list and default window.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadRequest`] for malformed dates or projects.
    pub fn window(&self, state: &AppState) -> Result<Window, ApiError> {
        let range = DateRange::parse(
            self.from.as_deref(),
            self.to.as_deref(),
            AppState::today(),
            state.dashboard.default_window_days,
        )?;
        let project = match self.project.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => {
                validate_project(p, &state.dashboard.allowed_projects)?;
                Some(p.to_string())
            }
            _ => None,
        };
        Ok(Window::new(range, project))
    }
}

pub async fn employees(State(state): State<Arc<AppState>>) -> Response {
    let result = employees::load(&state.stores.postgres, AppState::today()).await;
    respond(&state, Endpoint::Employees, result.map_err(ApiError::from))
}

pub async fn sprints(State(state): State<Arc<AppState>>) -> Response {
    let result = sprints::load(&state.stores.postgres).await;
    respond(&state, Endpoint::Sprints, result.map_err(ApiError::from))
}

pub async fn financials(State(state): State<Arc<AppState>>) -> Response {
    let result = financials::load(&state.stores.postgres).await;
    respond(&state, Endpoint::Financials, result.map_err(ApiError::from))
}

pub async fn pipelines(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WindowParams>,
) -> Response {
    let result = match params.window(&state) {
        Ok(window) => pipelines::load(&state.stores.clickhouse, &window)
            .await
            .map_err(ApiError::from),
        Err(e) => Err(e),
    };
    respond(&state, Endpoint::Pipelines, result)
}

pub async fn dora(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WindowParams>,
) -> Response {
    let mttr = state.fallbacks.placeholders().mttr_minutes;
    let result = match params.window(&state) {
        Ok(window) => dora::load(&state.stores.clickhouse, &window, mttr)
            .await
            .map_err(ApiError::from),
        Err(e) => Err(e),
    };
    respond(&state, Endpoint::Dora, result)
}

pub async fn code_quality(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WindowParams>,
) -> Response {
    let services = state.fallbacks.placeholders().services_count;
    let result = match params.window(&state) {
        Ok(window) => code_quality::load(&state.stores.clickhouse, &window, services)
            .await
            .map_err(ApiError::from),
        Err(e) => Err(e),
    };
    respond(&state, Endpoint::CodeQuality, result)
}

pub async fn collaboration(State(state): State<Arc<AppState>>) -> Response {
    let result = collaboration::load(&state.stores.neo4j).await;
    respond(&state, Endpoint::Collaboration, result.map_err(ApiError::from))
}

pub async fn skills(State(state): State<Arc<AppState>>) -> Response {
    let result = skills::load(&state.stores.neo4j).await;
    respond(&state, Endpoint::Skills, result.map_err(ApiError::from))
}

pub async fn blockers(State(state): State<Arc<AppState>>) -> Response {
    let result = blockers::load(&state.stores.neo4j).await;
    respond(&state, Endpoint::Blockers, result.map_err(ApiError::from))
}
