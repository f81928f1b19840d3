//! Static fallback payloads, one per endpoint.
//!
//! The dashboard never renders a hard failure: when a store or upstream
//! service is unavailable the route answers with the payload below, which has
//! the same keys as the live shape. A handful of numbers in here read like
//! business rules but have no known provenance, so they come from
//! configuration as [`Placeholders`] instead of being inlined.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::endpoint::Endpoint;

const fn default_mttr_minutes() -> f64 {
    45.0
}

const fn default_services_count() -> u32 {
    12
}

const fn default_sprint_velocity() -> f64 {
    42.0
}

/// Placeholder constants used by fallbacks and composers.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Placeholders {
    /// MTTR reported when no incident has been resolved in the window.
    #[serde(default = "default_mttr_minutes")]
    pub mttr_minutes: f64,

    /// Number of services the code-quality compliance score is measured against.
    #[serde(default = "default_services_count")]
    pub services_count: u32,

    /// Sprint velocity shown when sprint data is unavailable.
    #[serde(default = "default_sprint_velocity")]
    pub sprint_velocity: f64,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            mttr_minutes: default_mttr_minutes(),
            services_count: default_services_count(),
            sprint_velocity: default_sprint_velocity(),
        }
    }
}

/// Lookup table of fallback payloads keyed by [`Endpoint`].
#[derive(Debug, Clone, Default)]
pub struct FallbackTable {
    placeholders: Placeholders,
}

impl FallbackTable {
    #[must_use]
    pub const fn new(placeholders: Placeholders) -> Self {
        Self { placeholders }
    }

    #[must_use]
    pub const fn placeholders(&self) -> &Placeholders {
        &self.placeholders
    }

    /// Fallback payload for `endpoint`, without envelope keys.
    #[must_use]
    pub fn payload(&self, endpoint: Endpoint) -> Value {
        let p = &self.placeholders;
        match endpoint {
            Endpoint::Employees => json!({
                "employees": [],
                "totalCount": 0,
                "byDepartment": {},
            }),
            Endpoint::Sprints => json!({
                "avgVelocity": p.sprint_velocity,
                "velocityTrend": [],
            }),
            Endpoint::Pipelines => json!({
                "pipelines": [],
                "totalRuns": 0,
                "failureRate": 0.0,
            }),
            Endpoint::Dora => json!({
                "deploymentFrequency": 1.0,
                "leadTimeHours": 24.0,
                "changeFailureRate": 15.0,
                "mttrMinutes": p.mttr_minutes,
                "performanceTier": "high",
                "totalDeployments": 0,
                "periodDays": 30,
            }),
            Endpoint::CodeQuality => json!({
                "avgCoverage": 75.0,
                "avgReviewHours": 8.0,
                "avgPrSize": 200.0,
                "totalReviews": 0,
                "complianceScore": 0.0,
                "byProject": [],
            }),
            Endpoint::Collaboration => json!({
                "nodes": [],
                "links": [],
                "density": 0.0,
            }),
            Endpoint::Skills => json!({
                "skills": [],
                "gaps": [],
            }),
            Endpoint::Blockers => json!({
                "blockers": [],
                "totalBlocked": 0,
                "avgDaysBlocked": 0.0,
            }),
            Endpoint::Financials => json!({
                "totalBudget": 0.0,
                "totalSpend": 0.0,
                "utilization": 0.0,
                "byTeam": [],
            }),
            Endpoint::AiSearch => json!({
                "query": "",
                "answer": "AI insights are temporarily unavailable. Please try again shortly.",
            }),
            Endpoint::Anomalies => json!({
                "anomalies": [],
                "summary": "Anomaly detection is currently unavailable.",
            }),
            Endpoint::ExpertsFind => json!({
                "experts": [],
            }),
            Endpoint::Message => json!({
                "response": "The assistant is unavailable right now.",
                "sessionId": null,
            }),
            Endpoint::OneOnOnePrep => json!({
                "prep": "1:1 preparation notes could not be generated.",
            }),
            Endpoint::DoraAnalysis => json!({
                "analysis": "DORA analysis is unavailable.",
            }),
            Endpoint::WeeklyReport => json!({
                "report": "The weekly report could not be generated.",
            }),
            Endpoint::RiskReport => json!({
                "risks": [],
            }),
            Endpoint::AiRecommendations => json!({
                "recommendations": [
                    "Reduce batch size of deployments to lower change failure rate.",
                    "Automate the slowest pipeline stage to shorten lead time.",
                    "Pair developers across teams to spread single-owner skills.",
                ],
            }),
        }
    }
}
