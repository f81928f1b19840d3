//! `GET /api/financials`: budget against salary spend, per team.

use endurance_core::math::{percent, ratio, round2};
use endurance_stores::PostgresStore;
use serde::Serialize;

use crate::{MetricsError, Outcome};

const QUERY: &str = "\
SELECT COALESCE(t.name, '') AS team,
       COALESCE(t.budget, 0)::float8 AS budget,
       COALESCE(SUM(e.salary), 0)::float8 AS spend,
       COUNT(e.id)::bigint AS headcount
FROM teams t
LEFT JOIN employees e ON e.team_id = t.id
GROUP BY t.id, t.name, t.budget
ORDER BY t.name";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TeamCostRow {
    pub team: String,
    pub budget: f64,
    pub spend: f64,
    pub headcount: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TeamCost {
    team: String,
    budget: f64,
    spend: f64,
    headcount: i64,
    cost_per_head: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FinancialsPayload {
    total_budget: f64,
    total_spend: f64,
    utilization: f64,
    by_team: Vec<TeamCost>,
}

/// # Errors
///
/// Returns [`MetricsError`] if the query fails.
pub async fn load(store: &PostgresStore) -> Result<Outcome, MetricsError> {
    let rows: Vec<TeamCostRow> = sqlx::query_as(QUERY).fetch_all(store.pool()).await?;
    compose(rows)
}

/// # Errors
///
/// Returns [`MetricsError::Encode`] if the payload fails to serialize.
pub fn compose(rows: Vec<TeamCostRow>) -> Result<Outcome, MetricsError> {
    if rows.is_empty() {
        return Ok(Outcome::Empty);
    }

    let total_budget: f64 = rows.iter().map(|r| r.budget).sum();
    let total_spend: f64 = rows.iter().map(|r| r.spend).sum();

    #[allow(clippy::cast_precision_loss)]
    let by_team = rows
        .into_iter()
        .map(|r| TeamCost {
            cost_per_head: round2(ratio(r.spend, r.headcount as f64)),
            team: r.team,
            budget: round2(r.budget),
            spend: round2(r.spend),
            headcount: r.headcount,
        })
        .collect();

    Outcome::live(&FinancialsPayload {
        total_budget: round2(total_budget),
        total_spend: round2(total_spend),
        utilization: percent(total_spend, total_budget),
        by_team,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(team: &str, budget: f64, spend: f64, headcount: i64) -> TeamCostRow {
        TeamCostRow {
            team: team.into(),
            budget,
            spend,
            headcount,
        }
    }

    #[test]
    fn totals_and_utilization() {
        let rows = vec![
            row("Platform", 1_000_000.0, 600_000.0, 4),
            row("Data", 500_000.0, 300_000.0, 2),
        ];
        let Outcome::Live(body) = compose(rows).unwrap() else {
            panic!("expected live payload");
        };
        assert_eq!(body["totalBudget"], 1_500_000.0);
        assert_eq!(body["totalSpend"], 900_000.0);
        assert_eq!(body["utilization"], 60.0);
        assert_eq!(body["byTeam"][0]["costPerHead"], 150_000.0);
    }

    #[test]
    fn team_without_people_or_budget_is_zero_not_nan() {
        let rows = vec![row("New team", 0.0, 0.0, 0)];
        let Outcome::Live(body) = compose(rows).unwrap() else {
            panic!("expected live payload");
        };
        assert_eq!(body["utilization"], 0.0);
        assert_eq!(body["byTeam"][0]["costPerHead"], 0.0);
    }
}
