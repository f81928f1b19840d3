//! `GET /api/sprints`: velocity over the most recent sprints.

use endurance_core::math::{mean, percent, round2};
use endurance_stores::PostgresStore;
use serde::Serialize;

use crate::{MetricsError, Outcome};

/// Sprints shown in the velocity trend.
pub const TREND_LENGTH: i64 = 12;

const QUERY: &str = "\
SELECT COALESCE(s.name, '') AS sprint,
       COALESCE(t.name, '') AS team,
       COALESCE(s.planned_points, 0)::bigint AS planned,
       COALESCE(s.completed_points, 0)::bigint AS completed
FROM sprints s
LEFT JOIN teams t ON t.id = s.team_id
ORDER BY s.start_date DESC NULLS LAST, s.id DESC
LIMIT $1";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SprintRow {
    pub sprint: String,
    pub team: String,
    pub planned: i64,
    pub completed: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TrendPoint {
    sprint: String,
    team: String,
    planned: i64,
    completed: i64,
    completion_rate: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SprintsPayload {
    avg_velocity: f64,
    velocity_trend: Vec<TrendPoint>,
}

/// # Errors
///
/// Returns [`MetricsError`] if the query fails.
pub async fn load(store: &PostgresStore) -> Result<Outcome, MetricsError> {
    let rows: Vec<SprintRow> = sqlx::query_as(QUERY)
        .bind(TREND_LENGTH)
        .fetch_all(store.pool())
        .await?;
    compose(rows)
}

/// Rows arrive newest first; the trend is emitted oldest first.
///
/// # Errors
///
/// Returns [`MetricsError::Encode`] if the payload fails to serialize.
pub fn compose(mut rows: Vec<SprintRow>) -> Result<Outcome, MetricsError> {
    if rows.is_empty() {
        return Ok(Outcome::Empty);
    }
    rows.reverse();

    #[allow(clippy::cast_precision_loss)]
    let completed_sum: f64 = rows.iter().map(|r| r.completed as f64).sum();
    let avg_velocity = round2(mean(completed_sum, rows.len() as u64));

    #[allow(clippy::cast_precision_loss)]
    let velocity_trend = rows
        .into_iter()
        .map(|r| TrendPoint {
            completion_rate: percent(r.completed as f64, r.planned as f64),
            sprint: r.sprint,
            team: r.team,
            planned: r.planned,
            completed: r.completed,
        })
        .collect();

    Outcome::live(&SprintsPayload {
        avg_velocity,
        velocity_trend,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(sprint: &str, planned: i64, completed: i64) -> SprintRow {
        SprintRow {
            sprint: sprint.into(),
            team: "Payments".into(),
            planned,
            completed,
        }
    }

    #[test]
    fn empty_rows_are_empty() {
        assert!(compose(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn averages_velocity_and_orders_oldest_first() {
        let rows = vec![row("S3", 40, 30), row("S2", 40, 40), row("S1", 0, 5)];
        let Outcome::Live(body) = compose(rows).unwrap() else {
            panic!("expected live payload");
        };

        assert_eq!(body["avgVelocity"], 25.0);
        let trend = body["velocityTrend"].as_array().unwrap();
        let names: Vec<_> = trend.iter().map(|p| p["sprint"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["S1", "S2", "S3"]);
        // Zero planned points never divides by zero.
        assert_eq!(trend[0]["completionRate"], 0.0);
        assert_eq!(trend[1]["completionRate"], 100.0);
        assert_eq!(trend[2]["completionRate"], 75.0);
    }
}
