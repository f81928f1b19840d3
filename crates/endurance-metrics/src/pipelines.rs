//! `GET /api/pipelines`: CI run outcomes per project.

use endurance_core::math::{percent, round2};
use endurance_core::normalize::{field_integer, field_number, field_text};
use endurance_stores::{ClickHouseStore, Row};
use serde::Serialize;

use crate::{MetricsError, Outcome, Window};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Pipeline {
    project_id: String,
    total: i64,
    succeeded: i64,
    failed: i64,
    success_rate: f64,
    avg_duration_secs: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PipelinesPayload {
    pipelines: Vec<Pipeline>,
    total_runs: i64,
    failure_rate: f64,
}

fn query() -> String {
    format!(
        "SELECT project_id, \
                count() AS total, \
                countIf(JSONExtractString(metadata, 'status') = 'success') AS succeeded, \
                countIf(JSONExtractString(metadata, 'status') = 'failed') AS failed, \
                avg(JSONExtractFloat(metadata, 'duration_secs')) AS avg_duration_secs \
         FROM events \
         WHERE event_type = 'pipeline_run' AND {} \
         GROUP BY project_id \
         ORDER BY project_id",
        Window::FILTER
    )
}

/// # Errors
///
/// Returns [`MetricsError`] if the query fails.
pub async fn load(store: &ClickHouseStore, window: &Window) -> Result<Outcome, MetricsError> {
    let params = window.params();
    let rows = store.query(&query(), &params).await?;
    compose(&rows)
}

/// # Errors
///
/// Returns [`MetricsError::Encode`] if the payload fails to serialize.
pub fn compose(rows: &[Row]) -> Result<Outcome, MetricsError> {
    let pipelines: Vec<Pipeline> = rows
        .iter()
        .map(|row| {
            let total = field_integer(row, "total");
            let succeeded = field_integer(row, "succeeded");
            #[allow(clippy::cast_precision_loss)]
            let success_rate = percent(succeeded as f64, total as f64);
            Pipeline {
                project_id: field_text(row, "project_id"),
                total,
                succeeded,
                failed: field_integer(row, "failed"),
                success_rate,
                avg_duration_secs: round2(field_number(row, "avg_duration_secs")),
            }
        })
        .filter(|p| p.total > 0)
        .collect();
    if pipelines.is_empty() {
        return Ok(Outcome::Empty);
    }

    let total_runs: i64 = pipelines.iter().map(|p| p.total).sum();
    let failed: i64 = pipelines.iter().map(|p| p.failed).sum();
    #[allow(clippy::cast_precision_loss)]
    let failure_rate = percent(failed as f64, total_runs as f64);

    Outcome::live(&PipelinesPayload {
        pipelines,
        total_runs,
        failure_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn no_runs_is_empty() {
        assert!(compose(&[]).unwrap().is_empty());
    }

    #[test]
    fn counts_arrive_as_strings() {
        let rows = vec![
            row(json!({"project_id": "checkout", "total": "10", "succeeded": "8",
                       "failed": "2", "avg_duration_secs": 312.456})),
            row(json!({"project_id": "search", "total": "10", "succeeded": "10",
                       "failed": "0", "avg_duration_secs": null})),
        ];
        let Outcome::Live(body) = compose(&rows).unwrap() else {
            panic!("expected live payload");
        };

        assert_eq!(body["totalRuns"], 20);
        assert_eq!(body["failureRate"], 10.0);
        assert_eq!(body["pipelines"][0]["successRate"], 80.0);
        assert_eq!(body["pipelines"][0]["avgDurationSecs"], 312.46);
        assert_eq!(body["pipelines"][1]["avgDurationSecs"], 0.0);
    }

    #[test]
    fn query_uses_window_filter() {
        let sql = query();
        assert!(sql.contains("{from:DateTime}"));
        assert!(sql.contains("{project:String}"));
    }
}
