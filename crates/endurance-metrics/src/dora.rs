//! `GET /api/dora`: the four DORA keys over a date window.
//!
//! All four are computed from one conditional-aggregate pass over `events`:
//!
//! | Metric                | Source events                          |
//! |-----------------------|----------------------------------------|
//! | deployment frequency  | `deployment` + `deployment_failed`     |
//! | lead time             | `pr_merged.lead_time_hours`            |
//! | change failure rate   | `deployment_failed` / all deployments  |
//! | MTTR                  | `incident_resolved.resolution_minutes` |

use endurance_core::math::{percent, ratio, round2};
use endurance_core::normalize::{field_integer, field_number};
use endurance_stores::{ClickHouseStore, Row};
use serde::Serialize;
use tracing::debug;

use crate::{MetricsError, Outcome, Window};

/// DORA performance band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Elite,
    High,
    Medium,
    Low,
}

impl Tier {
    /// Classify by deployments per day and change failure rate (percent).
    #[must_use]
    pub fn classify(deploys_per_day: f64, change_failure_rate: f64) -> Self {
        if deploys_per_day >= 1.0 && change_failure_rate <= 15.0 {
            Self::Elite
        } else if deploys_per_day >= 1.0 / 7.0 && change_failure_rate <= 30.0 {
            Self::High
        } else if deploys_per_day >= 1.0 / 30.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DoraPayload {
    deployment_frequency: f64,
    lead_time_hours: f64,
    change_failure_rate: f64,
    mttr_minutes: f64,
    performance_tier: Tier,
    total_deployments: i64,
    period_days: i64,
}

fn query() -> String {
    format!(
        "SELECT countIf(event_type = 'deployment') AS deployments, \
                countIf(event_type = 'deployment_failed') AS failed_deployments, \
                countIf(event_type = 'pr_merged') AS merged_prs, \
                avgIf(JSONExtractFloat(metadata, 'lead_time_hours'), event_type = 'pr_merged') AS lead_time_hours, \
                countIf(event_type = 'incident_resolved') AS incidents, \
                avgIf(JSONExtractFloat(metadata, 'resolution_minutes'), event_type = 'incident_resolved') AS mttr_minutes \
         FROM events \
         WHERE event_type IN ('deployment', 'deployment_failed', 'pr_merged', 'incident_resolved') \
           AND {}",
        Window::FILTER
    )
}

/// # Errors
///
/// Returns [`MetricsError`] if the query fails.
pub async fn load(
    store: &ClickHouseStore,
    window: &Window,
    mttr_placeholder: f64,
) -> Result<Outcome, MetricsError> {
    debug!(
        from = %window.range.from,
        to = %window.range.to,
        project = window.project.as_deref().unwrap_or("*"),
        "loading DORA metrics"
    );
    let params = window.params();
    let rows = store.query(&query(), &params).await?;
    compose(rows.first(), window.range.days(), mttr_placeholder)
}

/// `avgIf` over zero rows is `nan`, which ClickHouse emits as `null`; the
/// counts decide whether an average is meaningful.
///
/// # Errors
///
/// Returns [`MetricsError::Encode`] if the payload fails to serialize.
pub fn compose(
    row: Option<&Row>,
    period_days: i64,
    mttr_placeholder: f64,
) -> Result<Outcome, MetricsError> {
    let Some(row) = row else {
        return Ok(Outcome::Empty);
    };
    let deployments = field_integer(row, "deployments");
    let failed = field_integer(row, "failed_deployments");
    let merged = field_integer(row, "merged_prs");
    let incidents = field_integer(row, "incidents");
    if deployments + failed + merged + incidents == 0 {
        return Ok(Outcome::Empty);
    }

    let total_deployments = deployments + failed;
    #[allow(clippy::cast_precision_loss)]
    let (per_day, change_failure_rate) = (
        ratio(total_deployments as f64, period_days.max(1) as f64),
        percent(failed as f64, total_deployments as f64),
    );
    let lead_time_hours = if merged > 0 {
        field_number(row, "lead_time_hours")
    } else {
        0.0
    };
    let mttr_minutes = if incidents > 0 {
        field_number(row, "mttr_minutes")
    } else {
        mttr_placeholder
    };

    Outcome::live(&DoraPayload {
        deployment_frequency: round2(per_day),
        lead_time_hours: round2(lead_time_hours),
        change_failure_rate,
        mttr_minutes: round2(mttr_minutes),
        performance_tier: Tier::classify(per_day, change_failure_rate),
        total_deployments,
        period_days: period_days.max(1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[rstest]
    #[case(2.0, 10.0, Tier::Elite)]
    #[case(1.0, 15.0, Tier::Elite)]
    #[case(1.0, 20.0, Tier::High)]
    #[case(0.2, 30.0, Tier::High)]
    #[case(0.2, 31.0, Tier::Medium)]
    #[case(0.05, 0.0, Tier::Medium)]
    #[case(0.01, 0.0, Tier::Low)]
    #[case(0.0, 0.0, Tier::Low)]
    fn tiers(#[case] per_day: f64, #[case] cfr: f64, #[case] expected: Tier) {
        assert_eq!(Tier::classify(per_day, cfr), expected);
    }

    #[test]
    fn no_row_or_no_events_is_empty() {
        assert!(compose(None, 30, 45.0).unwrap().is_empty());
        let zeros = row(json!({"deployments": "0", "failed_deployments": "0",
                               "merged_prs": "0", "incidents": "0",
                               "lead_time_hours": null, "mttr_minutes": null}));
        assert!(compose(Some(&zeros), 30, 45.0).unwrap().is_empty());
    }

    #[test]
    fn computes_all_four_keys() {
        let r = row(json!({"deployments": "54", "failed_deployments": "6",
                           "merged_prs": "80", "incidents": "3",
                           "lead_time_hours": 18.333, "mttr_minutes": 37.5}));
        let Outcome::Live(body) = compose(Some(&r), 30, 45.0).unwrap() else {
            panic!("expected live payload");
        };
        assert_eq!(
            body,
            json!({
                "deploymentFrequency": 2.0,
                "leadTimeHours": 18.33,
                "changeFailureRate": 10.0,
                "mttrMinutes": 37.5,
                "performanceTier": "elite",
                "totalDeployments": 60,
                "periodDays": 30,
            })
        );
    }

    #[test]
    fn mttr_falls_back_to_placeholder_without_incidents() {
        let r = row(json!({"deployments": "1", "failed_deployments": "0",
                           "merged_prs": "0", "incidents": "0",
                           "lead_time_hours": null, "mttr_minutes": null}));
        let Outcome::Live(body) = compose(Some(&r), 14, 45.0).unwrap() else {
            panic!("expected live payload");
        };
        assert_eq!(body["mttrMinutes"], 45.0);
        assert_eq!(body["leadTimeHours"], 0.0);
        assert_eq!(body["performanceTier"], "medium");
    }
}
