//! `GET /api/blockers`: developers blocked on projects.

use endurance_core::math::{mean, round2};
use endurance_core::normalize::{field_integer, field_text};
use endurance_stores::{Neo4jStore, Record};
use serde::Serialize;
use serde_json::json;

use crate::{MetricsError, Outcome};

const QUERY: &str = "\
MATCH (d:Developer)-[b:BLOCKED_ON]->(p:Project)
RETURN d.name AS developer,
       p.name AS project,
       b.reason AS reason,
       coalesce(b.days, 0) AS days
ORDER BY days DESC, developer";

#[derive(Debug, Serialize)]
struct Blocker {
    developer: String,
    project: String,
    reason: String,
    days: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BlockersPayload {
    blockers: Vec<Blocker>,
    total_blocked: usize,
    avg_days_blocked: f64,
}

/// # Errors
///
/// Returns [`MetricsError`] if the statement fails.
pub async fn load(store: &Neo4jStore) -> Result<Outcome, MetricsError> {
    let records = store.run(QUERY, json!({})).await?;
    compose(&records)
}

/// # Errors
///
/// Returns [`MetricsError::Encode`] if the payload fails to serialize.
pub fn compose(records: &[Record]) -> Result<Outcome, MetricsError> {
    if records.is_empty() {
        return Ok(Outcome::Empty);
    }

    let blockers: Vec<Blocker> = records
        .iter()
        .map(|r| Blocker {
            developer: field_text(r, "developer"),
            project: field_text(r, "project"),
            reason: field_text(r, "reason"),
            days: field_integer(r, "days").max(0),
        })
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let days: f64 = blockers.iter().map(|b| b.days as f64).sum();
    let avg_days_blocked = round2(mean(days, blockers.len() as u64));

    Outcome::live(&BlockersPayload {
        total_blocked: blockers.len(),
        blockers,
        avg_days_blocked,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn nobody_blocked_is_empty() {
        assert!(compose(&[]).unwrap().is_empty());
    }

    #[test]
    fn averages_days() {
        let records = vec![
            record(json!({"developer": "Ada", "project": "Checkout",
                          "reason": "waiting on API", "days": {"low": 5, "high": 0}})),
            record(json!({"developer": "Grace", "project": "Search",
                          "reason": null, "days": "2"})),
        ];
        let Outcome::Live(body) = compose(&records).unwrap() else {
            panic!("expected live payload");
        };
        assert_eq!(body["totalBlocked"], 2);
        assert_eq!(body["avgDaysBlocked"], 3.5);
        assert_eq!(body["blockers"][0]["days"], 5);
        assert_eq!(body["blockers"][1]["reason"], "");
    }
}
