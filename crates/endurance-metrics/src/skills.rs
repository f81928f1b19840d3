//! `GET /api/skills`: skill coverage across developers.

use endurance_core::math::round2;
use endurance_core::normalize::{field_integer, field_number, field_text};
use endurance_stores::{Neo4jStore, Record};
use serde::Serialize;
use serde_json::json;

use crate::{MetricsError, Outcome};

/// Skills held by fewer developers than this are reported as gaps.
pub const MIN_HOLDERS: i64 = 2;

const QUERY: &str = "\
MATCH (s:Skill)
OPTIONAL MATCH (d:Developer)-[h:HAS_SKILL]->(s)
RETURN s.name AS name,
       s.category AS category,
       count(d) AS developers,
       avg(h.proficiency) AS avg_proficiency
ORDER BY developers DESC, name";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Skill {
    name: String,
    category: String,
    developers: i64,
    avg_proficiency: f64,
}

#[derive(Debug, Serialize)]
struct SkillsPayload {
    skills: Vec<Skill>,
    gaps: Vec<String>,
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

    let skills: Vec<Skill> = records
        .iter()
        .map(|r| Skill {
            name: field_text(r, "name"),
            category: field_text(r, "category"),
            developers: field_integer(r, "developers"),
            avg_proficiency: round2(field_number(r, "avg_proficiency")),
        })
        .collect();
    let gaps = skills
        .iter()
        .filter(|s| s.developers < MIN_HOLDERS)
        .map(|s| s.name.clone())
        .collect();

    Outcome::live(&SkillsPayload { skills, gaps })
}
