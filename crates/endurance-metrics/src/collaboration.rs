//! `GET /api/collaboration`: developer collaboration graph.

use endurance_core::math::{ratio, round2};
use endurance_core::normalize::{field_integer, field_number, field_text};
use endurance_stores::{Neo4jStore, Record};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::{MetricsError, Outcome};

/// Upper bound on edges sent to the dashboard graph.
pub const MAX_LINKS: i64 = 2000;

const NODES: &str = "\
MATCH (d:Developer)
RETURN toString(d.id) AS id, d.name AS name, d.team AS team
ORDER BY d.name";

const LINKS: &str = "\
MATCH (a:Developer)-[r:COLLABORATES_WITH]->(b:Developer)
RETURN toString(a.id) AS source, toString(b.id) AS target, coalesce(r.weight, 1) AS weight
ORDER BY weight DESC
LIMIT $limit";

const EDGE_COUNT: &str = "\
MATCH (:Developer)-[r:COLLABORATES_WITH]->(:Developer)
RETURN count(r) AS edges";

/// Weight of an edge that carries none.
const DEFAULT_WEIGHT: f64 = 1.0;

#[derive(Debug, Serialize)]
struct Node {
    id: String,
    name: String,
    team: String,
}

#[derive(Debug, Serialize)]
struct Link {
    source: String,
    target: String,
    weight: f64,
}

#[derive(Debug, Serialize)]
struct CollaborationPayload {
    nodes: Vec<Node>,
    links: Vec<Link>,
    density: f64,
}

/// # Errors
///
/// Returns [`MetricsError`] if any statement fails.
pub async fn load(store: &Neo4jStore) -> Result<Outcome, MetricsError> {
    let (nodes, links, count) = tokio::try_join!(
        store.run(NODES, json!({})),
        store.run(LINKS, json!({ "limit": MAX_LINKS })),
        store.run(EDGE_COUNT, json!({})),
    )?;
    let edges = count.first().map_or(0, |r| field_integer(r, "edges"));
    debug!(nodes = nodes.len(), links = links.len(), edges, "collaboration graph loaded");
    compose(&nodes, &links, edges)
}

fn weight(record: &Record) -> f64 {
    match record.get("weight") {
        None | Some(serde_json::Value::Null) => DEFAULT_WEIGHT,
        Some(_) => field_number(record, "weight"),
    }
}

/// Density is `edges` over possible directed edges, `n * (n - 1)`.
/// `edges` is the full count, so it stays correct when `links` is capped at
/// [`MAX_LINKS`].
///
/// # Errors
///
/// Returns [`MetricsError::Encode`] if the payload fails to serialize.
pub fn compose(nodes: &[Record], links: &[Record], edges: i64) -> Result<Outcome, MetricsError> {
    if nodes.is_empty() {
        return Ok(Outcome::Empty);
    }

    let nodes: Vec<Node> = nodes
        .iter()
        .map(|r| Node {
            id: field_text(r, "id"),
            name: field_text(r, "name"),
            team: field_text(r, "team"),
        })
        .collect();
    let links: Vec<Link> = links
        .iter()
        .map(|r| Link {
            source: field_text(r, "source"),
            target: field_text(r, "target"),
            weight: round2(weight(r)),
        })
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let (n, edges) = (nodes.len() as f64, edges.max(0) as f64);
    let density = round2(ratio(edges, n * (n - 1.0)));

    Outcome::live(&CollaborationPayload {
        nodes,
        links,
        density,
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
    fn no_developers_is_empty() {
        assert!(compose(&[], &[], 0).unwrap().is_empty());
    }

    #[test]
    fn single_developer_has_zero_density() {
        let nodes = vec![record(json!({"id": "1", "name": "Ada", "team": "Core"}))];
        let Outcome::Live(body) = compose(&nodes, &[], 0).unwrap() else {
            panic!("expected live payload");
        };
        assert_eq!(body["density"], 0.0);
        assert_eq!(body["links"], json!([]));
    }

    #[test]
    fn wrapped_weights_and_density() {
        let nodes = vec![
            record(json!({"id": "1", "name": "Ada", "team": "Core"})),
            record(json!({"id": "2", "name": "Grace", "team": null})),
            record(json!({"id": "3", "name": "Linus", "team": "Kernel"})),
        ];
        let links = vec![
            record(json!({"source": "1", "target": "2", "weight": {"low": 7, "high": 0}})),
            record(json!({"source": "2", "target": "3", "weight": 2.5})),
            record(json!({"source": "3", "target": "1", "weight": null})),
        ];
        let Outcome::Live(body) = compose(&nodes, &links, 3).unwrap() else {
            panic!("expected live payload");
        };
        assert_eq!(body["density"], 0.5);
        assert_eq!(body["nodes"][1]["team"], "");
        assert_eq!(body["links"][0]["weight"], 7.0);
        assert_eq!(body["links"][1]["weight"], 2.5);
        assert_eq!(body["links"][2]["weight"], 1.0);
    }

    #[test]
    fn density_counts_edges_beyond_the_link_cap() {
        let nodes = vec![
            record(json!({"id": "1", "name": "Ada", "team": "Core"})),
            record(json!({"id": "2", "name": "Grace", "team": "Core"})),
        ];
        let links = vec![record(json!({"source": "1", "target": "2"}))];
        let Outcome::Live(body) = compose(&nodes, &links, 2).unwrap() else {
            panic!("expected live payload");
        };
        assert_eq!(body["density"], 1.0);
        assert_eq!(body["links"].as_array().unwrap().len(), 1);
        assert_eq!(body["links"][0]["weight"], 1.0);
    }
}
