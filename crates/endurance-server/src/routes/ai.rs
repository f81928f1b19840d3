//! AI relay routes.
//!
//! Each handler validates its input, gathers dashboard context where the
//! upstream wants it, relays one call, and shapes the reply into the
//! route's documented keys. Context gathering is best effort: a store that
//! is down leaves the context `null` rather than failing the route.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::response::Response;
use endurance_core::params::required;
use endurance_core::{CoreError, Endpoint};
use endurance_metrics::{Outcome, Window, dora, sprints};
use endurance_relay::{Reply, extract_json};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::warn;

use super::data::WindowParams;
use crate::respond::{ApiError, respond};
use crate::state::AppState;

const SEARCH_PROMPT: &str = "You are an engineering analytics assistant. \
Answer questions about the team's delivery metrics concisely, using the \
dashboard context provided. If the context does not contain the answer, say so.";

const RECOMMENDATIONS_PROMPT: &str = "You are an engineering effectiveness coach. \
Given DORA metrics and recent sprint velocity, reply with a JSON array of three \
to five short, actionable recommendations as plain strings.";

/// Parse an optional JSON object body; an empty body is `{}`.
fn object_body(bytes: &Bytes) -> Result<Map<String, Value>, CoreError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(CoreError::InvalidParam {
            field: "body".into(),
            reason: "expected a JSON object".into(),
        }),
        Err(e) => Err(CoreError::InvalidParam {
            field: "body".into(),
            reason: e.to_string(),
        }),
    }
}

fn str_field<'a>(body: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    body.get(key).and_then(Value::as_str)
}

/// Live DORA payload for the default window, or `null`.
async fn dora_context(state: &AppState, window: Option<Window>) -> Value {
    let window = match window {
        Some(w) => w,
        None => match WindowParams::default().window(state) {
            Ok(w) => w,
            Err(_) => return Value::Null,
        },
    };
    let mttr = state.fallbacks.placeholders().mttr_minutes;
    match dora::load(&state.stores.clickhouse, &window, mttr).await {
        Ok(Outcome::Live(value)) => value,
        Ok(Outcome::Empty) => Value::Null,
        Err(error) => {
            warn!(%error, "DORA context unavailable");
            Value::Null
        }
    }
}

async fn sprint_context(state: &AppState) -> Value {
    match sprints::load(&state.stores.postgres).await {
        Ok(Outcome::Live(value)) => value,
        Ok(Outcome::Empty) => Value::Null,
        Err(error) => {
            warn!(%error, "sprint context unavailable");
            Value::Null
        }
    }
}

/// Reply as a list: a JSON array, the array under `key`, or one text item.
fn reply_list(reply: Reply, key: &str) -> Value {
    match reply {
        Reply::Json(Value::Array(items)) => Value::Array(items),
        Reply::Json(Value::Object(mut map)) => match map.remove(key) {
            Some(Value::Array(items)) => Value::Array(items),
            _ => json!([]),
        },
        Reply::Json(_) => json!([]),
        Reply::Text(text) if text.is_empty() => json!([]),
        Reply::Text(text) => json!([text]),
    }
}

/// Reply as a single value: the field under `key`, the whole JSON, or text.
fn reply_value(reply: Reply, key: &str) -> Value {
    match reply {
        Reply::Json(Value::Object(mut map)) => match map.remove(key) {
            Some(value) => value,
            None => Value::Object(map),
        },
        Reply::Json(other) => other,
        Reply::Text(text) => Value::String(text),
    }
}

/// Recommendations as strings: a JSON array if one was produced, otherwise
/// one item per non-empty line with list markers stripped.
fn recommendation_items(answer: &str) -> Vec<Value> {
    if let Some(Value::Array(items)) = extract_json(answer) {
        return items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(Value::String(s)),
                Value::Object(map) => map
                    .get("recommendation")
                    .or_else(|| map.get("text"))
                    .and_then(Value::as_str)
                    .map(Value::from),
                _ => None,
            })
            .collect();
    }
    answer
        .lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(|c: char| c.is_ascii_digit() || matches!(c, '-' | '*' | '.' | ')'))
                .trim()
        })
        .filter(|line| !line.is_empty())
        .map(Value::from)
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

async fn run_search(state: &AppState, query: Option<&str>) -> Result<Outcome, ApiError> {
    let query = required("query", query)?;
    let context = dora_context(state, None).await;
    let prompt = format!("Dashboard context (DORA): {context}\n\nQuestion: {query}");
    let answer = state.relay.featherless.chat(SEARCH_PROMPT, &prompt).await?;
    Ok(Outcome::Live(json!({ "query": query, "answer": answer })))
}

/// `GET /api/ai-search?q=`
pub async fn search_get(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    let result = run_search(&state, params.q.as_deref()).await;
    respond(&state, Endpoint::AiSearch, result)
}

/// `POST /api/ai-search {query}`
pub async fn search_post(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let result = match object_body(&body) {
        Ok(body) => run_search(&state, str_field(&body, "query")).await,
        Err(e) => Err(e.into()),
    };
    respond(&state, Endpoint::AiSearch, result)
}

async fn run_anomalies(state: &AppState, body: &Bytes) -> Result<Outcome, ApiError> {
    let mut body = object_body(body)?;
    let metrics = match body.remove("metrics") {
        Some(metrics) if !metrics.is_null() => metrics,
        _ => dora_context(state, None).await,
    };
    let reply = state
        .relay
        .hosted
        .detect_anomalies(&json!({ "metrics": metrics }))
        .await?;
    let (anomalies, summary) = match reply {
        Reply::Json(Value::Object(mut map)) => (
            match map.remove("anomalies") {
                Some(Value::Array(items)) => Value::Array(items),
                _ => json!([]),
            },
            map.remove("summary").unwrap_or_else(|| Value::from("")),
        ),
        Reply::Json(Value::Array(items)) => (Value::Array(items), Value::from("")),
        Reply::Json(_) => (json!([]), Value::from("")),
        Reply::Text(text) => (json!([]), Value::from(text)),
    };
    Ok(Outcome::Live(json!({ "anomalies": anomalies, "summary": summary })))
}

/// `POST /api/anomalies {metrics?}`
pub async fn anomalies(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let result = run_anomalies(&state, &body).await;
    respond(&state, Endpoint::Anomalies, result)
}

async fn run_experts(state: &AppState, body: &Bytes) -> Result<Outcome, ApiError> {
    let body = object_body(body)?;
    required("query", str_field(&body, "query"))?;
    let reply = state.relay.hosted.find_experts(&Value::Object(body)).await?;
    Ok(Outcome::Live(json!({ "experts": reply_list(reply, "experts") })))
}

/// `POST /api/experts/find {query}`
pub async fn experts(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let result = run_experts(&state, &body).await;
    respond(&state, Endpoint::ExpertsFind, result)
}

async fn run_message(state: &AppState, body: &Bytes) -> Result<Outcome, ApiError> {
    let body = object_body(body)?;
    required("message", str_field(&body, "message"))?;
    let session_id = body.get("sessionId").cloned().unwrap_or(Value::Null);
    let response = state.relay.hosted.message(&Value::Object(body)).await?;
    Ok(Outcome::Live(json!({ "response": response, "sessionId": session_id })))
}

/// `POST /api/message {message, sessionId?}`
pub async fn message(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let result = run_message(&state, &body).await;
    respond(&state, Endpoint::Message, result)
}

fn employee_id(body: &Map<String, Value>) -> Result<i64, CoreError> {
    let invalid = || CoreError::InvalidParam {
        field: "employeeId".into(),
        reason: "expected a numeric id".into(),
    };
    match body.get("employeeId") {
        None | Some(Value::Null) => Err(CoreError::MissingField("employeeId".into())),
        Some(Value::Number(n)) => n.as_i64().ok_or_else(invalid),
        Some(Value::String(s)) => s.trim().parse().map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

async fn run_prep(state: &AppState, body: &Bytes) -> Result<Outcome, ApiError> {
    let mut body = object_body(body)?;
    let id = employee_id(&body)?;
    let employee =
        match endurance_metrics::employees::profile(&state.stores.postgres, id, AppState::today())
            .await
        {
            Ok(profile) => profile.unwrap_or(Value::Null),
            Err(error) => {
                warn!(%error, employee_id = id, "employee context unavailable");
                Value::Null
            }
        };
    body.insert("employeeId".into(), Value::from(id));
    body.insert("employee".into(), employee);
    let reply = state
        .relay
        .hosted
        .one_on_one_prep(&Value::Object(body))
        .await?;
    Ok(Outcome::Live(json!({ "prep": reply_value(reply, "prep") })))
}

/// `POST /api/prep/1on1 {employeeId}`
pub async fn prep(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let result = run_prep(&state, &body).await;
    respond(&state, Endpoint::OneOnOnePrep, result)
}

async fn run_dora_analysis(state: &AppState, body: &Bytes) -> Result<Outcome, ApiError> {
    let mut body = object_body(body)?;
    let params = WindowParams {
        project: str_field(&body, "project").map(str::to_string),
        from: str_field(&body, "from").map(str::to_string),
        to: str_field(&body, "to").map(str::to_string),
    };
    let window = params.window(state)?;
    let snapshot = dora_context(state, Some(window)).await;
    body.insert("metrics".into(), snapshot);
    let reply = state
        .relay
        .hosted
        .dora_analysis(&Value::Object(body))
        .await?;
    Ok(Outcome::Live(json!({ "analysis": reply_value(reply, "analysis") })))
}

/// `POST /api/metrics/dora {project?}`
pub async fn dora_analysis(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let result = run_dora_analysis(&state, &body).await;
    respond(&state, Endpoint::DoraAnalysis, result)
}

async fn run_weekly_report(state: &AppState, body: &Bytes) -> Result<Outcome, ApiError> {
    let body = object_body(body)?;
    let reply = state
        .relay
        .hosted
        .weekly_report(&Value::Object(body))
        .await?;
    Ok(Outcome::Live(json!({ "report": reply_value(reply, "report") })))
}

/// `POST /api/reports/weekly`
pub async fn weekly_report(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let result = run_weekly_report(&state, &body).await;
    respond(&state, Endpoint::WeeklyReport, result)
}

/// `GET /api/reports/risks`
pub async fn risks(State(state): State<Arc<AppState>>) -> Response {
    let result = match state.relay.hosted.risks().await {
        Ok(reply) => Ok(Outcome::Live(json!({ "risks": reply_list(reply, "risks") }))),
        Err(e) => Err(e.into()),
    };
    respond(&state, Endpoint::RiskReport, result)
}

async fn run_recommendations(state: &AppState) -> Result<Outcome, ApiError> {
    let (dora, sprints) = tokio::join!(dora_context(state, None), sprint_context(state));
    let prompt = format!("DORA metrics: {dora}\nSprint velocity: {sprints}");
    let answer = state
        .relay
        .featherless
        .chat(RECOMMENDATIONS_PROMPT, &prompt)
        .await?;
    let items = recommendation_items(&answer);
    if items.is_empty() {
        return Ok(Outcome::Empty);
    }
    Ok(Outcome::Live(json!({ "recommendations": items })))
}

/// `GET /api/ai-recommendations`
pub async fn recommendations(State(state): State<Arc<AppState>>) -> Response {
    let result = run_recommendations(&state).await;
    respond(&state, Endpoint::AiRecommendations, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_body_is_empty_object() {
        assert_eq!(object_body(&Bytes::from_static(b"")).unwrap(), Map::new());
        assert_eq!(object_body(&Bytes::from_static(b"  \n")).unwrap(), Map::new());
        assert!(object_body(&Bytes::from_static(b"[1]")).is_err());
        assert!(object_body(&Bytes::from_static(b"{oops")).is_err());
    }

    #[test]
    fn employee_id_accepts_numbers_and_numeric_strings() {
        let body = |v: Value| v.as_object().cloned().unwrap();
        assert_eq!(employee_id(&body(json!({"employeeId": 7}))).unwrap(), 7);
        assert_eq!(employee_id(&body(json!({"employeeId": " 12 "}))).unwrap(), 12);
        assert!(matches!(
            employee_id(&body(json!({}))),
            Err(CoreError::MissingField(_))
        ));
        assert!(matches!(
            employee_id(&body(json!({"employeeId": "abc"}))),
            Err(CoreError::InvalidParam { .. })
        ));
    }

    #[test]
    fn list_replies() {
        assert_eq!(reply_list(Reply::Json(json!([1, 2])), "risks"), json!([1, 2]));
        assert_eq!(
            reply_list(Reply::Json(json!({"risks": ["scope creep"]})), "risks"),
            json!(["scope creep"])
        );
        assert_eq!(
            reply_list(Reply::Text("No major risks.".into()), "risks"),
            json!(["No major risks."])
        );
        assert_eq!(reply_list(Reply::Text(String::new()), "risks"), json!([]));
    }

    #[test]
    fn value_replies() {
        assert_eq!(
            reply_value(Reply::Json(json!({"prep": {"topics": []}})), "prep"),
            json!({"topics": []})
        );
        assert_eq!(
            reply_value(Reply::Json(json!({"summary": "ok"})), "report"),
            json!({"summary": "ok"})
        );
        assert_eq!(reply_value(Reply::Text("notes".into()), "prep"), json!("notes"));
    }

    #[test]
    fn recommendations_from_json_or_lines() {
        assert_eq!(
            recommendation_items("Sure:\n[\"Ship smaller\", {\"text\": \"Pair more\"}]"),
            vec![json!("Ship smaller"), json!("Pair more")]
        );
        assert_eq!(
            recommendation_items("1. Ship smaller\n\n- Pair more\n"),
            vec![json!("Ship smaller"), json!("Pair more")]
        );
    }
}
