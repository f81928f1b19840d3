//! Relay behavior against in-process fake AI services.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use endurance_config::{FeatherlessConfig, HostedServicesConfig};
use endurance_relay::{FeatherlessClient, HostedServices, RelayClient, RelayError, Reply, RetryPolicy};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn fast_client() -> RelayClient {
    let policy = RetryPolicy {
        max_retries: 3,
        base_delay: Duration::from_millis(5),
    };
    RelayClient::with_policy(policy, Duration::from_secs(5)).unwrap()
}

/// Answers 429 for the first `limited` hits, then 200.
#[derive(Clone)]
struct Limiter {
    hits: Arc<AtomicU32>,
    limited: u32,
}

async fn limited(State(state): State<Limiter>) -> impl IntoResponse {
    let hit = state.hits.fetch_add(1, Ordering::SeqCst) + 1;
    if hit <= state.limited {
        (StatusCode::TOO_MANY_REQUESTS, "slow down".to_string())
    } else {
        (StatusCode::OK, json!({"hit": hit}).to_string())
    }
}

async fn limiter(limited_hits: u32) -> (String, Arc<AtomicU32>) {
    let hits = Arc::new(AtomicU32::new(0));
    let state = Limiter {
        hits: Arc::clone(&hits),
        limited: limited_hits,
    };
    let base = spawn(Router::new().route("/detect", post(limited)).with_state(state)).await;
    (format!("{base}/detect"), hits)
}

#[tokio::test]
async fn retries_429_then_succeeds() {
    let (url, hits) = limiter(2).await;
    let reply = fast_client().post_json(&url, None, &json!({})).await.unwrap();
    assert_eq!(reply, Reply::Json(json!({"hit": 3})));
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn gives_up_after_max_retries() {
    let (url, hits) = limiter(u32::MAX).await;
    let err = fast_client().post_json(&url, None, &json!({})).await.unwrap_err();
    assert!(matches!(err, RelayError::RateLimited { attempts: 4 }), "{err:?}");
    assert_eq!(hits.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn server_errors_are_not_retried() {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&hits);
    let router = Router::new().route(
        "/detect",
        post(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                (StatusCode::SERVICE_UNAVAILABLE, "model loading")
            }
        }),
    );
    let base = spawn(router).await;

    let err = fast_client()
        .post_json(&format!("{base}/detect"), None, &json!({}))
        .await
        .unwrap_err();
    match err {
        RelayError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "model loading");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn per_request_timeout() {
    let router = Router::new().route(
        "/reports/risks",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            "late"
        }),
    );
    let base = spawn(router).await;
    let client = fast_client().with_timeout(Duration::from_millis(200));

    let err = client
        .get_json(&format!("{base}/reports/risks"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, RelayError::Timeout(_)), "{err:?}");
    assert_eq!(err.to_string(), "timed out after 200ms");
}

async fn agent_message(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let first = if auth == "Bearer hf_test" { "A" } else { "?" };
    let stream = format!(
        ": open\n\ndata: {{\"response\":\"*[agent-7b]* {first}\"}}\n\n\
         data: {{\"response\":\"B\"}}\n\n\
         data: {{\"sessionId\":\"{}\"}}\n\n\
         data: [DONE]\n\n",
        body["sessionId"].as_str().unwrap_or_default()
    );
    ([("content-type", "text/event-stream")], stream)
}

async fn weekly_report() -> &'static str {
    "Here is the report:\n```json\n{\"highlights\": [\"Shipped search\"]}\n```"
}

#[tokio::test]
async fn hosted_services_stream_and_extract() {
    let router = Router::new()
        .route("/message", post(agent_message))
        .route("/reports/weekly", post(weekly_report));
    let base = spawn(router).await;
    let config = HostedServicesConfig {
        agents_base_url: base.clone(),
        reports_base_url: format!("{base}/"),
        token: "hf_test".into(),
        ..Default::default()
    };
    let hosted = HostedServices::new(&config, fast_client(), Duration::from_secs(5));

    let text = hosted
        .message(&json!({"message": "hi", "sessionId": "s-1"}))
        .await
        .unwrap();
    assert_eq!(text, "AB");

    let report = hosted.weekly_report(&json!({})).await.unwrap();
    assert_eq!(report, Reply::Json(json!({"highlights": ["Shipped search"]})));
}

async fn chat_completions(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some("Bearer fk-test");
    let question = body["messages"][1]["content"].as_str().unwrap_or_default();
    let content = if authorized {
        format!("*[llama]* <think>hmm</think>You asked: {question}")
    } else {
        "unauthorized".to_string()
    };
    Json(json!({
        "model": body["model"],
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    }))
}

#[tokio::test]
async fn featherless_chat_is_sanitized() {
    let base = spawn(Router::new().route("/v1/chat/completions", post(chat_completions))).await;
    let config = FeatherlessConfig {
        api_key: "fk-test".into(),
        base_url: format!("{base}/v1"),
        ..Default::default()
    };
    let client = FeatherlessClient::new(&config, fast_client());

    let answer = client.chat("You are helpful.", "deploy count?").await.unwrap();
    assert_eq!(answer, "You asked: deploy count?");
}
