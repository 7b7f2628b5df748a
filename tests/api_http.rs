// tests/api_http.rs
//
// HTTP-level tests for the command surface without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET  /health
// - GET  /status (run state transitions)
// - POST /start, POST /stop
// - POST /check (manual trigger summary)

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::Request,
    Router,
};
use http::StatusCode;
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use anyhow::Result;
use async_trait::async_trait;

use market_news_sentinel::api::{create_router, AppState};
use market_news_sentinel::collect::providers::gnews::GnewsCollector;
use market_news_sentinel::collect::types::SourceCollector;
use market_news_sentinel::dedup::SeenStore;
use market_news_sentinel::judge::{MockJudge, Verdict};
use market_news_sentinel::notify::Notifier;
use market_news_sentinel::pipeline::FilterPipeline;
use market_news_sentinel::scheduler::SentinelScheduler;
use market_news_sentinel::scoring::KeywordScorer;

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

const TEST_TOML: &str = r#"
[scoring]
threshold_low = 5.0
threshold_high = 8.0

[categories.macro]
weight = 5.0
keywords = ["interest rates", "inflation"]
"#;

const GNEWS_FIXTURE: &str = r#"{
    "articles": [
        {"title": "Fed raises interest rates", "content": "inflation fears grow", "url": "https://example.test/a"}
    ]
}"#;

struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn send(&self, _message: &str) -> Result<()> {
        Ok(())
    }
    fn name(&self) -> &'static str {
        "null"
    }
}

/// Build the same Router shape the binary uses, backed by fixtures.
fn test_router() -> Router {
    let collectors: Vec<Box<dyn SourceCollector>> =
        vec![Box::new(GnewsCollector::from_fixture(GNEWS_FIXTURE))];
    let pipeline = Arc::new(FilterPipeline::new(
        collectors,
        SeenStore::default(),
        KeywordScorer::from_toml_str(TEST_TOML).expect("test keyword table"),
        Arc::new(MockJudge {
            fixed: Verdict::not_relevant(""),
        }),
        Arc::new(NullNotifier),
    ));
    let scheduler = Arc::new(SentinelScheduler::new(pipeline, Duration::from_secs(300)));
    create_router(AppState { scheduler })
}

async fn json_body(resp: axum::response::Response) -> Json {
    let bytes = to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json body")
}

#[tokio::test]
async fn health_returns_200_and_ok_body() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK, "health should be 200");

    let bytes = to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    let body = String::from_utf8(bytes).expect("utf8");
    assert_eq!(body.trim(), "OK", "health body should be 'OK'");
}

#[tokio::test]
async fn status_reports_stopped_by_default() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/status")
        .body(Body::empty())
        .expect("build GET /status");

    let resp = app.oneshot(req).await.expect("oneshot /status");
    assert!(resp.status().is_success());

    let v = json_body(resp).await;
    assert_eq!(v["state"], serde_json::json!("STOPPED"));
    assert_eq!(v["interval_secs"], serde_json::json!(300));
}

#[tokio::test]
async fn start_then_stop_flips_run_state() {
    let app = test_router();

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/start")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("oneshot /start");
    assert!(resp.status().is_success());

    let status = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("oneshot /status");
    let v = json_body(status).await;
    assert_eq!(v["state"], serde_json::json!("RUNNING"));

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/stop")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("oneshot /stop");
    assert!(resp.status().is_success());

    let status = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("oneshot /status after stop");
    let v = json_body(status).await;
    assert_eq!(v["state"], serde_json::json!("STOPPED"));
}

#[tokio::test]
async fn check_runs_a_cycle_even_while_stopped() {
    let app = test_router();

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/check")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("oneshot /check");
    assert!(resp.status().is_success());

    let v = json_body(resp).await;
    assert_eq!(v["ok"], serde_json::json!(true));
    // The fixture article matches both macro keywords: score 5, one send
    // attempted; the summary is the human-readable count line.
    assert_eq!(v["report"]["collected"], serde_json::json!(1));
    assert_eq!(v["report"]["sent"], serde_json::json!(1));
    let summary = v["summary"].as_str().expect("summary string");
    assert!(summary.contains("1 collected"), "got summary: {summary}");
}
