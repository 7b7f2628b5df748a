// src/api.rs
//! Thin HTTP command surface: start/stop the run state, fire a manual
//! check, and inspect status. Decision logic lives in the pipeline; these
//! handlers only translate commands.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::pipeline::CycleReport;
use crate::scheduler::{RunState, SentinelScheduler};

#[derive(Clone)]
pub struct AppState {
    pub scheduler: Arc<SentinelScheduler>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/status", get(status))
        .route("/start", post(start))
        .route("/stop", post(stop))
        .route("/check", post(check))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
struct StatusOut {
    state: RunState,
    interval_secs: u64,
}

async fn status(State(state): State<AppState>) -> Json<StatusOut> {
    Json(StatusOut {
        state: state.scheduler.state(),
        interval_secs: state.scheduler.interval().as_secs(),
    })
}

async fn start(State(state): State<AppState>) -> &'static str {
    if state.scheduler.start() {
        "started"
    } else {
        "already running"
    }
}

async fn stop(State(state): State<AppState>) -> &'static str {
    if state.scheduler.stop() {
        "stopped"
    } else {
        "already stopped"
    }
}

#[derive(serde::Serialize)]
struct CheckOut {
    ok: bool,
    summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<CycleReport>,
}

/// Manual trigger: runs one cycle regardless of run state and reports a
/// human-readable summary. Any internal failure surfaces as a generic note,
/// never as raw error text.
async fn check(State(state): State<AppState>) -> Json<CheckOut> {
    let scheduler = state.scheduler.clone();
    match tokio::spawn(async move { scheduler.run_now().await }).await {
        Ok(report) => Json(CheckOut {
            ok: true,
            summary: report.summary(),
            report: Some(report),
        }),
        Err(_) => Json(CheckOut {
            ok: false,
            summary: "check failed".to_string(),
            report: None,
        }),
    }
}
