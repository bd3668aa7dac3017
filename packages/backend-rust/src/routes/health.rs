use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/live", get(live))
        .route("/ready", get(ready))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
    timestamp: String,
}

#[derive(Serialize)]
struct LiveResponse {
    status: &'static str,
}

async fn root(State(state): State<AppState>) -> Response {
    let ok = state.store().ensure_schema().await.is_ok();

    let response = HealthResponse {
        status: if ok { "ok" } else { "degraded" },
        database: if ok { "connected" } else { "disconnected" },
        timestamp: now_iso(),
    };

    let status_code = if ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(response)).into_response()
}

async fn live() -> Response {
    Json(LiveResponse { status: "ok" }).into_response()
}

// Readiness retries the schema check, so a store that came up after
// boot flips to ready without a restart.
async fn ready(State(state): State<AppState>) -> Response {
    match state.store().ensure_schema().await {
        Ok(()) => Json(LiveResponse { status: "ready" }).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "readiness schema check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(LiveResponse {
                    status: "not_ready",
                }),
            )
                .into_response()
        }
    }
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
