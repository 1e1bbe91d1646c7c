//! Liveness and health endpoints.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub policy: &'static str,
    pub analyzer: String,
}

/// `GET /`: plain-text liveness probe.
pub async fn root() -> &'static str {
    "OK"
}

/// `GET /api/health`: service status and active gate policy.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        policy: ctx.gate.config().policy.as_str(),
        analyzer: ctx.analyzer.name().to_string(),
    })
}
