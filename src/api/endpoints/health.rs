//! Service banner and liveness check.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;
use crate::models::SUPPORTED_MIME_TYPES;

#[derive(Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ai_enabled: bool,
    pub supported_formats: &'static [&'static str],
}

/// `GET /`
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Structify processing service",
        version: crate::config::APP_VERSION,
        status: "running",
    })
}

/// `GET /health`: liveness probe target. Must stay cheap: no I/O.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        ai_enabled: ctx.ai_enabled,
        supported_formats: SUPPORTED_MIME_TYPES,
    })
}
