//! Liveness and backend health.

use std::sync::Arc;

use ai_llm_service::HealthStatus;
use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: String,
}

/// Handler: GET /api/health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: state.service_name.clone(),
    })
}

/// Handler: GET /api/health/backends
///
/// Probes the chat and embedding profiles; never fails, unreachable
/// backends are reported with `ok: false`.
pub async fn health_backends(State(state): State<Arc<AppState>>) -> Json<Vec<HealthStatus>> {
    match &state.llm {
        Some(llm) => Json(llm.health_all().await),
        None => Json(Vec::new()),
    }
}
