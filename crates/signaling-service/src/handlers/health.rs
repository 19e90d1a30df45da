//! Health check handler.

use crate::models::HealthResponse;
use crate::routes::AppState;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;
use tracing::instrument;

/// Health check handler.
///
/// The service has no external dependencies to probe; liveness is the
/// process being up. The resident session count is included as a cheap
/// memory-pressure signal.
#[instrument(skip_all, name = "signaling.health.check")]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        resident_sessions: state.store.session_count(),
    })
}
