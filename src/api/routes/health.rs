//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (ready to serve traffic)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;
use crate::store::ConnectionStatus;

/// GET /health/live
///
/// Kubernetes liveness probe.
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Ready as long as RSVPs can be kept somewhere: a missing remote store
/// only degrades the service.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if check_local_health(&state) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health
///
/// Full health status with component details.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let local_ok = check_local_health(&state);
    let connected = state.app.status().status == ConnectionStatus::Connected;

    let status = if local_ok && connected {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        store: if connected { "connected" } else { "local_only" }.to_string(),
        local: if local_ok { "ok" } else { "error" }.to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// The mirror's directory must still exist for appends to succeed
fn check_local_health(state: &AppState) -> bool {
    state
        .app
        .mirror()
        .path()
        .parent()
        .map_or(false, |dir| dir.is_dir())
}
