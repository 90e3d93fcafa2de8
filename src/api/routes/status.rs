//! Status Routes
//!
//! - GET /api/v1/status - Remote store connection status

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::state::AppState;
use crate::app::StatusReport;

/// GET /api/v1/status
pub async fn connection_status(State(state): State<Arc<AppState>>) -> Json<StatusReport> {
    Json(state.app.status())
}
