//! Tracker Routes
//!
//! - GET /api/v1/tracker - Open the dashboard (loads current data)
//! - POST /api/v1/tracker/refresh - Reload
//! - GET /api/v1/tracker/export - CSV of the loaded snapshot

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::tracker::TrackerView;

/// GET /api/v1/tracker
pub async fn open_tracker(State(state): State<Arc<AppState>>) -> Json<TrackerView> {
    Json(state.app.tracker().open().await)
}

/// POST /api/v1/tracker/refresh
pub async fn refresh_tracker(State(state): State<Arc<AppState>>) -> Json<TrackerView> {
    Json(state.app.tracker().refresh().await)
}

/// GET /api/v1/tracker/export
///
/// Exports whatever the dashboard last loaded; 404 when nothing is loaded.
pub async fn export_csv(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let export = state.app.tracker().export_csv().await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        Body::from(export.content),
    )
        .into_response())
}
