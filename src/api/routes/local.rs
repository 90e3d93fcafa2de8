//! Local Mirror Routes
//!
//! - GET /api/v1/local - Records in the local mirror
//! - DELETE /api/v1/local?confirm=true - Empty the local mirror

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{ClearParams, LocalRecordsResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::tracker::ClearOutcome;

/// GET /api/v1/local
pub async fn list_local(State(state): State<Arc<AppState>>) -> Json<LocalRecordsResponse> {
    let records = state.app.tracker().local_records();
    Json(LocalRecordsResponse {
        key: state.app.mirror().key().to_string(),
        count: records.len(),
        records,
    })
}

/// DELETE /api/v1/local
///
/// Without `confirm=true` nothing is removed and the prompt is returned.
pub async fn clear_local(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ClearParams>,
) -> ApiResult<Json<ClearOutcome>> {
    Ok(Json(state.app.tracker().clear_local(params.confirm)?))
}
