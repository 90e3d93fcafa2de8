//! Action Routes
//!
//! - POST /api/v1/actions - Dispatch any [`Action`]

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::actions::{Action, Outcome};
use crate::api::error::ApiResult;
use crate::api::state::AppState;

/// POST /api/v1/actions
pub async fn dispatch_action(
    State(state): State<Arc<AppState>>,
    Json(action): Json<Action>,
) -> ApiResult<Json<Outcome>> {
    Ok(Json(state.app.dispatch(action).await?))
}
