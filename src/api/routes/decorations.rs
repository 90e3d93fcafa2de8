//! Decoration Routes
//!
//! - GET /api/v1/decorations/:scene?format=json|html

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{DecorationParams, DecorationsResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::decorations::{render_html, Scene};

/// GET /api/v1/decorations/:scene
pub async fn get_decorations(
    State(state): State<Arc<AppState>>,
    Path(scene): Path<String>,
    Query(params): Query<DecorationParams>,
) -> ApiResult<Response> {
    let scene: Scene = scene.parse().map_err(ApiError::BadRequest)?;
    let decorations = state.app.decorate(scene);

    match params.format.as_deref().unwrap_or("json") {
        "json" => Ok(Json(DecorationsResponse {
            scene,
            count: decorations.len(),
            decorations,
        })
        .into_response()),
        "html" => Ok(Html(render_html(&decorations)).into_response()),
        other => Err(ApiError::BadRequest(format!("Unknown format: {}", other))),
    }
}
