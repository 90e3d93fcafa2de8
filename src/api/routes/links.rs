//! Link Routes
//!
//! - POST /api/v1/links - Generate a guest link
//! - GET /api/v1/links/decode?url= - Read the guest out of a link

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{CreateLinkRequest, UrlParams};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::link::{GuestLink, InviteLink};

/// POST /api/v1/links
pub async fn create_link(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateLinkRequest>,
) -> ApiResult<(StatusCode, Json<InviteLink>)> {
    let link = state.app.codec().encode(&req.name)?;
    tracing::info!(guest = %link.guest.name, id = link.guest.id, "Generated guest link");
    Ok((StatusCode::CREATED, Json(link)))
}

/// GET /api/v1/links/decode
///
/// Strict decode: a missing or damaged fragment is a 400.
pub async fn decode_link(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UrlParams>,
) -> ApiResult<Json<GuestLink>> {
    Ok(Json(state.app.codec().try_decode(&params.url)?))
}
