//! RSVP Routes
//!
//! - POST /api/v1/rsvp - Submit an RSVP form

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::RsvpResponse;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::decorations::Scene;
use crate::rsvp::RsvpForm;

/// POST /api/v1/rsvp
///
/// 201 once the form is valid, including when the remote save failed; the
/// confirmation then carries the degraded warning. 400 on validation
/// failure with nothing persisted.
pub async fn submit_rsvp(
    State(state): State<Arc<AppState>>,
    Json(form): Json<RsvpForm>,
) -> ApiResult<(StatusCode, Json<RsvpResponse>)> {
    let result = state.app.rsvp().submit(&form).await?;
    let confirmation = result.view();

    Ok((
        StatusCode::CREATED,
        Json(RsvpResponse {
            confirmation,
            result,
            celebration: state.app.decorate(Scene::Celebration),
        }),
    ))
}
