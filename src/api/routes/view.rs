//! View Routes
//!
//! - GET /api/v1/view?url= - Which view a page load at `url` shows

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::UrlParams;
use crate::api::state::AppState;
use crate::router::PageRoute;

/// GET /api/v1/view
///
/// Never fails: damaged links fall back to the generator view with a notice.
pub async fn resolve_view(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UrlParams>,
) -> Json<PageRoute> {
    Json(state.app.open_page(&params.url))
}
