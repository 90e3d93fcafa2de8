//! Soiree REST API
//!
//! HTTP API layer, built with Axum.
//!
//! # Endpoints
//!
//! ## Links
//! - `POST /api/v1/links` - Generate a guest link
//! - `GET /api/v1/links/decode?url=` - Decode a guest link
//! - `GET /api/v1/view?url=` - Route a page load to its view
//!
//! ## RSVP
//! - `GET /api/v1/status` - Remote store connection status
//! - `POST /api/v1/rsvp` - Submit an RSVP
//!
//! ## Tracker
//! - `GET /api/v1/tracker` - Open the dashboard
//! - `POST /api/v1/tracker/refresh` - Reload the dashboard
//! - `GET /api/v1/tracker/export` - Download the loaded RSVPs as CSV
//! - `GET /api/v1/local` - Locally mirrored RSVPs
//! - `DELETE /api/v1/local?confirm=true` - Clear the local mirror
//!
//! ## Page
//! - `GET /api/v1/decorations/:scene` - Randomized decorations
//! - `POST /api/v1/actions` - Dispatch a UI action
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use soiree::{api, App, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_default();
//!     let app = App::from_config(&config)?;
//!     api::serve(api::AppState::new(app, config)).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Link routes
        .route("/links", post(routes::links::create_link))
        .route("/links/decode", get(routes::links::decode_link))
        .route("/view", get(routes::view::resolve_view))
        // RSVP routes
        .route("/status", get(routes::status::connection_status))
        .route("/rsvp", post(routes::rsvp::submit_rsvp))
        // Tracker routes
        .route("/tracker", get(routes::tracker::open_tracker))
        .route("/tracker/refresh", post(routes::tracker::refresh_tracker))
        .route("/tracker/export", get(routes::tracker::export_csv))
        .route(
            "/local",
            get(routes::local::list_local).delete(routes::local::clear_local),
        )
        // Page routes
        .route("/decorations/:scene", get(routes::decorations::get_decorations))
        .route("/actions", post(routes::actions::dispatch_action));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.server.cors_origins);

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Permissive when no origins are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server
pub async fn serve(state: AppState) -> Result<(), ApiError> {
    let addr = state.addr();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Soiree API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Soiree API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
