//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

use crate::decorations::{Decoration, Scene};
use crate::rsvp::{ConfirmationResult, ConfirmationView, RsvpRecord};

// ============================================
// LINK DTOs
// ============================================

/// Link generation request
#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    /// Guest's display name
    pub name: String,
}

/// `?url=` query for decode and view
#[derive(Debug, Deserialize)]
pub struct UrlParams {
    pub url: String,
}

// ============================================
// RSVP DTOs
// ============================================

/// Accepted RSVP
#[derive(Debug, Serialize)]
pub struct RsvpResponse {
    pub confirmation: ConfirmationView,
    pub result: ConfirmationResult,
    /// Confetti for the confirmation screen
    pub celebration: Vec<Decoration>,
}

// ============================================
// LOCAL MIRROR DTOs
// ============================================

#[derive(Debug, Serialize)]
pub struct LocalRecordsResponse {
    pub key: String,
    pub count: usize,
    pub records: Vec<RsvpRecord>,
}

/// `DELETE /local` query; nothing is removed unless `confirm=true`
#[derive(Debug, Default, Deserialize)]
pub struct ClearParams {
    #[serde(default)]
    pub confirm: bool,
}

// ============================================
// DECORATION DTOs
// ============================================

#[derive(Debug, Default, Deserialize)]
pub struct DecorationParams {
    /// `json` (default) or `html`
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DecorationsResponse {
    pub scene: Scene,
    pub count: usize,
    pub decorations: Vec<Decoration>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,
    /// "connected" or "local_only"
    pub store: String,
    /// "ok" or "error"
    pub local: String,
    pub uptime_seconds: u64,
    pub version: String,
}
