//! RSVP types
//!
//! Raw form input, the validated record, and the confirmation returned to
//! the guest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Guest's answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attendance {
    Yes,
    No,
}

impl Attendance {
    pub fn is_attending(&self) -> bool {
        matches!(self, Attendance::Yes)
    }

    /// Wording used on the confirmation
    pub fn confirmation_label(&self) -> &'static str {
        match self {
            Attendance::Yes => "Confirmed",
            Attendance::No => "Cannot attend",
        }
    }
}

impl std::str::FromStr for Attendance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" => Ok(Attendance::Yes),
            "no" => Ok(Attendance::No),
            other => Err(format!("Unknown attendance: {}", other)),
        }
    }
}

/// RSVP form fields exactly as the guest entered them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RsvpForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    /// Number of guests, as typed or selected
    #[serde(default)]
    pub guests: String,
    /// `yes` / `no`, absent when no option was selected
    #[serde(default)]
    pub attendance: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// One submitted RSVP. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpRecord {
    pub guest_name: String,
    pub phone: String,
    /// Empty when not provided
    #[serde(default)]
    pub email: String,
    pub number_of_guests: u32,
    pub attendance: Attendance,
    /// Empty when not provided
    #[serde(default)]
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "event")]
    pub event_label: String,
}

/// Result of a submission that passed validation
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmationResult {
    pub record: RsvpRecord,
    pub remote_succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
}

impl ConfirmationResult {
    /// What the guest sees after submitting
    pub fn view(&self) -> ConfirmationView {
        ConfirmationView::from_result(self)
    }
}

/// Rendered confirmation panel
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmationView {
    pub heading: String,
    pub details: Vec<String>,
    pub saved_remotely: bool,
    /// Shown when the record could not reach the remote store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

pub const DEGRADED_NOTICE: &str = "⚠ Please contact hosts directly to confirm your attendance";

impl ConfirmationView {
    fn from_result(result: &ConfirmationResult) -> Self {
        let record = &result.record;
        let people = if record.number_of_guests == 1 { "person" } else { "people" };

        let mut details = vec![
            format!("Name: {}", record.guest_name),
            format!("Phone: {}", record.phone),
            format!("Guests: {} {}", record.number_of_guests, people),
            format!("Attendance: {}", record.attendance.confirmation_label()),
        ];

        let warning = if result.remote_succeeded {
            details.push("Saved to database: ✓".to_string());
            None
        } else {
            Some(DEGRADED_NOTICE.to_string())
        };

        Self {
            heading: "Confirmation Details:".to_string(),
            details,
            saved_remotely: result.remote_succeeded,
            warning,
        }
    }
}
