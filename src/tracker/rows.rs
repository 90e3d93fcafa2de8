//! Table rows
//!
//! Display strings for each RSVP entry in the host's tracker table.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::store::RsvpEntry;

/// Messages longer than this are shortened in the table
pub const MESSAGE_PREVIEW_CHARS: usize = 50;

/// Shown in place of a missing submission time
pub const DATE_NOT_SET: &str = "Not set";

/// Message cell of a row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessagePreview {
    /// Text shown in the cell
    pub preview: String,
    /// The whole message when the preview was shortened
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full: Option<String>,
    pub truncated: bool,
}

impl MessagePreview {
    pub fn new(message: &str) -> Self {
        let message = message.trim();
        if message.is_empty() {
            return Self {
                preview: "No message".to_string(),
                full: None,
                truncated: false,
            };
        }

        if message.chars().count() > MESSAGE_PREVIEW_CHARS {
            let short: String = message.chars().take(MESSAGE_PREVIEW_CHARS).collect();
            Self {
                preview: format!("{}...", short),
                full: Some(message.to_string()),
                truncated: true,
            }
        } else {
            Self {
                preview: message.to_string(),
                full: None,
                truncated: false,
            }
        }
    }
}

/// One rendered tracker row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackerRow {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub guests: u32,
    pub attending: bool,
    pub status: String,
    pub date_submitted: String,
    pub message: MessagePreview,
}

impl TrackerRow {
    pub fn from_entry(entry: &RsvpEntry) -> Self {
        Self {
            id: entry.id.clone(),
            name: or_placeholder(&entry.full_names, "No name"),
            phone: or_placeholder(&entry.phone, "Not provided"),
            email: or_placeholder(&entry.email, "Not provided"),
            guests: entry.num_guests,
            attending: entry.will_attend,
            status: status_label(entry.will_attend).to_string(),
            date_submitted: format_submitted(entry.submitted_at),
            message: MessagePreview::new(&entry.message),
        }
    }
}

pub(crate) fn status_label(attending: bool) -> &'static str {
    if attending {
        "Attending"
    } else {
        "Not Attending"
    }
}

/// `26 Dec 2026, 18:30` (UTC), or "Not set"
pub fn format_submitted(submitted_at: Option<DateTime<Utc>>) -> String {
    submitted_at
        .map(|dt| dt.format("%-d %b %Y, %H:%M").to_string())
        .unwrap_or_else(|| DATE_NOT_SET.to_string())
}

/// Newest first; entries without a submission time sort as earliest
pub fn sort_newest_first(entries: &mut [RsvpEntry]) {
    entries.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}
