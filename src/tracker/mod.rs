//! RSVP Tracker
//!
//! The host's dashboard: attendance totals, a table of every RSVP (newest
//! first), CSV export of what is loaded, and clearing of the local mirror.

mod dashboard;
mod export;
mod rows;

pub use dashboard::{
    ClearOutcome, TrackerDashboard, TrackerError, TrackerSnapshot, TrackerView, CLEAR_PROMPT,
    EMPTY_NOTICE, ERROR_ADVICE,
};
pub use export::{export_filename, to_csv, CsvExport, CSV_HEADER};
pub use rows::{format_submitted, sort_newest_first, MessagePreview, TrackerRow, MESSAGE_PREVIEW_CHARS};
