//! CSV export of tracker entries

use chrono::NaiveDate;
use serde::Serialize;

use super::rows::{format_submitted, status_label};
use crate::store::RsvpEntry;

pub const CSV_HEADER: &str = "Full Name,Phone,Email,Guests,Status,Date Submitted,Message";

/// A generated CSV file
#[derive(Debug, Clone, Serialize)]
pub struct CsvExport {
    pub filename: String,
    pub rows: usize,
    pub content: String,
}

/// `<prefix>-YYYY-MM-DD.csv`
pub fn export_filename(prefix: &str, date: NaiveDate) -> String {
    format!("{}-{}.csv", prefix, date.format("%Y-%m-%d"))
}

/// Serialize entries: plain header line, then one row per entry with every
/// field quoted and embedded quotes doubled.
pub fn to_csv(entries: &[RsvpEntry]) -> Result<String, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for entry in entries {
        let guests = entry.num_guests.to_string();
        let submitted = format_submitted(entry.submitted_at);

        writer.write_record([
            entry.full_names.as_str(),
            entry.phone.as_str(),
            entry.email.as_str(),
            guests.as_str(),
            status_label(entry.will_attend),
            submitted.as_str(),
            entry.message.as_str(),
        ])?;
    }

    let body = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;

    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + body.len());
    out.push_str(CSV_HEADER);
    out.push('\n');
    out.push_str(&String::from_utf8_lossy(&body));
    Ok(out)
}
