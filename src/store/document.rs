//! RSVP document shape
//!
//! Maps [`RsvpRecord`]s onto the remote collection's schema and reads
//! documents back leniently: the collection is also written by other
//! clients, so missing or mistyped fields fall back to defaults instead of
//! failing the whole fetch.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::{parse_timestamp, NewDocument, StoredDocument};
use crate::rsvp::RsvpRecord;

pub(crate) const FULL_NAMES: &str = "Fullnames";
pub(crate) const PHONE_NUMBER: &str = "PhoneNumber";
pub(crate) const EMAIL: &str = "Email";
pub(crate) const NUM_GUEST: &str = "NumGuest";
pub(crate) const WILL_ATTEND: &str = "WillAttend";
pub(crate) const MESSAGE: &str = "Message";
pub(crate) const DATA_SUBMITTED: &str = "DataSubmitted";

/// Build the remote document for a record. `DataSubmitted` is left to the
/// server clock.
pub(crate) fn to_document(record: &RsvpRecord) -> NewDocument {
    let mut fields = Map::new();
    fields.insert(FULL_NAMES.into(), Value::from(record.guest_name.clone()));
    fields.insert(PHONE_NUMBER.into(), Value::from(record.phone.clone()));
    fields.insert(EMAIL.into(), Value::from(record.email.clone()));
    fields.insert(
        NUM_GUEST.into(),
        Value::from(coerce_guest_count(&Value::from(record.number_of_guests))),
    );
    fields.insert(WILL_ATTEND.into(), Value::from(record.attendance.is_attending()));
    fields.insert(MESSAGE.into(), Value::from(record.message.clone()));

    NewDocument::new(fields).server_timestamp(DATA_SUBMITTED)
}

/// Guest count from whatever the document holds. Integers, floats and
/// numeric-prefixed strings (`"3"`, `"3 adults"`) are accepted; anything
/// absent, unparsable or below 1 counts as 1.
pub fn coerce_guest_count(value: &Value) -> u32 {
    let parsed = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => leading_integer(s),
        _ => None,
    };

    match parsed {
        Some(n) if n >= 1 => u32::try_from(n).unwrap_or(u32::MAX),
        _ => 1,
    }
}

fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    let n: i64 = digits.parse().unwrap_or(i64::MAX);
    Some(if negative { -n } else { n })
}

/// One RSVP as stored remotely
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpEntry {
    pub id: String,
    pub full_names: String,
    pub phone: String,
    pub email: String,
    pub num_guests: u32,
    pub will_attend: bool,
    pub message: String,
    /// Server submission time, when the document has one
    pub submitted_at: Option<DateTime<Utc>>,
}

impl RsvpEntry {
    pub(crate) fn from_stored(doc: &StoredDocument) -> Self {
        let text = |field: &str| {
            doc.fields
                .get(field)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            id: doc.id.clone(),
            full_names: text(FULL_NAMES),
            phone: text(PHONE_NUMBER),
            email: text(EMAIL),
            num_guests: coerce_guest_count(doc.fields.get(NUM_GUEST).unwrap_or(&Value::Null)),
            will_attend: matches!(doc.fields.get(WILL_ATTEND), Some(Value::Bool(true))),
            message: text(MESSAGE),
            submitted_at: doc.fields.get(DATA_SUBMITTED).and_then(parse_timestamp),
        }
    }
}
