//! Form validation
//!
//! Every check runs before anything is persisted or sent over the network.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use super::model::{Attendance, RsvpForm};

/// User-facing validation failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all required fields (Name, Phone, Number of Guests, and Attendance).")]
    MissingFields { fields: Vec<&'static str> },

    #[error("Please enter a valid phone number (at least 10 digits).")]
    InvalidPhone,

    #[error("Please enter a valid email address or leave it empty.")]
    InvalidEmail,

    #[error("Please enter the number of guests as a whole number of at least 1.")]
    InvalidGuestCount,

    #[error("Please choose whether you will attend.")]
    InvalidAttendance,
}

/// Form fields after every check passed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub guests: u32,
    pub attendance: Attendance,
    pub message: String,
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9+\-()]{10,}$").expect("valid phone regex"))
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

/// Phone numbers: digits, `+`, `-` and parentheses, at least 10 of them
/// once whitespace is removed.
pub fn is_valid_phone(phone: &str) -> bool {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    phone_pattern().is_match(&compact)
}

/// Simple `local@domain.tld` shape
pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

/// Validate a raw form
pub fn validate(form: &RsvpForm) -> Result<ValidatedForm, ValidationError> {
    let name = form.name.trim();
    let phone = form.phone.trim();
    let email = form.email.trim();
    let guests = form.guests.trim();
    let attendance = form
        .attendance
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty());
    let message = form.message.trim();

    let mut missing = Vec::new();
    if name.is_empty() {
        missing.push("name");
    }
    if phone.is_empty() {
        missing.push("phone");
    }
    if guests.is_empty() {
        missing.push("guests");
    }
    if attendance.is_none() {
        missing.push("attendance");
    }
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields { fields: missing });
    }

    if !is_valid_phone(phone) {
        return Err(ValidationError::InvalidPhone);
    }

    if !email.is_empty() && !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }

    let guests: u32 = guests
        .parse()
        .ok()
        .filter(|n| *n >= 1)
        .ok_or(ValidationError::InvalidGuestCount)?;

    let attendance: Attendance = attendance
        .unwrap_or_default()
        .parse()
        .map_err(|_| ValidationError::InvalidAttendance)?;

    Ok(ValidatedForm {
        name: name.to_string(),
        phone: phone.to_string(),
        email: email.to_string(),
        guests,
        attendance,
        message: message.to_string(),
    })
}
