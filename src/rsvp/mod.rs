//! RSVP Form
//!
//! Guest-side submission flow:
//!
//! 1. [`validate`] the raw form; any failure stops here with a message
//! 2. build an [`RsvpRecord`] and save it to the remote store
//! 3. append it to the local mirror, regardless of the remote outcome
//! 4. return a [`ConfirmationResult`] whose view reflects whether the
//!    remote save succeeded

mod controller;
mod model;
mod validation;

pub use controller::RsvpController;
pub use model::{
    Attendance, ConfirmationResult, ConfirmationView, RsvpForm, RsvpRecord, DEGRADED_NOTICE,
};
pub use validation::{is_valid_email, is_valid_phone, validate, ValidatedForm, ValidationError};
