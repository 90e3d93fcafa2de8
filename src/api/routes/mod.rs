//! API Routes
//!
//! Route handlers organized by functionality.

pub mod actions;
pub mod decorations;
pub mod health;
pub mod links;
pub mod local;
pub mod rsvp;
pub mod status;
pub mod tracker;
pub mod view;
