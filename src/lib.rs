//! # Soiree
//!
//! Event invitation and RSVP service. A host generates personalized guest
//! links, guests open their link to see a named invitation and RSVP, and
//! the host follows responses on a tracker dashboard with CSV export.
//!
//! ## Features
//!
//! - **Guest links**: guest identity carried in a `#guest=` URL fragment
//! - **RSVP validation**: checked before anything is persisted
//! - **Local fallback**: every accepted RSVP is mirrored to a local file, so
//!   a remote outage never loses a response
//! - **Tracker**: aggregate counts, newest-first table, CSV export
//!
//! ## Modules
//!
//! - [`link`]: guest link codec
//! - [`router`]: generator vs guest view selection
//! - [`rsvp`]: form validation and submission
//! - [`store`]: remote document store adapter (Firestore, in-memory)
//! - [`local`]: local fallback mirror
//! - [`tracker`]: host dashboard and CSV export
//! - [`decorations`]: randomized page decorations
//! - [`actions`]: UI action dispatch
//! - [`api`]: REST API server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use soiree::{Action, App, Config, Outcome, RsvpForm};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = App::from_config(&Config::from_env())?;
//!
//!     // Host: create a link for a guest
//!     if let Outcome::Link(link) = app.dispatch(Action::GenerateLink { name: "Thandi".into() }).await? {
//!         println!("Send this to Thandi: {}", link.url);
//!     }
//!
//!     // Guest: respond
//!     let form = RsvpForm {
//!         name: "Thandi Nkosi".into(),
//!         phone: "082 123 4567".into(),
//!         guests: "2".into(),
//!         attendance: Some("yes".into()),
//!         ..Default::default()
//!     };
//!     let result = app.rsvp().submit(&form).await?;
//!     println!("{}", result.view().heading);
//!
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod api;
pub mod app;
pub mod config;
pub mod decorations;
pub mod link;
pub mod local;
pub mod router;
pub mod rsvp;
pub mod store;
pub mod tracker;

pub use actions::{Action, ActionError, Outcome};

pub use app::{App, AppError, StatusReport};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{Config, ConfigError, LoggingConfig, StoreBackend};

pub use link::{GuestLink, InviteLink, LinkCodec, LinkError};

pub use router::{route, PageRoute, View};

pub use rsvp::{
    Attendance, ConfirmationResult, ConfirmationView, RsvpController, RsvpForm, RsvpRecord,
    ValidationError,
};

pub use store::{
    AggregateStats, ConnectionStatus, DocumentStore, FetchOutcome, FirestoreStore, MemoryStore,
    RemoteStore, RsvpEntry, SaveOutcome, StoreError,
};

pub use local::{LocalMirror, LocalStoreError};

pub use tracker::{CsvExport, TrackerDashboard, TrackerError, TrackerView};

pub use decorations::{Decoration, Scene};
