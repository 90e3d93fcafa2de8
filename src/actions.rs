//! Action dispatch
//!
//! Every user interaction with the pages is one [`Action`]. [`App::dispatch`]
//! runs its handler and returns a typed [`Outcome`]; recoverable failures
//! come back as [`ActionError`] values.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app::{App, StatusReport};
use crate::decorations::{Decoration, Scene};
use crate::link::{InviteLink, LinkError};
use crate::router::PageRoute;
use crate::rsvp::{ConfirmationResult, ConfirmationView, RsvpForm, RsvpRecord, ValidationError};
use crate::tracker::{ClearOutcome, CsvExport, TrackerError, TrackerView};

/// A user interaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Host creates a link for a guest
    GenerateLink { name: String },
    /// A page is loaded at `url`
    OpenPage { url: String },
    /// Guest submits the RSVP form
    SubmitRsvp { form: RsvpForm },
    ConnectionStatus,
    OpenTracker,
    RefreshTracker,
    ExportCsv,
    /// Host clears the local mirror; ignored until confirmed
    ClearLocal {
        #[serde(default)]
        confirmed: bool,
    },
    LocalRecords,
    Decorate { scene: Scene },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::GenerateLink { .. } => "generate_link",
            Action::OpenPage { .. } => "open_page",
            Action::SubmitRsvp { .. } => "submit_rsvp",
            Action::ConnectionStatus => "connection_status",
            Action::OpenTracker => "open_tracker",
            Action::RefreshTracker => "refresh_tracker",
            Action::ExportCsv => "export_csv",
            Action::ClearLocal { .. } => "clear_local",
            Action::LocalRecords => "local_records",
            Action::Decorate { .. } => "decorate",
        }
    }
}

/// Result of a dispatched action
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", content = "data", rename_all = "snake_case")]
pub enum Outcome {
    Link(InviteLink),
    Page(PageRoute),
    Rsvp {
        result: ConfirmationResult,
        confirmation: ConfirmationView,
        celebration: Vec<Decoration>,
    },
    Status(StatusReport),
    Tracker(TrackerView),
    Export(CsvExport),
    Clear(ClearOutcome),
    LocalRecords(Vec<RsvpRecord>),
    Decorations(Vec<Decoration>),
}

/// Recoverable action failures, shown to the user as messages
#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Link(#[from] LinkError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

impl App {
    /// Run one action to completion
    pub async fn dispatch(&self, action: Action) -> Result<Outcome, ActionError> {
        tracing::debug!(action = action.name(), "Dispatching action");

        let outcome = match action {
            Action::GenerateLink { name } => {
                let link = self.codec().encode(&name)?;
                tracing::info!(guest = %link.guest.name, "Generated guest link");
                Outcome::Link(link)
            }
            Action::OpenPage { url } => Outcome::Page(self.open_page(&url)),
            Action::SubmitRsvp { form } => {
                let result = self.rsvp().submit(&form).await?;
                let confirmation = result.view();
                Outcome::Rsvp {
                    result,
                    confirmation,
                    celebration: self.decorate(Scene::Celebration),
                }
            }
            Action::ConnectionStatus => Outcome::Status(self.status()),
            Action::OpenTracker => Outcome::Tracker(self.tracker().open().await),
            Action::RefreshTracker => Outcome::Tracker(self.tracker().refresh().await),
            Action::ExportCsv => Outcome::Export(self.tracker().export_csv().await?),
            Action::ClearLocal { confirmed } => {
                Outcome::Clear(self.tracker().clear_local(confirmed)?)
            }
            Action::LocalRecords => Outcome::LocalRecords(self.tracker().local_records()),
            Action::Decorate { scene } => Outcome::Decorations(self.decorate(scene)),
        };

        Ok(outcome)
    }
}
