//! RSVP submission
//!
//! Validate, save remotely, mirror locally, confirm.

use chrono::Utc;
use std::sync::Arc;

use super::model::{ConfirmationResult, RsvpForm, RsvpRecord};
use super::validation::{validate, ValidationError};
use crate::local::LocalMirror;
use crate::store::{ConnectionStatus, RemoteStore, SaveOutcome};

/// Handles RSVP form submissions
pub struct RsvpController {
    store: RemoteStore,
    mirror: Arc<LocalMirror>,
    event_label: String,
}

impl RsvpController {
    pub fn new(store: RemoteStore, mirror: Arc<LocalMirror>, event_label: impl Into<String>) -> Self {
        Self {
            store,
            mirror,
            event_label: event_label.into(),
        }
    }

    pub fn event_label(&self) -> &str {
        &self.event_label
    }

    /// Status shown above the form
    pub fn connection_status(&self) -> ConnectionStatus {
        self.store.status()
    }

    /// Submit a form.
    ///
    /// Validation failures return early with nothing persisted. Once the
    /// form is valid the record is always appended to the local mirror,
    /// whether or not the remote save succeeded.
    pub async fn submit(&self, form: &RsvpForm) -> Result<ConfirmationResult, ValidationError> {
        let valid = validate(form)?;

        let record = RsvpRecord {
            guest_name: valid.name,
            phone: valid.phone,
            email: valid.email,
            number_of_guests: valid.guests,
            attendance: valid.attendance,
            message: valid.message,
            timestamp: Utc::now(),
            event_label: self.event_label.clone(),
        };

        let outcome = self.store.save(&record).await;

        if let Err(e) = self.mirror.append(&record) {
            tracing::warn!(error = %e, guest = %record.guest_name, "Failed to mirror RSVP locally");
        }

        let (remote_succeeded, doc_id, remote_error) = match outcome {
            SaveOutcome::Saved { doc_id } => (true, Some(doc_id), None),
            SaveOutcome::Failed { error } => {
                tracing::warn!(guest = %record.guest_name, error = %error, "RSVP saved locally only");
                (false, None, Some(error))
            }
        };

        Ok(ConfirmationResult {
            record,
            remote_succeeded,
            remote_error,
            doc_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::DEFAULT_KEY;
    use crate::rsvp::model::DEGRADED_NOTICE;
    use crate::store::{FetchOutcome, MemoryStore, DEFAULT_COLLECTION};
    use tempfile::{tempdir, TempDir};

    fn form(name: &str, phone: &str) -> RsvpForm {
        RsvpForm {
            name: name.to_string(),
            phone: phone.to_string(),
            email: String::new(),
            guests: "3".to_string(),
            attendance: Some("yes".to_string()),
            message: "Can't wait!".to_string(),
        }
    }

    fn setup(backend: Option<Arc<MemoryStore>>) -> (RsvpController, Arc<LocalMirror>, TempDir) {
        let dir = tempdir().unwrap();
        let mirror = Arc::new(LocalMirror::open(dir.path(), DEFAULT_KEY).unwrap());
        let store = match backend {
            Some(backend) => RemoteStore::new(backend, DEFAULT_COLLECTION),
            None => RemoteStore::disconnected(),
        };
        let controller = RsvpController::new(store, Arc::clone(&mirror), "Birthday");
        (controller, mirror, dir)
    }

    #[tokio::test]
    async fn test_valid_submission_saves_everywhere() {
        let backend = Arc::new(MemoryStore::new());
        let (controller, mirror, _dir) = setup(Some(Arc::clone(&backend)));

        let result = controller.submit(&form("Ada", "0821234567")).await.unwrap();
        assert!(result.remote_succeeded);
        assert!(result.doc_id.is_some());
        assert_eq!(result.record.number_of_guests, 3);
        assert_eq!(result.record.event_label, "Birthday");
        assert_eq!(mirror.len(), 1);
        assert!(result.view().warning.is_none());
    }

    #[tokio::test]
    async fn test_invalid_phone_makes_no_call() {
        let backend = Arc::new(MemoryStore::new());
        let (controller, mirror, _dir) = setup(Some(Arc::clone(&backend)));

        let err = controller.submit(&form("Ada", "123")).await.unwrap_err();
        assert_eq!(err, ValidationError::InvalidPhone);
        assert_eq!(backend.call_count(), 0);
        assert!(mirror.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_remote_still_mirrors() {
        let backend = Arc::new(MemoryStore::new());
        backend.set_offline(true);
        let (controller, mirror, _dir) = setup(Some(Arc::clone(&backend)));

        let result = controller.submit(&form("Ada", "0821234567")).await.unwrap();
        assert!(!result.remote_succeeded);
        assert!(result.remote_error.is_some());
        assert_eq!(mirror.load()[0].guest_name, "Ada");
        assert_eq!(result.view().warning.as_deref(), Some(DEGRADED_NOTICE));
    }

    #[tokio::test]
    async fn test_disconnected_store_still_mirrors() {
        let (controller, mirror, _dir) = setup(None);
        assert_eq!(controller.connection_status(), ConnectionStatus::LocalOnly);

        let result = controller.submit(&form("Ada", "0821234567")).await.unwrap();
        assert_eq!(result.remote_error.as_deref(), Some("Database not connected"));
        assert_eq!(mirror.len(), 1);
    }

    #[tokio::test]
    async fn test_same_name_different_phone_are_distinct() {
        let backend = Arc::new(MemoryStore::new());
        let (controller, mirror, _dir) = setup(Some(Arc::clone(&backend)));

        controller.submit(&form("Ada", "0821234567")).await.unwrap();
        controller.submit(&form("Ada", "0839876543")).await.unwrap();

        assert_eq!(mirror.len(), 2);
        let remote = RemoteStore::new(backend, DEFAULT_COLLECTION);
        match remote.fetch_all().await {
            FetchOutcome::Fetched { entries, stats } => {
                assert_eq!(stats.total, 2);
                let mut phones: Vec<_> = entries.iter().map(|e| e.phone.as_str()).collect();
                phones.sort();
                assert_eq!(phones, vec!["0821234567", "0839876543"]);
            }
            FetchOutcome::Failed { error } => panic!("fetch failed: {}", error),
        }
    }
}
