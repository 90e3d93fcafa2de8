//! Tracker dashboard view-model
//!
//! Holds the last successfully fetched snapshot. Loading happens only on
//! an explicit open or refresh; export always works from the snapshot in
//! memory and never refetches.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use super::export::{export_filename, to_csv, CsvExport};
use super::rows::{sort_newest_first, TrackerRow};
use crate::local::{LocalMirror, LocalStoreError};
use crate::rsvp::RsvpRecord;
use crate::store::{AggregateStats, FetchOutcome, RemoteStore, RsvpEntry};

pub const EMPTY_NOTICE: &str = "No RSVPs yet. Invite some guests!";
pub const ERROR_ADVICE: &str = "Check your database connection and security rules.";
pub const CLEAR_PROMPT: &str =
    "Are you sure you want to clear all locally stored RSVP data? This will not affect data in the remote database.";

/// Errors from tracker operations
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("No data to export")]
    NoData,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Local storage error: {0}")]
    Local(#[from] LocalStoreError),
}

/// Entries from the last successful load
#[derive(Debug, Clone, Serialize)]
pub struct TrackerSnapshot {
    pub entries: Vec<RsvpEntry>,
    pub stats: AggregateStats,
    pub loaded_at: DateTime<Utc>,
}

/// What the dashboard shows after a load
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TrackerView {
    Loaded {
        stats: AggregateStats,
        rows: Vec<TrackerRow>,
        #[serde(skip_serializing_if = "Option::is_none")]
        empty_notice: Option<String>,
    },
    Error {
        message: String,
        advice: String,
    },
}

/// Outcome of a local clear request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ClearOutcome {
    ConfirmationRequired { prompt: String },
    Cleared { removed: usize },
}

/// Host dashboard over all submitted RSVPs
pub struct TrackerDashboard {
    store: RemoteStore,
    mirror: Arc<LocalMirror>,
    export_prefix: String,
    snapshot: RwLock<Option<TrackerSnapshot>>,
}

impl TrackerDashboard {
    pub fn new(store: RemoteStore, mirror: Arc<LocalMirror>, export_prefix: impl Into<String>) -> Self {
        Self {
            store,
            mirror,
            export_prefix: export_prefix.into(),
            snapshot: RwLock::new(None),
        }
    }

    /// Open the dashboard, loading current data
    pub async fn open(&self) -> TrackerView {
        tracing::info!("Opening RSVP tracker");
        self.load().await
    }

    /// Reload current data
    pub async fn refresh(&self) -> TrackerView {
        tracing::info!("Refreshing RSVP tracker");
        self.load().await
    }

    async fn load(&self) -> TrackerView {
        match self.store.fetch_all().await {
            FetchOutcome::Fetched { mut entries, stats } => {
                sort_newest_first(&mut entries);

                let rows: Vec<TrackerRow> = entries.iter().map(TrackerRow::from_entry).collect();
                let empty_notice = rows.is_empty().then(|| EMPTY_NOTICE.to_string());

                *self.snapshot.write().await = Some(TrackerSnapshot {
                    entries,
                    stats,
                    loaded_at: Utc::now(),
                });

                TrackerView::Loaded {
                    stats,
                    rows,
                    empty_notice,
                }
            }
            FetchOutcome::Failed { error } => TrackerView::Error {
                message: format!("Error loading data: {}", error),
                advice: ERROR_ADVICE.to_string(),
            },
        }
    }

    /// CSV of the currently loaded snapshot
    pub async fn export_csv(&self) -> Result<CsvExport, TrackerError> {
        let guard = self.snapshot.read().await;
        let entries = match guard.as_ref() {
            Some(snapshot) if !snapshot.entries.is_empty() => &snapshot.entries,
            _ => return Err(TrackerError::NoData),
        };

        let content = to_csv(entries)?;
        let export = CsvExport {
            filename: export_filename(&self.export_prefix, Utc::now().date_naive()),
            rows: entries.len(),
            content,
        };

        tracing::info!(rows = export.rows, filename = %export.filename, "Exported RSVPs to CSV");
        Ok(export)
    }

    /// Empty the local mirror. Requires explicit confirmation; never
    /// touches the remote store.
    pub fn clear_local(&self, confirmed: bool) -> Result<ClearOutcome, TrackerError> {
        if !confirmed {
            return Ok(ClearOutcome::ConfirmationRequired {
                prompt: CLEAR_PROMPT.to_string(),
            });
        }

        let removed = self.mirror.clear()?;
        Ok(ClearOutcome::Cleared { removed })
    }

    /// Records held only in the local mirror
    pub fn local_records(&self) -> Vec<RsvpRecord> {
        self.mirror.load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::DEFAULT_KEY;
    use crate::rsvp::{RsvpController, RsvpForm};
    use crate::store::{DocumentStore, MemoryStore, StoredDocument, DEFAULT_COLLECTION};
    use serde_json::json;
    use tempfile::{tempdir, TempDir};

    struct Fixture {
        backend: Arc<MemoryStore>,
        mirror: Arc<LocalMirror>,
        dashboard: TrackerDashboard,
        _dir: TempDir,
    }

    fn fixture() -> Fixture {
        let dir = tempdir().unwrap();
        let backend = Arc::new(MemoryStore::new());
        let mirror = Arc::new(LocalMirror::open(dir.path(), DEFAULT_KEY).unwrap());
        let store = RemoteStore::new(backend.clone(), DEFAULT_COLLECTION);
        let dashboard = TrackerDashboard::new(store, Arc::clone(&mirror), "rsvps");
        Fixture {
            backend,
            mirror,
            dashboard,
            _dir: dir,
        }
    }

    async fn insert(backend: &MemoryStore, id: &str, submitted: Option<&str>, message: &str) {
        let mut fields = json!({
            "Fullnames": format!("Guest {}", id),
            "PhoneNumber": "0821234567",
            "NumGuest": 2,
            "WillAttend": true,
            "Message": message,
        });
        if let Some(ts) = submitted {
            fields["DataSubmitted"] = json!(ts);
        }
        backend
            .insert_raw(
                DEFAULT_COLLECTION,
                StoredDocument {
                    id: id.to_string(),
                    fields: fields.as_object().cloned().unwrap(),
                },
            )
            .await;
    }

    #[tokio::test]
    async fn test_open_sorts_and_renders() {
        let f = fixture();
        insert(&f.backend, "old", Some("2026-11-01T10:00:00Z"), "").await;
        insert(&f.backend, "none", None, "").await;
        insert(&f.backend, "new", Some("2026-11-05T10:00:00Z"), &"x".repeat(80)).await;

        match f.dashboard.open().await {
            TrackerView::Loaded { stats, rows, empty_notice } => {
                assert_eq!(stats.total, 3);
                assert_eq!(stats.total_guests, 6);
                assert!(empty_notice.is_none());
                let ids: Vec<_> = rows.iter().map(|r| r.id.as_str()).collect();
                assert_eq!(ids, vec!["new", "old", "none"]);
                assert!(rows[0].message.truncated);
            }
            TrackerView::Error { message, .. } => panic!("{}", message),
        }
    }

    #[tokio::test]
    async fn test_empty_collection() {
        let f = fixture();
        match f.dashboard.open().await {
            TrackerView::Loaded { stats, rows, empty_notice } => {
                assert_eq!(stats, AggregateStats::default());
                assert!(rows.is_empty());
                assert_eq!(empty_notice.as_deref(), Some(EMPTY_NOTICE));
            }
            TrackerView::Error { message, .. } => panic!("{}", message),
        }
        assert!(matches!(f.dashboard.export_csv().await, Err(TrackerError::NoData)));
    }

    #[tokio::test]
    async fn test_fetch_failure_renders_error() {
        let f = fixture();
        f.backend.set_offline(true);

        match f.dashboard.refresh().await {
            TrackerView::Error { message, advice } => {
                assert!(message.starts_with("Error loading data:"));
                assert_eq!(advice, ERROR_ADVICE);
            }
            TrackerView::Loaded { .. } => panic!("expected error view"),
        }
    }

    #[tokio::test]
    async fn test_export_uses_loaded_snapshot() {
        let f = fixture();
        assert!(matches!(f.dashboard.export_csv().await, Err(TrackerError::NoData)));

        insert(&f.backend, "a", Some("2026-11-01T10:00:00Z"), r#"Say "cheese""#).await;
        f.dashboard.open().await;

        // Added after the load: not part of the export until a refresh
        insert(&f.backend, "b", Some("2026-11-02T10:00:00Z"), "").await;

        let export = f.dashboard.export_csv().await.unwrap();
        assert_eq!(export.rows, 1);
        assert!(export.filename.starts_with("rsvps-"));
        assert!(export.content.contains(r#""Say ""cheese""""#));

        f.dashboard.refresh().await;
        assert_eq!(f.dashboard.export_csv().await.unwrap().rows, 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_snapshot() {
        let f = fixture();
        insert(&f.backend, "a", None, "").await;
        f.dashboard.open().await;

        f.backend.set_offline(true);
        f.dashboard.refresh().await;
        assert_eq!(f.dashboard.export_csv().await.unwrap().rows, 1);
    }

    #[tokio::test]
    async fn test_clear_local_requires_confirmation() {
        let f = fixture();
        let controller = RsvpController::new(
            RemoteStore::new(f.backend.clone(), DEFAULT_COLLECTION),
            Arc::clone(&f.mirror),
            "Party",
        );
        let form = RsvpForm {
            name: "Ada".to_string(),
            phone: "0821234567".to_string(),
            guests: "1".to_string(),
            attendance: Some("no".to_string()),
            ..Default::default()
        };
        controller.submit(&form).await.unwrap();

        assert!(matches!(
            f.dashboard.clear_local(false).unwrap(),
            ClearOutcome::ConfirmationRequired { .. }
        ));
        assert_eq!(f.dashboard.local_records().len(), 1);

        assert_eq!(
            f.dashboard.clear_local(true).unwrap(),
            ClearOutcome::Cleared { removed: 1 }
        );
        assert!(f.dashboard.local_records().is_empty());

        // Remote copy is untouched
        assert_eq!(f.backend.list(DEFAULT_COLLECTION).await.unwrap().len(), 1);
    }
}
