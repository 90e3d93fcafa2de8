//! Remote store adapter
//!
//! Translates RSVP records to the remote document shape and back. Every
//! backend failure is caught here and turned into a structured outcome;
//! nothing above this layer sees a raw store error.

use serde::Serialize;
use std::sync::Arc;

use super::document::{to_document, RsvpEntry};
use super::{DocumentStore, StoreError, DEFAULT_COLLECTION};
use crate::rsvp::RsvpRecord;

/// Attendance totals over a set of entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub total: usize,
    pub attending: usize,
    pub not_attending: usize,
    pub total_guests: u64,
}

impl AggregateStats {
    /// Single pass over the entries
    pub fn from_entries(entries: &[RsvpEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut stats, entry| {
            stats.total += 1;
            stats.total_guests += u64::from(entry.num_guests);
            if entry.will_attend {
                stats.attending += 1;
            } else {
                stats.not_attending += 1;
            }
            stats
        })
    }
}

/// Result of saving one record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SaveOutcome {
    Saved { doc_id: String },
    Failed { error: String },
}

impl SaveOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SaveOutcome::Saved { .. })
    }
}

/// Result of reading the whole collection
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchOutcome {
    Fetched {
        entries: Vec<RsvpEntry>,
        stats: AggregateStats,
    },
    Failed {
        error: String,
    },
}

/// Whether the remote store is reachable from this instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Connected,
    LocalOnly,
}

impl ConnectionStatus {
    pub fn message(&self) -> &'static str {
        match self {
            ConnectionStatus::Connected => "✓ Connected to database",
            ConnectionStatus::LocalOnly => {
                "⚠ Database connection failed. RSVP will be saved locally."
            }
        }
    }
}

/// Adapter over an optional document store backend.
///
/// With no backend configured, the adapter fails closed: every call returns
/// a failure without attempting any I/O.
#[derive(Clone)]
pub struct RemoteStore {
    backend: Option<Arc<dyn DocumentStore>>,
    collection: String,
}

impl RemoteStore {
    pub fn new(backend: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            backend: Some(backend),
            collection: collection.into(),
        }
    }

    /// An adapter whose connection was never established
    pub fn disconnected() -> Self {
        Self {
            backend: None,
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn backend_name(&self) -> Option<&str> {
        self.backend.as_deref().map(|b| b.name())
    }

    pub fn status(&self) -> ConnectionStatus {
        if self.backend.is_some() {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::LocalOnly
        }
    }

    fn backend(&self) -> Result<&Arc<dyn DocumentStore>, StoreError> {
        self.backend.as_ref().ok_or(StoreError::NotConnected)
    }

    /// Persist one record
    pub async fn save(&self, record: &RsvpRecord) -> SaveOutcome {
        let backend = match self.backend() {
            Ok(backend) => backend,
            Err(e) => return SaveOutcome::Failed { error: e.to_string() },
        };

        match backend.add(&self.collection, to_document(record)).await {
            Ok(doc_id) => {
                tracing::info!(doc_id = %doc_id, guest = %record.guest_name, "RSVP saved");
                SaveOutcome::Saved { doc_id }
            }
            Err(e) => {
                tracing::error!(error = %e, guest = %record.guest_name, "Error saving RSVP to remote store");
                SaveOutcome::Failed { error: e.to_string() }
            }
        }
    }

    /// Read every record and aggregate attendance
    pub async fn fetch_all(&self) -> FetchOutcome {
        let backend = match self.backend() {
            Ok(backend) => backend,
            Err(e) => return FetchOutcome::Failed { error: e.to_string() },
        };

        match backend.list(&self.collection).await {
            Ok(docs) => {
                let entries: Vec<RsvpEntry> = docs.iter().map(RsvpEntry::from_stored).collect();
                let stats = AggregateStats::from_entries(&entries);
                tracing::debug!(count = entries.len(), "Fetched RSVP entries");
                FetchOutcome::Fetched { entries, stats }
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching RSVP data");
                FetchOutcome::Failed { error: e.to_string() }
            }
        }
    }
}

impl std::fmt::Debug for RemoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteStore")
            .field("backend", &self.backend_name())
            .field("collection", &self.collection)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsvp::Attendance;
    use crate::store::{MemoryStore, StoredDocument};
    use chrono::Utc;
    use serde_json::json;

    fn record(name: &str, phone: &str, guests: u32, attendance: Attendance) -> RsvpRecord {
        RsvpRecord {
            guest_name: name.to_string(),
            phone: phone.to_string(),
            email: String::new(),
            number_of_guests: guests,
            attendance,
            message: String::new(),
            timestamp: Utc::now(),
            event_label: "Party".to_string(),
        }
    }

    #[tokio::test]
    async fn test_disconnected_fails_closed() {
        let store = RemoteStore::disconnected();
        assert_eq!(store.status(), ConnectionStatus::LocalOnly);

        let outcome = store.save(&record("Ada", "0821234567", 1, Attendance::Yes)).await;
        assert_eq!(
            outcome,
            SaveOutcome::Failed {
                error: "Database not connected".to_string()
            }
        );
        assert!(matches!(store.fetch_all().await, FetchOutcome::Failed { .. }));
    }

    #[tokio::test]
    async fn test_backend_error_is_caught() {
        let backend = Arc::new(MemoryStore::new());
        backend.set_offline(true);
        let store = RemoteStore::new(backend, DEFAULT_COLLECTION);

        let outcome = store.save(&record("Ada", "0821234567", 1, Attendance::Yes)).await;
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn test_save_and_fetch_with_stats() {
        let backend = Arc::new(MemoryStore::new());
        let store = RemoteStore::new(backend, DEFAULT_COLLECTION);

        store.save(&record("Ada", "0821234567", 3, Attendance::Yes)).await;
        store.save(&record("Ada", "0839876543", 1, Attendance::No)).await;
        store.save(&record("Grace", "0841112222", 2, Attendance::Yes)).await;

        match store.fetch_all().await {
            FetchOutcome::Fetched { entries, stats } => {
                assert_eq!(entries.len(), 3);
                assert_eq!(entries.iter().filter(|e| e.full_names == "Ada").count(), 2);
                assert_eq!(
                    stats,
                    AggregateStats {
                        total: 3,
                        attending: 2,
                        not_attending: 1,
                        total_guests: 6,
                    }
                );
            }
            FetchOutcome::Failed { error } => panic!("fetch failed: {}", error),
        }
    }

    #[tokio::test]
    async fn test_fetch_defaults_bad_fields() {
        let backend = Arc::new(MemoryStore::new());
        backend
            .insert_raw(
                DEFAULT_COLLECTION,
                StoredDocument {
                    id: "legacy".to_string(),
                    fields: json!({ "Fullnames": "Old", "NumGuest": "x" })
                        .as_object()
                        .cloned()
                        .unwrap(),
                },
            )
            .await;
        let store = RemoteStore::new(backend, DEFAULT_COLLECTION);

        match store.fetch_all().await {
            FetchOutcome::Fetched { stats, .. } => {
                assert_eq!(stats.total_guests, 1);
                assert_eq!(stats.not_attending, 1);
            }
            FetchOutcome::Failed { error } => panic!("fetch failed: {}", error),
        }
    }

    #[test]
    fn test_stats_invariant() {
        let empty = AggregateStats::from_entries(&[]);
        assert_eq!(empty, AggregateStats::default());
        assert_eq!(empty.attending + empty.not_attending, empty.total);

        let entries: Vec<RsvpEntry> = (0..7)
            .map(|i| RsvpEntry {
                id: i.to_string(),
                full_names: format!("Guest {}", i),
                phone: String::new(),
                email: String::new(),
                num_guests: i + 1,
                will_attend: i % 3 == 0,
                message: String::new(),
                submitted_at: None,
            })
            .collect();

        let stats = AggregateStats::from_entries(&entries);
        assert_eq!(stats.attending + stats.not_attending, stats.total);
        assert_eq!(stats.total, 7);
        assert_eq!(stats.total_guests, 28);
    }
}
