//! In-process document store
//!
//! Backs local development (`store.backend = "memory"`) and tests. Can be
//! switched offline to behave like an unreachable remote.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

use super::{DocumentStore, NewDocument, StoreError, StoredDocument};

/// Document store held in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<StoredDocument>>>,
    offline: AtomicBool,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail as if the network were down
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of `add`/`list` calls received, successful or not
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Insert a document verbatim, bypassing server timestamps
    pub async fn insert_raw(&self, collection: &str, doc: StoredDocument) {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(doc);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn add(&self, collection: &str, doc: NewDocument) -> Result<String, StoreError> {
        self.check_online()?;

        let id = uuid::Uuid::new_v4().simple().to_string();
        let mut fields = doc.fields;
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        for field in doc.server_timestamps {
            fields.insert(field, Value::from(now.clone()));
        }

        self.insert_raw(
            collection,
            StoredDocument {
                id: id.clone(),
                fields,
            },
        )
        .await;

        Ok(id)
    }

    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        self.check_online()?;

        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    #[tokio::test]
    async fn test_add_and_list() {
        let store = MemoryStore::new();
        let mut fields = Map::new();
        fields.insert("Fullnames".into(), Value::from("Ada"));

        let id = store
            .add("rsvps", NewDocument::new(fields).server_timestamp("DataSubmitted"))
            .await
            .unwrap();

        let docs = store.list("rsvps").await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, id);
        assert!(docs[0].fields["DataSubmitted"].is_string());
        assert!(store.list("other").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_offline() {
        let store = MemoryStore::new();
        store.set_offline(true);

        assert!(matches!(
            store.add("rsvps", NewDocument::default()).await,
            Err(StoreError::Unavailable)
        ));
        assert!(store.list("rsvps").await.is_err());
        assert_eq!(store.call_count(), 2);
    }
}
