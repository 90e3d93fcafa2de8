//! Remote Store
//!
//! The hosted document database is the system of record for RSVPs. It is
//! reached through the [`DocumentStore`] trait so the adapter logic (field
//! mapping, coercion, aggregation, fail-closed behaviour) is independent of
//! the backend:
//!
//! - [`FirestoreStore`]: Firestore REST API over reqwest
//! - [`MemoryStore`]: in-process store for development and tests
//!
//! [`RemoteStore`] is the adapter the rest of the crate talks to.

mod adapter;
mod document;
mod firestore;
mod memory;

pub use adapter::{AggregateStats, ConnectionStatus, FetchOutcome, RemoteStore, SaveOutcome};
pub use document::{coerce_guest_count, RsvpEntry};
pub use firestore::{FirestoreConfig, FirestoreStore};
pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

/// Default collection holding RSVP documents
pub const DEFAULT_COLLECTION: &str = "Birthday RSVP";

/// A document to insert
#[derive(Debug, Clone, Default)]
pub struct NewDocument {
    /// Plain JSON fields
    pub fields: Map<String, Value>,
    /// Fields the server fills with its own commit time
    pub server_timestamps: Vec<String>,
}

impl NewDocument {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            server_timestamps: Vec::new(),
        }
    }

    pub fn server_timestamp(mut self, field: impl Into<String>) -> Self {
        self.server_timestamps.push(field.into());
        self
    }
}

/// A document read back from the store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    /// Plain JSON fields; timestamps are RFC 3339 strings
    pub fields: Map<String, Value>,
}

/// Errors from a document store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database not connected")]
    NotConnected,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Request timeout")]
    Timeout,

    #[error("Remote store unavailable")]
    Unavailable,

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl StoreError {
    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            StoreError::Timeout
        } else if e.is_connect() {
            StoreError::Unavailable
        } else {
            StoreError::Request(e)
        }
    }
}

/// CRUD surface of a document database
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Backend name for logs and status output
    fn name(&self) -> &str;

    /// Insert a document, returning its id
    async fn add(&self, collection: &str, doc: NewDocument) -> Result<String, StoreError>;

    /// Every document in the collection
    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError>;
}

/// Parse an RFC 3339 timestamp field
pub(crate) fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
