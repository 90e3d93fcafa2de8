//! Local Fallback Mirror
//!
//! A best-effort local copy of every RSVP submitted through this instance.
//! All records live under one namespaced key, stored as a JSON array in
//! `<dir>/<key>.json`. Records are only ever appended; the only removal is
//! the explicit bulk [`LocalMirror::clear`].
//!
//! A corrupt file is logged and read as empty rather than failing callers.
//! The next append moves it aside to `<key>.json.corrupt-<timestamp>` before
//! starting a fresh list, so damaged contents are never overwritten.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

use crate::rsvp::RsvpRecord;

/// Default namespaced key
pub const DEFAULT_KEY: &str = "soiree.rsvps";

/// Errors from the local mirror
#[derive(Debug, Error)]
pub enum LocalStoreError {
    #[error("IO error on {path:?}: {error}")]
    Io { path: PathBuf, error: std::io::Error },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Lock error: {0}")]
    Lock(String),
}

pub type LocalResult<T> = Result<T, LocalStoreError>;

/// What the mirror file held on disk
enum Contents {
    Records(Vec<RsvpRecord>),
    Corrupt(serde_json::Error),
}

/// File-backed append-only list of RSVP records
#[derive(Debug)]
pub struct LocalMirror {
    path: PathBuf,
    key: String,
    // Serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl LocalMirror {
    /// Open (or lazily create) the mirror for `key` inside `dir`
    pub fn open(dir: impl AsRef<Path>, key: impl Into<String>) -> LocalResult<Self> {
        let key = key.into();
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(LocalStoreError::InvalidKey(key));
        }

        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|error| LocalStoreError::Io {
            path: dir.to_path_buf(),
            error,
        })?;

        Ok(Self {
            path: dir.join(format!("{}.json", key)),
            key,
            write_lock: Mutex::new(()),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record
    pub fn append(&self, record: &RsvpRecord) -> LocalResult<usize> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| LocalStoreError::Lock(e.to_string()))?;

        let mut records = match self.read_contents()? {
            Contents::Records(records) => records,
            Contents::Corrupt(_) => {
                self.quarantine()?;
                Vec::new()
            }
        };
        records.push(record.clone());
        self.write_records(&records)?;

        tracing::debug!(key = %self.key, count = records.len(), "Appended RSVP to local mirror");
        Ok(records.len())
    }

    /// All locally recorded RSVPs, oldest first
    pub fn load(&self) -> Vec<RsvpRecord> {
        self.read_records()
    }

    pub fn len(&self) -> usize {
        self.read_records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every local record, returning how many were held
    pub fn clear(&self) -> LocalResult<usize> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| LocalStoreError::Lock(e.to_string()))?;

        let removed = self.read_records().len();
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(error) => {
                return Err(LocalStoreError::Io {
                    path: self.path.clone(),
                    error,
                })
            }
        }

        tracing::info!(key = %self.key, removed, "Cleared local RSVP mirror");
        Ok(removed)
    }

    fn read_records(&self) -> Vec<RsvpRecord> {
        match self.read_contents() {
            Ok(Contents::Records(records)) => records,
            Ok(Contents::Corrupt(e)) => {
                tracing::warn!(path = ?self.path, error = %e, "Local mirror is corrupt, treating as empty");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read local mirror");
                Vec::new()
            }
        }
    }

    fn read_contents(&self) -> LocalResult<Contents> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Contents::Records(Vec::new()))
            }
            Err(error) => {
                return Err(LocalStoreError::Io {
                    path: self.path.clone(),
                    error,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(Contents::Records(Vec::new()));
        }

        Ok(match serde_json::from_str(&content) {
            Ok(records) => Contents::Records(records),
            Err(e) => Contents::Corrupt(e),
        })
    }

    /// Move a damaged file out of the way, returning where it went
    fn quarantine(&self) -> LocalResult<PathBuf> {
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
        let aside = self.path.with_extension(format!("json.corrupt-{}", stamp));

        std::fs::rename(&self.path, &aside).map_err(|error| LocalStoreError::Io {
            path: aside.clone(),
            error,
        })?;

        tracing::warn!(key = %self.key, moved_to = ?aside, "Moved corrupt local mirror aside");
        Ok(aside)
    }

    fn write_records(&self, records: &[RsvpRecord]) -> LocalResult<()> {
        let json = serde_json::to_string_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");

        std::fs::write(&tmp, json).map_err(|error| LocalStoreError::Io {
            path: tmp.clone(),
            error,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|error| LocalStoreError::Io {
            path: self.path.clone(),
            error,
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsvp::Attendance;
    use chrono::Utc;
    use tempfile::tempdir;

    fn record(name: &str) -> RsvpRecord {
        RsvpRecord {
            guest_name: name.to_string(),
            phone: "0821234567".to_string(),
            email: String::new(),
            number_of_guests: 1,
            attendance: Attendance::Yes,
            message: String::new(),
            timestamp: Utc::now(),
            event_label: "Party".to_string(),
        }
    }

    #[test]
    fn test_append_and_load() {
        let dir = tempdir().unwrap();
        let mirror = LocalMirror::open(dir.path(), DEFAULT_KEY).unwrap();

        assert!(mirror.is_empty());
        mirror.append(&record("Ada")).unwrap();
        mirror.append(&record("Grace")).unwrap();

        let records = mirror.load();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].guest_name, "Ada");
        assert_eq!(records[1].guest_name, "Grace");
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let mirror = LocalMirror::open(dir.path(), DEFAULT_KEY).unwrap();
            mirror.append(&record("Ada")).unwrap();
        }
        let mirror = LocalMirror::open(dir.path(), DEFAULT_KEY).unwrap();
        assert_eq!(mirror.len(), 1);
    }

    #[test]
    fn test_clear() {
        let dir = tempdir().unwrap();
        let mirror = LocalMirror::open(dir.path(), DEFAULT_KEY).unwrap();
        mirror.append(&record("Ada")).unwrap();
        mirror.append(&record("Ada")).unwrap();

        assert_eq!(mirror.clear().unwrap(), 2);
        assert!(mirror.is_empty());
        assert_eq!(mirror.clear().unwrap(), 0);
    }

    fn corrupt_copies(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| path.to_string_lossy().contains(".json.corrupt-"))
            .collect()
    }

    #[test]
    fn test_corrupt_file_is_kept_aside_on_append() {
        let dir = tempdir().unwrap();
        let mirror = LocalMirror::open(dir.path(), DEFAULT_KEY).unwrap();
        std::fs::write(mirror.path(), "{ not json").unwrap();

        assert!(mirror.load().is_empty());
        assert!(corrupt_copies(dir.path()).is_empty());

        assert_eq!(mirror.append(&record("Ada")).unwrap(), 1);
        assert_eq!(mirror.load().len(), 1);

        let copies = corrupt_copies(dir.path());
        assert_eq!(copies.len(), 1);
        assert_eq!(std::fs::read_to_string(&copies[0]).unwrap(), "{ not json");
    }

    #[test]
    fn test_damaged_record_does_not_erase_earlier_ones() {
        let dir = tempdir().unwrap();
        let mirror = LocalMirror::open(dir.path(), DEFAULT_KEY).unwrap();
        for name in ["Ada", "Grace", "Katherine"] {
            mirror.append(&record(name)).unwrap();
        }

        let stored = std::fs::read_to_string(mirror.path()).unwrap();
        std::fs::write(mirror.path(), stored.replacen("\"yes\"", "\"maybe\"", 1)).unwrap();

        mirror.append(&record("Dorothy")).unwrap();

        let names: Vec<_> = mirror.load().into_iter().map(|r| r.guest_name).collect();
        assert_eq!(names, vec!["Dorothy"]);

        let copies = corrupt_copies(dir.path());
        assert_eq!(copies.len(), 1);
        let kept = std::fs::read_to_string(&copies[0]).unwrap();
        for name in ["Ada", "Grace", "Katherine"] {
            assert!(kept.contains(name));
        }
    }

    #[test]
    fn test_unreadable_file_fails_append() {
        let dir = tempdir().unwrap();
        let mirror = LocalMirror::open(dir.path(), DEFAULT_KEY).unwrap();
        // A directory in place of the file cannot be read as text
        std::fs::create_dir(mirror.path()).unwrap();

        assert!(matches!(
            mirror.append(&record("Ada")),
            Err(LocalStoreError::Io { .. })
        ));
        assert!(mirror.path().is_dir());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        assert!(LocalMirror::open(dir.path(), "../escape").is_err());
        assert!(LocalMirror::open(dir.path(), "").is_err());
    }
}
