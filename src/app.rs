//! Application context
//!
//! Owns every component of a running instance. Built once at startup from
//! [`Config`] and shared behind an `Arc` by the HTTP layer.

use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{Config, StoreBackend};
use crate::decorations::{self, Decoration, Scene};
use crate::link::LinkCodec;
use crate::local::{LocalMirror, LocalStoreError};
use crate::router::{self, PageRoute};
use crate::rsvp::RsvpController;
use crate::store::{
    ConnectionStatus, DocumentStore, FirestoreConfig, FirestoreStore, MemoryStore, RemoteStore,
    StoreError,
};
use crate::tracker::TrackerDashboard;

/// Startup failures
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Local mirror unavailable: {0}")]
    Local(#[from] LocalStoreError),

    #[error("Remote store setup failed: {0}")]
    Store(#[from] StoreError),
}

/// Connection state reported to the host and the RSVP form
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub status: ConnectionStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    pub collection: String,
    pub event: String,
    pub local_records: usize,
}

/// The running application
pub struct App {
    codec: LinkCodec,
    store: RemoteStore,
    mirror: Arc<LocalMirror>,
    rsvp: RsvpController,
    tracker: TrackerDashboard,
    numeral: String,
}

impl App {
    /// Build the application from configuration.
    ///
    /// A Firestore backend without a project id is treated as not
    /// configured: the instance runs in local-only mode.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let backend: Option<Arc<dyn DocumentStore>> = match config.store.backend {
            StoreBackend::Firestore if config.store.firestore.project_id.trim().is_empty() => {
                tracing::warn!("No Firestore project configured, RSVPs will be saved locally only");
                None
            }
            StoreBackend::Firestore => {
                let settings = &config.store.firestore;
                let store = FirestoreStore::new(FirestoreConfig {
                    base_url: settings.base_url.clone(),
                    project_id: settings.project_id.clone(),
                    database: settings.database.clone(),
                    api_key: settings.api_key.clone(),
                    request_timeout_ms: settings.request_timeout_ms,
                    ..Default::default()
                })?;
                tracing::info!(project = %settings.project_id, "Using Firestore backend");
                Some(Arc::new(store))
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory backend, RSVPs are lost on restart");
                Some(Arc::new(MemoryStore::new()))
            }
            StoreBackend::None => {
                tracing::info!("Remote store disabled, RSVPs will be saved locally only");
                None
            }
        };

        let mirror = LocalMirror::open(&config.local.data_dir, config.local.key.clone())?;
        Ok(Self::assemble(backend, mirror, config))
    }

    /// Build with an explicit backend and mirror
    pub fn with_backend(
        backend: Option<Arc<dyn DocumentStore>>,
        mirror: LocalMirror,
        config: &Config,
    ) -> Self {
        Self::assemble(backend, mirror, config)
    }

    fn assemble(backend: Option<Arc<dyn DocumentStore>>, mirror: LocalMirror, config: &Config) -> Self {
        let store = match backend {
            Some(backend) => RemoteStore::new(backend, config.store.collection.clone()),
            None => RemoteStore::disconnected(),
        };
        let mirror = Arc::new(mirror);

        Self {
            codec: LinkCodec::new(config.event.base_url.clone()),
            rsvp: RsvpController::new(store.clone(), Arc::clone(&mirror), config.event.label.clone()),
            tracker: TrackerDashboard::new(
                store.clone(),
                Arc::clone(&mirror),
                config.tracker.export_prefix.clone(),
            ),
            store,
            mirror,
            numeral: config.event.numeral.clone(),
        }
    }

    pub fn codec(&self) -> &LinkCodec {
        &self.codec
    }

    pub fn rsvp(&self) -> &RsvpController {
        &self.rsvp
    }

    pub fn tracker(&self) -> &TrackerDashboard {
        &self.tracker
    }

    pub fn mirror(&self) -> &LocalMirror {
        &self.mirror
    }

    pub fn status(&self) -> StatusReport {
        let status = self.store.status();
        StatusReport {
            status,
            message: status.message().to_string(),
            backend: self.store.backend_name().map(str::to_string),
            collection: self.store.collection().to_string(),
            event: self.rsvp.event_label().to_string(),
            local_records: self.mirror.len(),
        }
    }

    /// Decorations for a scene, using the configured numeral
    pub fn decorate(&self, scene: Scene) -> Vec<Decoration> {
        self.decorate_with(scene, &mut rand::thread_rng())
    }

    pub fn decorate_with<R: Rng>(&self, scene: Scene, rng: &mut R) -> Vec<Decoration> {
        decorations::generate(scene, rng, &self.numeral)
    }

    /// Route a page load and dress the chosen view
    pub fn open_page(&self, url: &str) -> PageRoute {
        let mut page = router::route(url, &self.codec);
        page.decorations = self.decorate(page.scene());
        page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config(data_dir: &std::path::Path, backend: StoreBackend) -> Config {
        let mut config = Config::default();
        config.local.data_dir = data_dir.to_string_lossy().to_string();
        config.store.backend = backend;
        config
    }

    #[test]
    fn test_firestore_without_project_is_local_only() {
        let dir = tempdir().unwrap();
        let app = App::from_config(&config(dir.path(), StoreBackend::Firestore)).unwrap();

        let report = app.status();
        assert_eq!(report.status, ConnectionStatus::LocalOnly);
        assert!(report.backend.is_none());
        assert_eq!(report.local_records, 0);
    }

    #[test]
    fn test_memory_backend_is_connected() {
        let dir = tempdir().unwrap();
        let app = App::from_config(&config(dir.path(), StoreBackend::Memory)).unwrap();

        let report = app.status();
        assert_eq!(report.status, ConnectionStatus::Connected);
        assert_eq!(report.backend.as_deref(), Some("memory"));
        assert_eq!(report.collection, "Birthday RSVP");
    }

    #[test]
    fn test_firestore_with_project() {
        let dir = tempdir().unwrap();
        let mut config = config(dir.path(), StoreBackend::Firestore);
        config.store.firestore.project_id = "party-db".to_string();

        let app = App::from_config(&config).unwrap();
        assert_eq!(app.status().backend.as_deref(), Some("firestore"));
    }

    #[test]
    fn test_invalid_local_key_fails_startup() {
        let dir = tempdir().unwrap();
        let mut config = config(dir.path(), StoreBackend::None);
        config.local.key = "../escape".to_string();

        assert!(matches!(App::from_config(&config), Err(AppError::Local(_))));
    }

    #[test]
    fn test_numeral_comes_from_config() {
        use rand::SeedableRng;

        let dir = tempdir().unwrap();
        let mut config = config(dir.path(), StoreBackend::None);
        config.event.numeral = "40".to_string();
        let app = App::from_config(&config).unwrap();

        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let numerals: Vec<_> = app
            .decorate_with(Scene::Invitation, &mut rng)
            .into_iter()
            .filter_map(|d| d.text)
            .collect();
        assert_eq!(numerals.len(), 8);
        assert!(numerals.iter().all(|t| t == "40"));
    }

    #[test]
    fn test_open_page_dresses_guest_view() {
        let dir = tempdir().unwrap();
        let app = App::from_config(&config(dir.path(), StoreBackend::None)).unwrap();
        let link = app.codec().encode("Lerato").unwrap();

        let page = app.open_page(&link.url);
        assert_eq!(page.prefill_name.as_deref(), Some("Lerato"));
        assert_eq!(page.scene(), Scene::Invitation);
        assert!(!page.decorations.is_empty());

        let page = app.open_page("http://localhost:8086/");
        assert!(page.prefill_name.is_none());
        assert_eq!(page.scene(), Scene::Background);
    }
}
