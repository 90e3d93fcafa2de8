//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub event: EventConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub local: LocalConfig,

    #[serde(default)]
    pub tracker: TrackerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8086
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// The event being celebrated
#[derive(Debug, Clone, Deserialize)]
pub struct EventConfig {
    /// Stored with every RSVP
    #[serde(default = "default_event_label")]
    pub label: String,

    /// Public URL of the invitation page; guest links are built on it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Text of the floating numerals on the invitation
    #[serde(default = "default_numeral")]
    pub numeral: String,
}

fn default_event_label() -> String {
    "Birthday Celebration".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8086/".to_string()
}

fn default_numeral() -> String {
    "21".to_string()
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            label: default_event_label(),
            base_url: default_base_url(),
            numeral: default_numeral(),
        }
    }
}

/// Which document store backs RSVPs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Firestore,
    Memory,
    /// No remote store; everything is saved locally only
    None,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "firestore" => Ok(StoreBackend::Firestore),
            "memory" => Ok(StoreBackend::Memory),
            "none" => Ok(StoreBackend::None),
            other => Err(format!("Unknown store backend: {}", other)),
        }
    }
}

/// Remote document store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,

    #[serde(default = "default_collection")]
    pub collection: String,

    #[serde(default)]
    pub firestore: FirestoreSettings,
}

fn default_backend() -> StoreBackend {
    StoreBackend::Firestore
}

fn default_collection() -> String {
    crate::store::DEFAULT_COLLECTION.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            collection: default_collection(),
            firestore: FirestoreSettings::default(),
        }
    }
}

/// Firestore project settings
#[derive(Debug, Clone, Deserialize)]
pub struct FirestoreSettings {
    #[serde(default)]
    pub project_id: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_firestore_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_database() -> String {
    "(default)".to_string()
}

fn default_firestore_url() -> String {
    "https://firestore.googleapis.com".to_string()
}

fn default_request_timeout() -> u64 {
    10_000
}

impl Default for FirestoreSettings {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            api_key: None,
            database: default_database(),
            base_url: default_firestore_url(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

/// Local fallback mirror configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LocalConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_local_key")]
    pub key: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("soiree").to_string_lossy().to_string())
        .unwrap_or_else(|| "./soiree_data".to_string())
}

fn default_local_key() -> String {
    crate::local::DEFAULT_KEY.to_string()
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            key: default_local_key(),
        }
    }
}

/// Tracker dashboard configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    /// CSV files are named `<prefix>-YYYY-MM-DD.csv`
    #[serde(default = "default_export_prefix")]
    pub export_prefix: String,
}

fn default_export_prefix() -> String {
    "rsvps".to_string()
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            export_prefix: default_export_prefix(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// First existing config file among the standard locations
    pub fn find_default_path() -> Option<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("soiree").join("config.toml")),
            Some(PathBuf::from("/etc/soiree/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .find(|path| path.exists())
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        if let Some(path) = Self::find_default_path() {
            match Self::load_with_env(&path) {
                Ok(config) => {
                    tracing::info!("Loaded config from {:?}", path);
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load config from {:?}: {}", path, e);
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Server overrides
        if let Some(host) = var("SOIREE_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("SOIREE_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }

        // Event overrides
        if let Some(base_url) = var("SOIREE_BASE_URL") {
            self.event.base_url = base_url;
        }
        if let Some(label) = var("SOIREE_EVENT_LABEL") {
            self.event.label = label;
        }

        // Store overrides
        if let Some(backend) = var("SOIREE_STORE_BACKEND") {
            match backend.parse() {
                Ok(backend) => self.store.backend = backend,
                Err(e) => tracing::warn!("Ignoring SOIREE_STORE_BACKEND: {}", e),
            }
        }
        if let Some(project) = var("SOIREE_FIRESTORE_PROJECT") {
            self.store.firestore.project_id = project;
        }
        if let Some(key) = var("SOIREE_FIRESTORE_API_KEY") {
            self.store.firestore.api_key = Some(key);
        }

        // Local mirror overrides
        if let Some(data_dir) = var("SOIREE_DATA_DIR") {
            self.local.data_dir = data_dir;
        }

        // Logging overrides
        if let Some(level) = var("SOIREE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("SOIREE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Soiree Configuration
#
# Environment variables override these settings:
# - SOIREE_HOST
# - SOIREE_PORT
# - SOIREE_BASE_URL
# - SOIREE_EVENT_LABEL
# - SOIREE_STORE_BACKEND
# - SOIREE_FIRESTORE_PROJECT
# - SOIREE_FIRESTORE_API_KEY
# - SOIREE_DATA_DIR
# - SOIREE_LOG_LEVEL
# - SOIREE_LOG_FORMAT

[server]
# API server host
host = "0.0.0.0"

# API server port
port = 8086

# Allowed CORS origins (empty = any)
cors_origins = []

[event]
# Label stored with every RSVP
label = "Birthday Celebration"

# Public URL of the invitation page; guest links are built on it
base_url = "http://localhost:8086/"

# Text of the floating numerals on the invitation
numeral = "21"

[store]
# Backend: firestore, memory (development only), or none (local only)
backend = "firestore"

# Collection holding RSVP documents
collection = "Birthday RSVP"

[store.firestore]
# Firestore project id. When empty, RSVPs are saved locally only.
project_id = ""

# Web API key
# api_key = ""

database = "(default)"
base_url = "https://firestore.googleapis.com"
request_timeout_ms = 10000

[local]
# Directory for the local RSVP mirror
data_dir = "~/.local/share/soiree"

# Key (file name) holding the mirrored records
key = "soiree.rsvps"

[tracker]
# CSV exports are named <prefix>-YYYY-MM-DD.csv
export_prefix = "rsvps"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_template_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.server.port, 8086);
        assert_eq!(config.store.backend, StoreBackend::Firestore);
        assert_eq!(config.store.collection, "Birthday RSVP");
        assert_eq!(config.local.key, "soiree.rsvps");
        assert_eq!(config.tracker.export_prefix, "rsvps");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::parse("[event]\nlabel = \"Lerato's 30th\"\n").unwrap();
        assert_eq!(config.event.label, "Lerato's 30th");
        assert_eq!(config.event.numeral, "21");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SOIREE_PORT", "9000"),
            ("SOIREE_STORE_BACKEND", "memory"),
            ("SOIREE_FIRESTORE_PROJECT", "party-db"),
            ("SOIREE_DATA_DIR", "/tmp/soiree"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.firestore.project_id, "party-db");
        assert_eq!(config.local.data_dir, "/tmp/soiree");
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|k| match k {
            "SOIREE_PORT" => Some("not-a-port".to_string()),
            "SOIREE_STORE_BACKEND" => Some("postgres".to_string()),
            _ => None,
        });

        assert_eq!(config.server.port, 8086);
        assert_eq!(config.store.backend, StoreBackend::Firestore);
    }
}
