//! Server configuration loaded from a TOML file.
//!
//! A missing file is written out with the defaults so the operator has
//! something to edit. Missing keys take their defaults.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    domain::{HistoryLimit, value_object::DEFAULT_HISTORY_LIMIT},
    usecase::SessionSettings,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write default config file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to encode default config: {0}")]
    Encode(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address, e.g. `0.0.0.0:8080`
    pub address: String,
    /// Messages replayed to a new connection and default `/history` size
    pub max_history: i64,
    pub upload_dir: PathBuf,
    /// Upload body limit in MiB
    pub max_upload_size: u64,
    pub write_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub ping_interval_secs: u64,
    /// Intake backlog at which the broadcast router starts warning
    pub queue_warn_depth: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0:8080".to_string(),
            max_history: i64::from(DEFAULT_HISTORY_LIMIT),
            upload_dir: PathBuf::from("./static/uploads"),
            max_upload_size: 10,
            write_timeout_secs: 10,
            read_timeout_secs: 300,
            ping_interval_secs: 30,
            queue_warn_depth: 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./chatroom.db"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// `<title>` of the chat page
    pub title: String,
    /// Heading shown on the chat page
    pub page_title: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: "Chatroom".to_string(),
            page_title: "Welcome to the chatroom".to_string(),
        }
    }
}

impl Config {
    /// Load `path`, creating it (and its parent directory) with defaults if it does not exist.
    pub fn load_or_init(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Self::default();
            config.write_to(path)?;
            tracing::info!(path = %path.display(), "wrote default config");
            return Ok(config);
        }

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    fn write_to(&self, path: &Path) -> Result<(), ConfigError> {
        let encoded = toml::to_string_pretty(self)?;
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, encoded).map_err(write_err)
    }

    /// `max_history`, or the built-in default when it is not positive
    pub fn history_limit(&self) -> HistoryLimit {
        HistoryLimit::or_default(self.server.max_history, HistoryLimit::default())
    }

    /// Per-connection timeouts. Zero values are raised to one second.
    pub fn session_settings(&self) -> SessionSettings {
        let secs = |value: u64| Duration::from_secs(value.max(1));
        SessionSettings {
            write_timeout: secs(self.server.write_timeout_secs),
            read_timeout: secs(self.server.read_timeout_secs),
            ping_interval: secs(self.server.ping_interval_secs),
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        let bytes = self.server.max_upload_size.saturating_mul(1024 * 1024);
        usize::try_from(bytes).unwrap_or(usize::MAX)
    }
}
