//! Persistent application settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::storage::{DEFAULT_SERVICE, FileStore, KeyValueStore, KeyringStore};
use crate::{Error, Result};

/// Directory name used under the platform config and data directories.
pub const APP_DIR: &str = "acctledger";

/// Where the account snapshot is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// A JSON file in the data directory.
    #[default]
    File,
    /// The platform keyring.
    Keyring,
}

impl Backend {
    /// Settings-file name of the backend.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Keyring => "keyring",
        }
    }
}

/// Settings that persist across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Storage backend.
    pub backend: Backend,
    /// Override for the data directory used by the file backend.
    pub data_dir: Option<PathBuf>,
    /// Service name used by the keyring backend.
    pub keyring_service: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: Backend::File,
            data_dir: None,
            keyring_service: DEFAULT_SERVICE.to_string(),
        }
    }
}

impl Settings {
    /// Default settings file location: `<config dir>/acctledger/settings.json`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("settings.json")
    }

    /// Load settings from `path`, falling back to defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Resolved data directory for the file backend.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
        })
    }

    /// Open the configured storage backend.
    #[must_use]
    pub fn open_store(&self) -> Box<dyn KeyValueStore + Send> {
        match self.backend {
            Backend::File => Box::new(FileStore::new(self.data_dir())),
            Backend::Keyring => Box::new(KeyringStore::new(self.keyring_service.clone())),
        }
    }
}
