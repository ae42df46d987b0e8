//! Platform credential store backend.
//!
//! Keeps values in the platform's native secret storage:
//! - Linux: Secret Service (GNOME Keyring, `KWallet`)
//! - macOS: Keychain
//! - Windows: Credential Manager

use keyring::Entry;
use tracing::debug;

use super::{KeyValueStore, StorageResult};

/// Default service name used for keyring entries.
pub const DEFAULT_SERVICE: &str = "acctledger";

/// A store that keeps each key as a keyring entry under one service name.
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    /// Create a store using the given service name.
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// Service name entries are filed under.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Remove the entry for `key`. Missing entries are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the keyring operation fails.
    pub fn delete(&self, key: &str) -> StorageResult<()> {
        let entry = Entry::new(&self.service, key)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE)
    }
}

impl KeyValueStore for KeyringStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entry = Entry::new(&self.service, key)?;
        match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => {
                debug!("No keyring entry {}/{key}", self.service);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let entry = Entry::new(&self.service, key)?;
        entry.set_password(value)?;
        debug!("Stored keyring entry {}/{key}", self.service);
        Ok(())
    }
}
