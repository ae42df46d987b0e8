//! Key-value persistence backends.
//!
//! The registry writes one string value under one key, so every backend is
//! a plain string-keyed, string-valued store with synchronous access:
//! - [`MemoryStore`]: in-process map, never fails
//! - [`FileStore`]: one JSON file per key in a data directory
//! - [`KeyringStore`]: the platform credential store

mod file;
mod memory;
mod os_keyring;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use os_keyring::{DEFAULT_SERVICE, KeyringStore};

/// Error type for storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Filesystem access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to access keyring.
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    /// The key cannot be used with this backend.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// A synchronous string-keyed, string-valued store.
pub trait KeyValueStore {
    /// Read the value stored under `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }
}
