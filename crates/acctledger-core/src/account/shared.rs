//! Thread-safe registry handle.

use std::sync::{Arc, Mutex, MutexGuard};

use super::model::{Account, AccountEdit, AccountId};
use super::registry::AccountRegistry;
use crate::Result;
use crate::storage::KeyValueStore;

/// A cloneable handle to one registry shared between callers.
///
/// Each operation holds the lock across both the in-memory change and the
/// snapshot write, so concurrent mutations never overwrite each other's
/// snapshot with a stale one.
#[derive(Debug)]
pub struct SharedRegistry<S> {
    inner: Arc<Mutex<AccountRegistry<S>>>,
}

impl<S> Clone for SharedRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: KeyValueStore> SharedRegistry<S> {
    /// Wrap a registry for shared use.
    #[must_use]
    pub fn new(registry: AccountRegistry<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Lock the registry for a sequence of operations.
    ///
    /// A panic in another holder does not leave the list half-written (each
    /// mutation is a single push, retain or field assignment), so a poisoned
    /// lock is recovered rather than propagated.
    pub fn lock(&self) -> MutexGuard<'_, AccountRegistry<S>> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// See [`AccountRegistry::add_account`].
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub fn add_account(&self) -> Result<AccountId> {
        self.lock().add_account()
    }

    /// See [`AccountRegistry::delete_account`].
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub fn delete_account(&self, id: &str) -> Result<()> {
        self.lock().delete_account(id)
    }

    /// See [`AccountRegistry::edit_account`].
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub fn edit_account(&self, id: &str, edit: AccountEdit) -> Result<bool> {
        self.lock().edit_account(id, edit)
    }

    /// See [`AccountRegistry::load_from_storage`].
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the snapshot is corrupt.
    pub fn load_from_storage(&self) -> Result<()> {
        self.lock().load_from_storage()
    }

    /// Copy of the current account list.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Account> {
        self.lock().accounts().to_vec()
    }
}
