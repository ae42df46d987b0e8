//! The account registry: an ordered account list with write-through persistence.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::model::{Account, AccountEdit, AccountId};
use crate::storage::KeyValueStore;
use crate::{Error, Result};

/// Storage key the snapshot is written under.
pub const STORAGE_KEY: &str = "accounts";

/// In-memory list of accounts backed by a key-value store.
///
/// Every mutating method writes the full list to the store under
/// [`STORAGE_KEY`] before returning. If that write fails, the in-memory
/// change is kept and the storage error is returned.
#[derive(Debug)]
pub struct AccountRegistry<S> {
    store: S,
    accounts: Vec<Account>,
}

impl<S: KeyValueStore> AccountRegistry<S> {
    /// Create an empty registry over `store`. Nothing is read or written.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            store,
            accounts: Vec::new(),
        }
    }

    /// Create a registry and hydrate it from `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or holds a corrupt snapshot.
    pub fn open(store: S) -> Result<Self> {
        let mut registry = Self::new(store);
        registry.load_from_storage()?;
        Ok(registry)
    }

    /// All accounts, in insertion order.
    #[must_use]
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Iterate over the accounts in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Account> {
        self.accounts.iter()
    }

    /// Number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true if there are no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Look up an account by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == *id)
    }

    /// Borrow the backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consume the registry and return the backing store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// Append a blank LDAP account and persist. Returns the new id.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub fn add_account(&mut self) -> Result<AccountId> {
        let id = self.fresh_id();
        self.accounts.push(Account::new(id.clone()));
        info!("Added account {id}");
        self.persist()?;
        Ok(id)
    }

    /// Remove every account with the given id and persist.
    ///
    /// Unknown ids are a silent no-op and write nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub fn delete_account(&mut self, id: &str) -> Result<()> {
        let before = self.accounts.len();
        self.accounts.retain(|a| a.id != *id);
        let removed = before - self.accounts.len();

        if removed == 0 {
            debug!("Delete of unknown account {id} ignored");
            return Ok(());
        }

        info!("Deleted account {id}");
        self.persist()
    }

    /// Apply `edit` to the account with the given id and persist.
    ///
    /// Returns `false` (and writes nothing) if no account has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub fn edit_account(&mut self, id: &str, edit: AccountEdit) -> Result<bool> {
        let Some(account) = self.accounts.iter_mut().find(|a| a.id == *id) else {
            debug!("Edit of unknown account {id} ignored");
            return Ok(false);
        };

        account.apply(edit);
        debug!("Edited account {id}");
        self.persist()?;
        Ok(true)
    }

    /// Replace the in-memory list with the persisted snapshot, if one exists.
    ///
    /// A missing or empty stored value leaves the list untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptState`] if the stored value is not a valid
    /// account list (the in-memory list is then left untouched), or a
    /// storage error if the store cannot be read.
    pub fn load_from_storage(&mut self) -> Result<()> {
        let raw = match self.store.get(STORAGE_KEY)? {
            Some(raw) if !raw.is_empty() => raw,
            _ => {
                debug!("No persisted accounts, keeping {} in memory", self.len());
                return Ok(());
            }
        };

        let accounts = parse_snapshot(&raw).inspect_err(|e| warn!("{e}"))?;
        info!("Loaded {} accounts from storage", accounts.len());
        self.accounts = accounts;
        Ok(())
    }

    /// Write the full account list to the store.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails.
    pub fn persist(&mut self) -> Result<()> {
        let snapshot = serde_json::to_string(&self.accounts)?;
        self.store.set(STORAGE_KEY, &snapshot)?;
        debug!("Persisted {} accounts", self.accounts.len());
        Ok(())
    }

    fn fresh_id(&self) -> AccountId {
        loop {
            let id = AccountId::generate();
            if self.get(id.as_str()).is_none() {
                return id;
            }
        }
    }
}

impl<'a, S> IntoIterator for &'a AccountRegistry<S> {
    type Item = &'a Account;
    type IntoIter = std::slice::Iter<'a, Account>;

    fn into_iter(self) -> Self::IntoIter {
        self.accounts.iter()
    }
}

/// Parse a stored snapshot, rejecting malformed data and duplicate ids.
fn parse_snapshot(raw: &str) -> Result<Vec<Account>> {
    let corrupt = |detail: String| Error::CorruptState {
        key: STORAGE_KEY.to_string(),
        detail,
    };

    let accounts: Vec<Account> = serde_json::from_str(raw).map_err(|e| corrupt(e.to_string()))?;

    let mut seen = HashSet::with_capacity(accounts.len());
    for account in &accounts {
        if !seen.insert(account.id.as_str()) {
            return Err(corrupt(format!("duplicate account id {}", account.id)));
        }
    }

    Ok(accounts)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone)]
mod tests {
    use super::*;
    use crate::account::AccountType;
    use crate::storage::{MemoryStore, StorageError, StorageResult};

    /// Store whose writes always fail.
    #[derive(Default)]
    struct ReadOnlyStore {
        inner: MemoryStore,
    }

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }
    }

    fn stored(registry: &AccountRegistry<MemoryStore>) -> serde_json::Value {
        let raw = registry.store().get(STORAGE_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    mod add_tests {
        use super::*;

        #[test]
        fn adds_blank_ldap_account() {
            let mut registry = AccountRegistry::new(MemoryStore::new());
            let id = registry.add_account().unwrap();

            assert_eq!(registry.len(), 1);
            let account = &registry.accounts()[0];
            assert_eq!(account.id, id);
            assert_eq!(account.kind, AccountType::Ldap);
            assert!(!account.is_valid);
            assert_eq!(account.password, None);
            assert!(account.labels.is_empty());
            assert!(account.login.is_empty());
        }

        #[test]
        fn add_writes_snapshot() {
            let mut registry = AccountRegistry::new(MemoryStore::new());
            let id = registry.add_account().unwrap();

            assert_eq!(registry.store().writes(), 1);
            assert_eq!(
                stored(&registry),
                serde_json::json!([{
                    "id": id.as_str(),
                    "labels": [],
                    "type": "LDAP",
                    "login": "",
                    "password": null,
                    "isValid": false
                }])
            );
        }

        #[test]
        fn preserves_insertion_order() {
            let mut registry = AccountRegistry::new(MemoryStore::new());
            let ids: Vec<_> = (0..3).map(|_| registry.add_account().unwrap()).collect();
            let listed: Vec<_> = registry.iter().map(|a| a.id.clone()).collect();
            assert_eq!(listed, ids);
        }

        #[test]
        fn failed_write_keeps_memory_change() {
            let mut registry = AccountRegistry::new(ReadOnlyStore::default());
            let result = registry.add_account();
            assert!(matches!(result, Err(Error::Storage(_))));
            assert_eq!(registry.len(), 1);
        }
    }

    mod delete_tests {
        use super::*;

        #[test]
        fn removes_only_matching() {
            let mut registry = AccountRegistry::new(MemoryStore::new());
            let a = registry.add_account().unwrap();
            let b = registry.add_account().unwrap();

            registry.delete_account(a.as_str()).unwrap();

            assert_eq!(registry.len(), 1);
            assert_eq!(registry.accounts()[0].id, b);
            assert_eq!(stored(&registry).as_array().unwrap().len(), 1);
        }

        #[test]
        fn delete_is_idempotent() {
            let mut registry = AccountRegistry::new(MemoryStore::new());
            let a = registry.add_account().unwrap();
            registry.add_account().unwrap();

            registry.delete_account(a.as_str()).unwrap();
            let after_first = registry.accounts().to_vec();
            let writes = registry.store().writes();

            registry.delete_account(a.as_str()).unwrap();
            assert_eq!(registry.accounts(), after_first.as_slice());
            assert_eq!(registry.store().writes(), writes);
        }

        #[test]
        fn unknown_id_is_noop() {
            let mut registry = AccountRegistry::new(MemoryStore::new());
            registry.delete_account("missing").unwrap();
            assert!(registry.is_empty());
            assert_eq!(registry.store().writes(), 0);
        }
    }

    mod edit_tests {
        use super::*;

        #[test]
        fn edit_persists_fields() {
            let mut registry = AccountRegistry::new(MemoryStore::new());
            let id = registry.add_account().unwrap();

            let found = registry
                .edit_account(
                    id.as_str(),
                    AccountEdit::new()
                        .login("alice")
                        .password("pw")
                        .labels(["a", "b"]),
                )
                .unwrap();

            assert!(found);
            assert_eq!(registry.store().writes(), 2);
            let value = stored(&registry);
            assert_eq!(value[0]["login"], "alice");
            assert_eq!(value[0]["password"], "pw");
            assert_eq!(value[0]["labels"], serde_json::json!(["a", "b"]));
        }

        #[test]
        fn unknown_id_reports_false() {
            let mut registry = AccountRegistry::new(MemoryStore::new());
            let found = registry
                .edit_account("missing", AccountEdit::new().valid(true))
                .unwrap();
            assert!(!found);
            assert_eq!(registry.store().writes(), 0);
        }
    }

    mod load_tests {
        use super::*;

        #[test]
        fn missing_value_leaves_memory_untouched() {
            let mut registry = AccountRegistry::new(MemoryStore::new());
            registry.add_account().unwrap();
            registry.store.remove(STORAGE_KEY);

            registry.load_from_storage().unwrap();
            assert_eq!(registry.len(), 1);
        }

        #[test]
        fn empty_value_is_treated_as_missing() {
            let mut registry = AccountRegistry::new(MemoryStore::with_entry(STORAGE_KEY, ""));
            registry.load_from_storage().unwrap();
            assert!(registry.is_empty());
        }

        #[test]
        fn replaces_memory_with_snapshot() {
            let store = MemoryStore::with_entry(
                STORAGE_KEY,
                r#"[{"id":"x","labels":["l"],"type":"LDAP","login":"bob","password":"pw","isValid":true}]"#,
            );
            let mut registry = AccountRegistry::new(store);
            registry.load_from_storage().unwrap();

            assert_eq!(registry.len(), 1);
            let account = registry.get("x").unwrap();
            assert_eq!(account.login, "bob");
            assert_eq!(account.password.as_deref(), Some("pw"));
            assert!(account.is_valid);
            assert_eq!(registry.store().writes(), 0);
        }

        #[test]
        fn load_replaces_existing_accounts() {
            let mut registry = AccountRegistry::new(MemoryStore::new());
            let a = registry.add_account().unwrap();
            let b = registry.add_account().unwrap();
            registry
                .store
                .set(
                    STORAGE_KEY,
                    r#"[{"id":"only","labels":[],"type":"LDAP","login":"zed","password":null,"isValid":false}]"#,
                )
                .unwrap();

            registry.load_from_storage().unwrap();

            assert_eq!(registry.len(), 1);
            assert_eq!(registry.accounts()[0].id, AccountId::new("only"));
            assert_eq!(registry.accounts()[0].login, "zed");
            assert!(registry.get(a.as_str()).is_none());
            assert!(registry.get(b.as_str()).is_none());
        }

        #[test]
        fn not_json_is_corrupt() {
            let mut registry =
                AccountRegistry::new(MemoryStore::with_entry(STORAGE_KEY, "not json"));
            let err = registry.load_from_storage().unwrap_err();
            assert!(matches!(err, Error::CorruptState { ref key, .. } if key == STORAGE_KEY));
        }

        #[test]
        fn corrupt_load_keeps_memory() {
            let mut registry = AccountRegistry::new(MemoryStore::new());
            let id = registry.add_account().unwrap();
            registry.store.set(STORAGE_KEY, "{\"id\":").unwrap();

            assert!(registry.load_from_storage().is_err());
            assert_eq!(registry.len(), 1);
            assert!(registry.get(id.as_str()).is_some());
        }

        #[test]
        fn duplicate_ids_are_corrupt() {
            let store = MemoryStore::with_entry(
                STORAGE_KEY,
                r#"[{"id":"x","type":"LDAP"},{"id":"x","type":"LDAP"}]"#,
            );
            let result = AccountRegistry::open(store);
            assert!(matches!(result, Err(Error::CorruptState { .. })));
        }

        #[test]
        fn wrong_shape_is_corrupt() {
            let store = MemoryStore::with_entry(STORAGE_KEY, r#"{"accounts":[]}"#);
            let result = AccountRegistry::open(store);
            assert!(matches!(result, Err(Error::CorruptState { .. })));
        }
    }
}
