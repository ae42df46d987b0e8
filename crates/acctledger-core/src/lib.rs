//! # acctledger-core
//!
//! Core logic for `acctledger`, a small local account registry.
//!
//! This crate provides:
//! - The account model (id, labels, type, login, optional password, validity flag)
//! - [`AccountRegistry`], an ordered account list that writes a full JSON
//!   snapshot to its store after every mutation
//! - Storage backends: in-memory, file and system keyring
//! - Persistent settings
//!
//! # Example
//!
//! ```
//! use acctledger_core::{AccountEdit, AccountRegistry, MemoryStore};
//!
//! let mut registry = AccountRegistry::open(MemoryStore::new())?;
//! let id = registry.add_account()?;
//! registry.edit_account(id.as_str(), AccountEdit::new().login("alice"))?;
//! assert_eq!(registry.get(id.as_str()).map(|a| a.login.as_str()), Some("alice"));
//! # Ok::<(), acctledger_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod account;
pub mod config;
mod error;
pub mod storage;

pub use account::{
    Account, AccountEdit, AccountId, AccountRegistry, AccountType, STORAGE_KEY, SharedRegistry,
};
pub use config::{Backend, Settings};
pub use error::{Error, Result};
pub use storage::{FileStore, KeyValueStore, KeyringStore, MemoryStore, StorageError};
