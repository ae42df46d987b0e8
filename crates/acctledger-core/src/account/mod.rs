//! Account management module.
//!
//! Provides the account model, the persisted registry, and a shared handle
//! for multi-threaded callers.

mod model;
mod registry;
mod shared;

pub use model::{Account, AccountEdit, AccountId, AccountType};
pub use registry::{AccountRegistry, STORAGE_KEY};
pub use shared::SharedRegistry;
