//! Account model types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque unique identifier for an account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Wrap an existing identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random identifier (UUID v4).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for AccountId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Authentication backend an account belongs to.
///
/// Only directory (LDAP) accounts exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AccountType {
    /// LDAP directory account.
    #[default]
    #[serde(rename = "LDAP")]
    Ldap,
}

impl AccountType {
    /// Wire name of the account type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ldap => "LDAP",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A credential record tracked by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique identifier, fixed at creation.
    pub id: AccountId,
    /// User-defined tags, in order. Duplicates are allowed.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Authentication backend.
    #[serde(rename = "type")]
    pub kind: AccountType,
    /// Login name (may be empty).
    #[serde(default)]
    pub login: String,
    /// Password, if one has been entered.
    #[serde(default)]
    pub password: Option<String>,
    /// Whether the account has been verified against its backend.
    #[serde(default)]
    pub is_valid: bool,
}

impl Account {
    /// Create a blank LDAP account with the given id.
    #[must_use]
    pub const fn new(id: AccountId) -> Self {
        Self {
            id,
            labels: Vec::new(),
            kind: AccountType::Ldap,
            login: String::new(),
            password: None,
            is_valid: false,
        }
    }

    /// Returns true if a password is present.
    #[must_use]
    pub const fn has_password(&self) -> bool {
        self.password.is_some()
    }

    /// Apply an edit to this account.
    pub fn apply(&mut self, edit: AccountEdit) {
        if let Some(labels) = edit.labels {
            self.labels = labels;
        }
        if let Some(login) = edit.login {
            self.login = login;
        }
        if let Some(password) = edit.password {
            self.password = password;
        }
        if let Some(is_valid) = edit.is_valid {
            self.is_valid = is_valid;
        }
    }
}

/// A patch over the mutable fields of an [`Account`].
///
/// Unset fields are left alone. The id cannot be edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountEdit {
    /// Replacement label list.
    pub labels: Option<Vec<String>>,
    /// Replacement login.
    pub login: Option<String>,
    /// `Some(None)` clears the password, `Some(Some(_))` sets it.
    pub password: Option<Option<String>>,
    /// Replacement verification flag.
    pub is_valid: Option<bool>,
}

impl AccountEdit {
    /// Create an empty edit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the labels.
    #[must_use]
    pub fn labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the login.
    #[must_use]
    pub fn login(mut self, login: impl Into<String>) -> Self {
        self.login = Some(login.into());
        self
    }

    /// Set the password.
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(Some(password.into()));
        self
    }

    /// Remove the password.
    #[must_use]
    pub fn clear_password(mut self) -> Self {
        self.password = Some(None);
        self
    }

    /// Set the verification flag.
    #[must_use]
    pub const fn valid(mut self, is_valid: bool) -> Self {
        self.is_valid = Some(is_valid);
        self
    }

    /// Returns true if the edit changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.labels.is_none()
            && self.login.is_none()
            && self.password.is_none()
            && self.is_valid.is_none()
    }
}
