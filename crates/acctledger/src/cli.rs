//! CLI argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use acctledger_core::Backend;

/// acctledger - keep a local list of directory accounts.
#[derive(Debug, Parser)]
#[command(name = "acctledger")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (defaults to the platform config directory).
    #[arg(long, env = "ACCTLEDGER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Storage backend (overrides settings).
    #[arg(long, value_enum, env = "ACCTLEDGER_BACKEND")]
    pub backend: Option<BackendArg>,

    /// Data directory for the file backend (overrides settings).
    #[arg(long, env = "ACCTLEDGER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Storage backend choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BackendArg {
    /// JSON file in the data directory.
    File,
    /// System keyring.
    Keyring,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::File => Self::File,
            BackendArg::Keyring => Self::Keyring,
        }
    }
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all accounts.
    List,

    /// Add a new LDAP account.
    Add(FieldArgs),

    /// Show one account.
    Show {
        /// Account id.
        id: String,
    },

    /// Change fields of an account.
    Edit {
        /// Account id.
        id: String,

        #[command(flatten)]
        fields: FieldArgs,

        /// Remove the stored password.
        #[arg(long, conflicts_with = "password")]
        clear_password: bool,

        /// Remove all labels.
        #[arg(long, conflicts_with = "labels")]
        clear_labels: bool,

        /// Mark the account as verified (true) or unverified (false).
        #[arg(long)]
        valid: Option<bool>,
    },

    /// Delete an account. Unknown ids are ignored.
    Delete {
        /// Account id.
        id: String,
    },

    /// Print the stored snapshot as JSON.
    Export,
}

/// Account fields settable from the command line.
#[derive(Default, clap::Args)]
pub struct FieldArgs {
    /// Login name.
    #[arg(long)]
    pub login: Option<String>,

    /// Password.
    #[arg(long)]
    pub password: Option<String>,

    /// Label (repeat for several; replaces existing labels).
    #[arg(long = "label")]
    pub labels: Vec<String>,
}

impl std::fmt::Debug for FieldArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldArgs")
            .field("login", &self.login)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("labels", &self.labels)
            .finish()
    }
}
