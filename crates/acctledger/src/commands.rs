//! Command execution.

use std::io::Write;

use anyhow::{Context, Result, bail};
use tracing::debug;

use acctledger_core::{Account, AccountEdit, AccountRegistry, KeyValueStore};

use crate::cli::{Command, FieldArgs};

/// Run one command against an already loaded registry, writing output to `out`.
///
/// # Errors
///
/// Returns an error if the registry cannot persist, the id is unknown
/// (for `show` and `edit`), or output cannot be written.
pub fn run<S: KeyValueStore, W: Write>(
    command: Command,
    registry: &mut AccountRegistry<S>,
    out: &mut W,
) -> Result<()> {
    debug!("Running {command:?}");
    match command {
        Command::List => list(registry, out),
        Command::Add(fields) => {
            let id = registry.add_account().context("Failed to add account")?;
            let edit = field_edit(fields);
            if !edit.is_empty() {
                registry
                    .edit_account(id.as_str(), edit)
                    .context("Failed to save account fields")?;
            }
            writeln!(out, "{id}")?;
            Ok(())
        }
        Command::Show { id } => {
            let Some(account) = registry.get(&id) else {
                bail!("No account with id {id}");
            };
            show(account, out)
        }
        Command::Edit {
            id,
            fields,
            clear_password,
            clear_labels,
            valid,
        } => {
            let mut edit = field_edit(fields);
            if clear_password {
                edit = edit.clear_password();
            }
            if clear_labels {
                edit = edit.labels(Vec::<String>::new());
            }
            if let Some(valid) = valid {
                edit = edit.valid(valid);
            }
            if edit.is_empty() {
                bail!("Nothing to change");
            }
            if !registry
                .edit_account(&id, edit)
                .context("Failed to save account")?
            {
                bail!("No account with id {id}");
            }
            Ok(())
        }
        Command::Delete { id } => registry
            .delete_account(&id)
            .context("Failed to delete account"),
        Command::Export => {
            let json = serde_json::to_string_pretty(registry.accounts())?;
            writeln!(out, "{json}")?;
            Ok(())
        }
    }
}

fn field_edit(fields: FieldArgs) -> AccountEdit {
    let mut edit = AccountEdit::new();
    if let Some(login) = fields.login {
        edit = edit.login(login);
    }
    if let Some(password) = fields.password {
        edit = edit.password(password);
    }
    if !fields.labels.is_empty() {
        edit = edit.labels(fields.labels);
    }
    edit
}

fn list<S: KeyValueStore, W: Write>(registry: &AccountRegistry<S>, out: &mut W) -> Result<()> {
    if registry.is_empty() {
        writeln!(out, "No accounts")?;
        return Ok(());
    }

    for account in registry {
        writeln!(
            out,
            "{}  {}  {}  [{}]  {}",
            account.id,
            account.kind,
            display_login(account),
            account.labels.join(", "),
            if account.is_valid { "valid" } else { "unverified" },
        )?;
    }
    Ok(())
}

fn show<W: Write>(account: &Account, out: &mut W) -> Result<()> {
    writeln!(out, "id:       {}", account.id)?;
    writeln!(out, "type:     {}", account.kind)?;
    writeln!(out, "login:    {}", display_login(account))?;
    writeln!(out, "password: {}", if account.has_password() { "set" } else { "unset" })?;
    writeln!(out, "labels:   {}", account.labels.join(", "))?;
    writeln!(out, "valid:    {}", account.is_valid)?;
    Ok(())
}

fn display_login(account: &Account) -> &str {
    if account.login.is_empty() {
        "-"
    } else {
        &account.login
    }
}
