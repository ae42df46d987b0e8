//! `acctledger` - command-line front end for the local account registry.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use acctledger_core::{AccountRegistry, Settings};

use cli::Cli;

fn main() -> Result<()> {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "acctledger=info,acctledger_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let settings_path = cli.config.clone().unwrap_or_else(Settings::default_path);
    let mut settings = Settings::load_from(&settings_path)
        .with_context(|| format!("Failed to load settings from {}", settings_path.display()))?;
    if let Some(backend) = cli.backend {
        settings.backend = backend.into();
    }
    if let Some(dir) = cli.data_dir {
        settings.data_dir = Some(dir);
    }

    info!("Using {} storage", settings.backend.as_str());
    let mut registry =
        AccountRegistry::open(settings.open_store()).context("Failed to load accounts")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(cli.command, &mut registry, &mut out)
}
