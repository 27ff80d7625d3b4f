//! newsflow CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use newsflow_config::{load_config, AppConfig};
use newsflow_monitor::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // validate-config reports load errors itself
    if let Commands::ValidateConfig = cli.command {
        return cli::commands::validate::run(&cli.config).await;
    }

    let config = if cli.config.exists() {
        load_config(&cli.config)
            .with_context(|| format!("Failed to load config {}", cli.config.display()))?
    } else {
        AppConfig::default()
    };
    config.validate()?;

    // Setup logging
    let level = cli
        .log_level
        .map(|l| l.as_str().to_string())
        .unwrap_or_else(|| config.logging.level.clone());
    let json = cli.json_logs || config.logging.is_json();
    let _guard = setup_logging(&level, json, config.logging.file.as_deref())
        .context("Failed to initialise logging")?;

    if !cli.config.exists() {
        tracing::warn!(
            path = %cli.config.display(),
            "Config file not found, using defaults"
        );
    }

    // Execute command
    match cli.command {
        Commands::Run(args) => cli::commands::run::run(args, config).await,
        Commands::Indicators(args) => cli::commands::indicators::run(args, config).await,
        Commands::ValidateConfig => Ok(()),
    }
}
