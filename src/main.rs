// Casebridge - DHIS2 to Go.Data case copy
// Copyright (c) 2025 Casebridge Contributors
// Licensed under the MIT License

use casebridge::cli::{Cli, Commands};
use casebridge::config::{load_config, LoggingConfig};
use casebridge::logging::init_logging;
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // File logging settings come from the config file when it loads; a broken
    // config is reported by the command itself
    let (config_level, logging_config) = match &cli.command {
        Commands::Copy(_) => load_config(&cli.config)
            .map(|c| (Some(c.application.log_level), c.logging))
            .unwrap_or_else(|_| (None, LoggingConfig::default())),
        _ => (None, LoggingConfig::default()),
    };

    let log_level = cli
        .log_level
        .clone()
        .or(config_level)
        .unwrap_or_else(|| "info".to_string());

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(e.exit_code());
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Casebridge - DHIS2 to Go.Data case copy"
    );

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    // process::exit skips destructors, flush file logs first
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Copy(args) => args.execute(&cli.config).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
