//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Casebridge using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Casebridge - DHIS2 to Go.Data case copy
#[derive(Parser, Debug)]
#[command(name = "casebridge")]
#[command(version, about, long_about = None)]
#[command(author = "Casebridge Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "casebridge.toml", env = "CASEBRIDGE_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CASEBRIDGE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy DHIS2 tracked entities into Go.Data outbreak cases
    Copy(commands::copy::CopyArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
