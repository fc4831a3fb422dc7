//! Copy command implementation
//!
//! This module implements the `copy` command, which copies DHIS2 tracked
//! entities into Go.Data as outbreak cases.

use crate::config::load_config;
use crate::core::copy::{CopyCoordinator, CopySummary};
use crate::domain::CaseClassification;
use clap::Args;

/// Arguments for the copy command
#[derive(Args, Debug)]
pub struct CopyArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Run the full pipeline but don't create cases in Go.Data
    #[arg(long)]
    pub dry_run: bool,
}

impl CopyArgs {
    /// Execute the copy command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting copy command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(e.exit_code());
            }
        };

        let dry_run = self.dry_run || config.application.dry_run;
        if dry_run {
            tracing::info!("Dry run mode enabled - no cases will be created");
            println!("🔍 DRY RUN MODE - No cases will be created in Go.Data");
            println!();
        }

        if !self.yes && !dry_run {
            println!("Copy Configuration:");
            println!("  DHIS2: {}", config.dhis2.base_url);
            println!("  Go.Data: {}", config.godata.base_url);
            println!("  Program: {}", config.mapping.cases_program);
            println!("  Root organisation unit: {}", config.mapping.root_id);
            println!();
            print!("Proceed with copy? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Copy cancelled.");
                return Ok(0);
            }
        }

        let coordinator = match CopyCoordinator::new(config, dry_run) {
            Ok(c) => c,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to create copy coordinator");
                eprintln!("Failed to initialize copy: {e}");
                return Ok(e.exit_code());
            }
        };

        println!("🚀 Starting copy...");
        println!();

        let summary = match coordinator.run().await {
            Ok(s) => s,
            Err(e) => {
                crate::log_error_with_context!(&e, "Copy failed");
                eprintln!("Copy failed: {e}");
                return Ok(e.exit_code());
            }
        };

        summary.log_summary();
        print_summary(&summary);

        Ok(0)
    }
}

fn print_summary(summary: &CopySummary) {
    println!();
    println!("📊 Copy Summary:");
    println!(
        "  Started: {}",
        summary.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("  Tracked entities: {}", summary.total_entities);
    println!(
        "  Confirmed: {}",
        summary.count(CaseClassification::Confirmed)
    );
    println!("  Probable: {}", summary.count(CaseClassification::Probable));
    println!("  Suspect: {}", summary.count(CaseClassification::Suspect));
    println!(
        "  Discarded: {}",
        summary.count(CaseClassification::NotACaseDiscarded)
    );
    println!("  Outbreaks: {}", summary.by_outbreak.len());
    for (outbreak, count) in &summary.by_outbreak {
        println!("    - {outbreak}: {count}");
    }
    println!("  Cases sent: {}", summary.cases_sent);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    if summary.dry_run {
        println!(
            "✅ Dry run completed, {} cases would have been sent",
            summary.total_cases()
        );
    } else {
        println!("✅ Copy completed successfully!");
    }
}
