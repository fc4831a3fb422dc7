//! Validate config command implementation
//!
//! This module implements the `validate-config` command. It loads and
//! validates the configuration file without contacting DHIS2 or Go.Data.

use crate::config::load_config;
use crate::domain::StageRole;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(e.exit_code());
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  DHIS2 Server: {}", config.dhis2.base_url);
        println!("  DHIS2 User: {}", config.dhis2.username);
        println!("  Go.Data Server: {}", config.godata.base_url);
        println!("  Go.Data User: {}", config.godata.email);
        println!("  Cases Program: {}", config.mapping.cases_program);
        println!("  Root Organisation Unit: {}", config.mapping.root_id);
        println!("  Max Concurrency: {}", config.mapping.max_concurrency);
        println!("  Program Stages:");
        for role in StageRole::ALL {
            println!(
                "    {}: {}",
                role,
                config.mapping.program_stages.name_for(role)
            );
        }
        println!("  Confirmed Test Conditions:");
        for condition in &config.mapping.confirmed_test {
            println!("    {} = {}", condition.element, condition.value);
        }
        if !config.mapping.case_attributes.is_empty() {
            println!("  Case Attributes:");
            for (field, attribute) in &config.mapping.case_attributes {
                println!("    {field} <- {attribute}");
            }
        }
        println!();

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_invalid_toml_returns_config_exit_code() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[dhis2\nbase_url = ").unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_sample_config_is_valid() {
        let mut file = NamedTempFile::new().unwrap();
        let sample = crate::cli::commands::init::sample_config()
            .replace("${CASEBRIDGE_DHIS2_PASSWORD}", "district")
            .replace("${CASEBRIDGE_GODATA_PASSWORD}", "secret");
        file.write_all(sample.as_bytes()).unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }
}
