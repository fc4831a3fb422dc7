//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "casebridge.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

/// Sample configuration written by `init`
pub fn sample_config() -> &'static str {
    r#"# Casebridge Configuration File
# Copies DHIS2 tracked entities into Go.Data outbreak cases

[application]
log_level = "info"
dry_run = false

[dhis2]
base_url = "https://dhis2.example.org"
username = "casebridge"
password = "${CASEBRIDGE_DHIS2_PASSWORD}"
timeout_seconds = 60
tls_verify = true

[dhis2.retry]
max_retries = 3
initial_delay_ms = 1000
max_delay_ms = 30000
backoff_multiplier = 2.0

[godata]
base_url = "https://godata.example.org"
email = "casebridge@example.org"
password = "${CASEBRIDGE_GODATA_PASSWORD}"
timeout_seconds = 60
tls_verify = true

[mapping]
# Display name of the tracker program holding the cases
cases_program = "Case Based Surveillance"
# Organisation unit id at the top of the subtree to copy
root_id = "ImspTQPwCqd"
max_concurrency = 10

# Display names of the program stages
[mapping.program_stages]
clinical_examination = "Clinical examination and diagnosis"
lab_request = "Lab Request"
lab_results = "Lab Results"
symptoms = "Symptoms"

# All conditions must hold for a POSITIVE lab result
[[mapping.confirmed_test]]
element = "Lab Test Result"
value = "Positive"

# Go.Data case field = DHIS2 attribute display name
[mapping.case_attributes]
firstName = "First name"
lastName = "Surname"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"  # daily | hourly
"#
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Casebridge configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, sample_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - Set CASEBRIDGE_DHIS2_PASSWORD");
                println!("     - Set CASEBRIDGE_GODATA_PASSWORD");
                println!("  3. Validate configuration: casebridge validate-config");
                println!("  4. Try a dry run: casebridge copy --dry-run");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }
}
