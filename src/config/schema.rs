//! Configuration schema types
//!
//! This module defines the configuration structure for Casebridge. Values
//! under `[mapping]` are DHIS2 *display names*; they are resolved to ids once
//! per run by the resource loader.

use crate::config::SecretString;
use crate::domain::{CaseSubmission, StageRole};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Main Casebridge configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// DHIS2 (source) server configuration
    pub dhis2: Dhis2Config,

    /// Go.Data (destination) server configuration
    pub godata: GoDataConfig,

    /// Names used to find the cases program, stages and lab conditions
    pub mapping: MappingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BridgeConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.dhis2.validate()?;
        self.godata.validate()?;
        self.mapping.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode: run the pipeline but don't create cases in Go.Data
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per request
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    fn validate(&self, section: &str) -> Result<(), String> {
        if self.max_retries == 0 || self.max_retries > 10 {
            return Err(format!(
                "{section}.retry.max_retries must be between 1 and 10, got {}",
                self.max_retries
            ));
        }

        if self.backoff_multiplier < 1.0 {
            return Err(format!(
                "{section}.retry.backoff_multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            ));
        }

        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// DHIS2 server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dhis2Config {
    /// Base URL of the DHIS2 instance (without `/api`)
    pub base_url: String,

    /// Username for basic authentication
    pub username: String,

    /// Password for basic authentication
    pub password: SecretString,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TLS certificate verification
    ///
    /// Only disable for local test instances with self-signed certificates.
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Dhis2Config {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        validate_base_url("dhis2", &self.base_url)?;

        if self.username.is_empty() {
            return Err("dhis2.username cannot be empty".to_string());
        }

        if self.password.expose_secret().is_empty() {
            return Err("dhis2.password cannot be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("dhis2.timeout_seconds must be > 0".to_string());
        }

        self.retry.validate("dhis2")
    }
}

/// Go.Data server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoDataConfig {
    /// Base URL of the Go.Data instance (without `/api`)
    pub base_url: String,

    /// Login email
    pub email: String,

    /// Login password
    pub password: SecretString,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TLS certificate verification
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

impl GoDataConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        validate_base_url("godata", &self.base_url)?;

        if self.email.is_empty() {
            return Err("godata.email cannot be empty".to_string());
        }

        if self.password.expose_secret().is_empty() {
            return Err("godata.password cannot be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("godata.timeout_seconds must be > 0".to_string());
        }

        self.retry.validate("godata")
    }
}

fn validate_base_url(section: &str, url: &str) -> Result<(), String> {
    if url.is_empty() {
        return Err(format!("{section}.base_url cannot be empty"));
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(format!(
            "{section}.base_url must start with http:// or https://"
        ));
    }

    Ok(())
}

/// Mapping between DHIS2 metadata and Go.Data cases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Display name of the tracker program holding the cases
    pub cases_program: String,

    /// Organisation unit id at the top of the subtree to copy
    pub root_id: String,

    /// Maximum concurrent requests during loading and sending
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Display names of the four program stages
    pub program_stages: ProgramStagesConfig,

    /// Conditions that must all hold for a POSITIVE lab result
    #[serde(default)]
    pub confirmed_test: Vec<ConfirmedTestCondition>,

    /// Go.Data case field -> DHIS2 attribute display name
    #[serde(default)]
    pub case_attributes: IndexMap<String, String>,
}

impl MappingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.cases_program.trim().is_empty() {
            return Err("mapping.cases_program cannot be empty".to_string());
        }

        if self.root_id.trim().is_empty() {
            return Err("mapping.root_id cannot be empty".to_string());
        }

        if self.max_concurrency == 0 || self.max_concurrency > 100 {
            return Err(format!(
                "mapping.max_concurrency must be between 1 and 100, got {}",
                self.max_concurrency
            ));
        }

        self.program_stages.validate()?;

        if self.confirmed_test.is_empty() {
            return Err("mapping.confirmed_test must contain at least one condition".to_string());
        }

        for (index, condition) in self.confirmed_test.iter().enumerate() {
            if condition.element.trim().is_empty() {
                return Err(format!(
                    "mapping.confirmed_test[{index}].element cannot be empty"
                ));
            }
        }

        for (field, attribute) in &self.case_attributes {
            if CaseSubmission::RESERVED_FIELDS.contains(&field.as_str()) {
                return Err(format!(
                    "mapping.case_attributes.{field} clashes with a case field set by casebridge"
                ));
            }

            if attribute.trim().is_empty() {
                return Err(format!(
                    "mapping.case_attributes.{field} cannot be empty"
                ));
            }
        }

        Ok(())
    }
}

/// Display names of the program stages a case is built from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramStagesConfig {
    pub clinical_examination: String,
    pub lab_request: String,
    pub lab_results: String,
    pub symptoms: String,
}

impl ProgramStagesConfig {
    /// Configured display name for a stage role
    pub fn name_for(&self, role: StageRole) -> &str {
        match role {
            StageRole::ClinicalExamination => &self.clinical_examination,
            StageRole::LabRequest => &self.lab_request,
            StageRole::LabResults => &self.lab_results,
            StageRole::Symptoms => &self.symptoms,
        }
    }

    fn validate(&self) -> Result<(), String> {
        for role in StageRole::ALL {
            if self.name_for(role).trim().is_empty() {
                return Err(format!(
                    "mapping.program_stages entry for {role} cannot be empty"
                ));
            }
        }
        Ok(())
    }
}

/// A `(data element name, expected value)` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedTestCondition {
    /// Data element display name
    pub element: String,

    /// Value the data element must hold
    pub value: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily or hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err(
                "logging.local_path cannot be empty when local logging is enabled".to_string(),
            );
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_max_concurrency() -> usize {
    10
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
