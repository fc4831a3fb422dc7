//! Configuration management for Casebridge.
//!
//! # Overview
//!
//! Casebridge uses a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `CASEBRIDGE_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and dry-run switch
//! - [`Dhis2Config`] - DHIS2 connection and basic auth credentials
//! - [`GoDataConfig`] - Go.Data connection and login credentials
//! - [`MappingConfig`] - Program, stage, lab condition and attribute names
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [dhis2]
//! base_url = "https://dhis2.example.org"
//! username = "casebridge"
//! password = "${CASEBRIDGE_DHIS2_PASSWORD}"
//!
//! [godata]
//! base_url = "https://godata.example.org"
//! email = "casebridge@example.org"
//! password = "${CASEBRIDGE_GODATA_PASSWORD}"
//!
//! [mapping]
//! cases_program = "Case Based Surveillance"
//! root_id = "ImspTQPwCqd"
//!
//! [mapping.program_stages]
//! clinical_examination = "Clinical examination and diagnosis"
//! lab_request = "Lab Request"
//! lab_results = "Lab Results"
//! symptoms = "Symptoms"
//!
//! [[mapping.confirmed_test]]
//! element = "Lab Test Result"
//! value = "Positive"
//!
//! [mapping.case_attributes]
//! firstName = "First name"
//! lastName = "Surname"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, BridgeConfig, ConfirmedTestCondition, Dhis2Config, GoDataConfig,
    LoggingConfig, MappingConfig, ProgramStagesConfig, RetryConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
