//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::BridgeConfig;
use super::secret::secret_string;
use crate::domain::errors::BridgeError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into BridgeConfig
/// 4. Applies environment variable overrides (CASEBRIDGE_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`BridgeError::Configuration`] if the file cannot be read, a
/// referenced variable is unset, parsing fails or validation fails.
///
/// # Examples
///
/// ```no_run
/// use casebridge::config::loader::load_config;
///
/// let config = load_config("casebridge.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<BridgeConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(BridgeError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        BridgeError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: BridgeConfig = toml::from_str(&contents)
        .map_err(|e| BridgeError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        BridgeError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| BridgeError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(BridgeError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using CASEBRIDGE_* prefix
///
/// Environment variables follow the pattern: CASEBRIDGE_<SECTION>_<KEY>
/// For example: CASEBRIDGE_DHIS2_BASE_URL, CASEBRIDGE_MAPPING_ROOT_ID
fn apply_env_overrides(config: &mut BridgeConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("CASEBRIDGE_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("CASEBRIDGE_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // DHIS2 overrides
    if let Ok(val) = std::env::var("CASEBRIDGE_DHIS2_BASE_URL") {
        config.dhis2.base_url = val;
    }
    if let Ok(val) = std::env::var("CASEBRIDGE_DHIS2_USERNAME") {
        config.dhis2.username = val;
    }
    if let Ok(val) = std::env::var("CASEBRIDGE_DHIS2_PASSWORD") {
        config.dhis2.password = secret_string(val);
    }

    // Go.Data overrides
    if let Ok(val) = std::env::var("CASEBRIDGE_GODATA_BASE_URL") {
        config.godata.base_url = val;
    }
    if let Ok(val) = std::env::var("CASEBRIDGE_GODATA_EMAIL") {
        config.godata.email = val;
    }
    if let Ok(val) = std::env::var("CASEBRIDGE_GODATA_PASSWORD") {
        config.godata.password = secret_string(val);
    }

    // Mapping overrides
    if let Ok(val) = std::env::var("CASEBRIDGE_MAPPING_ROOT_ID") {
        config.mapping.root_id = val;
    }
    if let Ok(val) = std::env::var("CASEBRIDGE_MAPPING_MAX_CONCURRENCY") {
        if let Ok(concurrency) = val.parse() {
            config.mapping.max_concurrency = concurrency;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("CASEBRIDGE_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("CASEBRIDGE_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("CB_LOADER_TEST_VAR", "test_value");
        let input = "password = \"${CB_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "password = \"test_value\"\n");
        std::env::remove_var("CB_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("CB_LOADER_MISSING_VAR");
        let input = "password = \"${CB_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("CB_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("CB_LOADER_COMMENTED_VAR");
        let input = "# password = \"${CB_LOADER_COMMENTED_VAR}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(BridgeError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "info"

[dhis2]
base_url = "https://play.dhis2.org/40"
username = "admin"
password = "district"

[godata]
base_url = "http://localhost:8000"
email = "admin@who.int"
password = "secret"

[mapping]
cases_program = "Case Based Surveillance"
root_id = "ImspTQPwCqd"

[mapping.program_stages]
clinical_examination = "Clinical examination and diagnosis"
lab_request = "Lab Request"
lab_results = "Lab Results"
symptoms = "Symptoms"

[[mapping.confirmed_test]]
element = "Lab Test Result"
value = "Positive"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.dhis2.base_url, "https://play.dhis2.org/40");
        assert_eq!(config.mapping.max_concurrency, 10);
        assert_eq!(config.mapping.confirmed_test.len(), 1);
        assert!(!config.logging.local_enabled);
    }
}
