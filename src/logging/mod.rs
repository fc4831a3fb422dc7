//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output filtered by level or `RUST_LOG`
//! - Optional JSON log files with daily or hourly rotation
//!
//! # Example
//!
//! ```no_run
//! use casebridge::logging::init_logging;
//! use casebridge::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! tracing::error!(error = "Something went wrong", "Error occurred");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a copy run
///
/// # Example
///
/// ```no_run
/// use casebridge::log_copy_start;
/// use casebridge::domain::OrgUnitId;
///
/// let root = OrgUnitId::new("ImspTQPwCqd").unwrap();
/// log_copy_start!(&root, false);
/// ```
#[macro_export]
macro_rules! log_copy_start {
    ($root:expr, $dry_run:expr) => {
        tracing::info!(
            root = %$root,
            dry_run = $dry_run,
            "Starting case copy"
        );
    };
}

/// Log the completion of a copy run
///
/// # Example
///
/// ```no_run
/// use casebridge::log_copy_complete;
/// use std::time::Duration;
///
/// log_copy_complete!(42, Duration::from_secs(10));
/// ```
#[macro_export]
macro_rules! log_copy_complete {
    ($count:expr, $duration:expr) => {
        tracing::info!(
            count = $count,
            duration_ms = $duration.as_millis() as u64,
            "Case copy completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use casebridge::log_error_with_context;
/// use casebridge::domain::BridgeError;
///
/// let error = BridgeError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log progress through the outbreak groups being sent
///
/// # Example
///
/// ```no_run
/// use casebridge::log_group_progress;
/// use casebridge::domain::OutbreakId;
///
/// let outbreak = OutbreakId::new("b5a0ba2d").unwrap();
/// log_group_progress!(&outbreak, 1, 3, 25);
/// ```
#[macro_export]
macro_rules! log_group_progress {
    ($outbreak:expr, $current:expr, $total:expr, $cases:expr) => {
        tracing::info!(
            outbreak = %$outbreak,
            group = $current,
            groups = $total,
            cases = $cases,
            "Sending outbreak group"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use casebridge::log_retry_attempt;
///
/// log_retry_attempt!(2, 3, "Connection timeout");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            reason = %$reason,
            "Retrying request"
        );
    };
}
