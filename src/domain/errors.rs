//! Domain error types
//!
//! This module defines the error hierarchy for Casebridge. Every failure aborts
//! the current run, so the variants exist to tell the operator *what* went
//! wrong and *which* record was involved, not to drive recovery.
//! Errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Casebridge error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Configuration-related errors (file, parsing, validation)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A configured display name has no matching identifier
    #[error("Could not resolve {kind} '{name}' to an identifier")]
    ConfigResolution { kind: &'static str, name: String },

    /// Organisation unit or outbreak resolution failed
    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// DHIS2 transport errors
    #[error("DHIS2 error: {0}")]
    Dhis2(#[from] Dhis2Error),

    /// Go.Data transport errors
    #[error("Go.Data error: {0}")]
    GoData(#[from] GoDataError),

    /// A record is missing expected fields
    #[error("Malformed record {record}: {message}")]
    MalformedRecord { record: String, message: String },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl BridgeError {
    /// Shorthand for a [`BridgeError::MalformedRecord`]
    pub fn malformed(record: impl Into<String>, message: impl Into<String>) -> Self {
        BridgeError::MalformedRecord {
            record: record.into(),
            message: message.into(),
        }
    }

    /// True for failures talking to either remote system
    pub fn is_transport(&self) -> bool {
        matches!(self, BridgeError::Dhis2(_) | BridgeError::GoData(_))
    }

    /// Process exit code reported by the CLI for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            BridgeError::Configuration(_) => 2,
            BridgeError::ConfigResolution { .. } | BridgeError::Lookup(_) => 3,
            BridgeError::Dhis2(_) | BridgeError::GoData(_) => 4,
            _ => 5,
        }
    }
}

/// Outbreak lookup errors
///
/// Raised by the outbreak assigner when walking the organisation unit tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The walk reached an id that is not in the loaded organisation units
    #[error("Organisation unit {org_unit} not found (while resolving {start})")]
    UnknownOrganisationUnit { start: String, org_unit: String },

    /// The walk reached a root without matching any outbreak location
    #[error("No outbreak covers organisation unit {start} or any of its ancestors (root {root})")]
    NoOutbreak { start: String, root: String },

    /// The parent chain loops back on itself
    #[error("Cycle in organisation unit hierarchy at {org_unit} (while resolving {start})")]
    Cycle { start: String, org_unit: String },
}

/// DHIS2-specific errors
///
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum Dhis2Error {
    /// Failed to connect to DHIS2
    #[error("Failed to connect to DHIS2: {0}")]
    ConnectionFailed(String),

    /// Authentication failed (401/403)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Invalid response from server
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },
}

/// Go.Data-specific errors
#[derive(Debug, Error)]
pub enum GoDataError {
    /// Failed to connect to Go.Data
    #[error("Failed to connect to Go.Data: {0}")]
    ConnectionFailed(String),

    /// Login rejected
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Invalid response from server
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },
}

// Conversion from std::io::Error
impl From<std::io::Error> for BridgeError {
    fn from(err: std::io::Error) -> Self {
        BridgeError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for BridgeError {
    fn from(err: toml::de::Error) -> Self {
        BridgeError::Configuration(format!("TOML parse error: {err}"))
    }
}
