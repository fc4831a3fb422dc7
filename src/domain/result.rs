//! Result type alias for Casebridge

use super::errors::BridgeError;

/// Result type alias for Casebridge operations
///
/// # Examples
///
/// ```
/// use casebridge::domain::result::Result;
/// use casebridge::domain::errors::BridgeError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(BridgeError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, BridgeError>;
