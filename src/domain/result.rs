//! Result type alias for Logvault

use super::errors::LogvaultError;

/// Result type alias for Logvault operations
///
/// # Examples
///
/// ```
/// use logvault::domain::result::Result;
/// use logvault::domain::errors::LogvaultError;
///
/// fn failing_function() -> Result<()> {
///     Err(LogvaultError::Validation("Invalid input".to_string()))
/// }
///
/// assert!(failing_function().is_err());
/// ```
pub type Result<T> = std::result::Result<T, LogvaultError>;
