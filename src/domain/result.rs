//! Result type alias for Spacedump
//!
//! This module provides a convenient Result type alias that uses SpacedumpError
//! as the error type.

use super::errors::SpacedumpError;

/// Result type alias for Spacedump operations
///
/// # Examples
///
/// ```
/// use spacedump::domain::result::Result;
/// use spacedump::domain::errors::SpacedumpError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SpacedumpError::Pipeline("client not initialised".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SpacedumpError>;
