//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers that address a space on the remote API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Space identifier newtype wrapper
///
/// # Examples
///
/// ```
/// use spacedump::domain::ids::SpaceId;
/// use std::str::FromStr;
///
/// let space_id = SpaceId::from_str("yadj1kx9rmg0").unwrap();
/// assert_eq!(space_id.as_str(), "yadj1kx9rmg0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpaceId(String);

impl SpaceId {
    /// Creates a new SpaceId, rejecting empty values and path separators
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Space ID cannot be empty".to_string());
        }
        if id.contains('/') || id.chars().any(char::is_whitespace) {
            return Err(format!("Invalid space ID '{id}'"));
        }
        Ok(Self(id))
    }

    /// Returns the space ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SpaceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for SpaceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Environment identifier newtype wrapper
///
/// Space-level resources (webhooks, roles) only exist on the `master`
/// environment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnvironmentId(String);

impl EnvironmentId {
    /// Name of the default environment
    pub const MASTER: &'static str = "master";

    /// Creates a new EnvironmentId
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Environment ID cannot be empty".to_string());
        }
        if id.contains('/') || id.chars().any(char::is_whitespace) {
            return Err(format!("Invalid environment ID '{id}'"));
        }
        Ok(Self(id))
    }

    /// Returns the environment ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the master environment
    pub fn is_master(&self) -> bool {
        self.0 == Self::MASTER
    }
}

impl Default for EnvironmentId {
    fn default() -> Self {
        Self(Self::MASTER.to_string())
    }
}

impl fmt::Display for EnvironmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EnvironmentId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for EnvironmentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_id_valid() {
        let id = SpaceId::new("abc123").unwrap();
        assert_eq!(id.as_str(), "abc123");
        assert_eq!(id.to_string(), "abc123");
    }

    #[test]
    fn test_space_id_invalid() {
        assert!(SpaceId::new("").is_err());
        assert!(SpaceId::new("   ").is_err());
        assert!(SpaceId::new("a/b").is_err());
        assert!(SpaceId::new("a b").is_err());
    }

    #[test]
    fn test_environment_id_master() {
        assert!(EnvironmentId::default().is_master());
        assert!(!EnvironmentId::new("staging").unwrap().is_master());
    }

    #[test]
    fn test_environment_id_from_str() {
        let env = EnvironmentId::from_str("qa").unwrap();
        assert_eq!(env.as_ref(), "qa");
        assert!(EnvironmentId::from_str("").is_err());
    }
}
