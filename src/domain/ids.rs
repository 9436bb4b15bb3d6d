//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers that flow through an export run, so a
//! log group name can never be passed where a bucket or task id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hierarchy separator used inside log source identifiers
pub const SOURCE_SEPARATOR: char = '/';

/// Log source identifier
///
/// A hierarchical, slash-delimited name such as `/aws/ecs/app-a`. The export
/// engine treats it as opaque apart from separator replacement when building
/// destination paths.
///
/// # Examples
///
/// ```
/// use logvault::domain::ids::SourceId;
/// use std::str::FromStr;
///
/// let source = SourceId::from_str("/aws/ecs/app-a").unwrap();
/// assert!(source.is_hierarchical());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceId(String);

impl SourceId {
    /// Creates a new SourceId, rejecting blank identifiers
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Source identifier cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier contains a hierarchy separator
    pub fn is_hierarchical(&self) -> bool {
        self.0.contains(SOURCE_SEPARATOR)
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SourceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SourceId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SourceId> for String {
    fn from(id: SourceId) -> Self {
        id.0
    }
}

impl AsRef<str> for SourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Export task identifier assigned by the log service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(String);

impl TaskId {
    /// Creates a new TaskId
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Task ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the task ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Destination bucket name
///
/// Validated against the basic S3 naming rules: 3 to 63 characters of
/// lowercase letters, digits, dots and hyphens, starting and ending with a
/// letter or digit.
///
/// # Examples
///
/// ```
/// use logvault::domain::ids::BucketName;
///
/// assert!(BucketName::new("cw-logroup-to-s3").is_ok());
/// assert!(BucketName::new("Invalid_Bucket").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BucketName(String);

impl BucketName {
    /// Creates a new BucketName
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();

        if !(3..=63).contains(&name.len()) {
            return Err(format!(
                "Bucket name must be between 3 and 63 characters, got {}",
                name.len()
            ));
        }

        let valid_chars = name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.');
        if !valid_chars {
            return Err(format!(
                "Bucket name '{name}' may only contain lowercase letters, digits, '.' and '-'"
            ));
        }

        let edges_ok = name
            .chars()
            .next()
            .zip(name.chars().last())
            .map(|(first, last)| first.is_ascii_alphanumeric() && last.is_ascii_alphanumeric())
            .unwrap_or(false);
        if !edges_ok {
            return Err(format!(
                "Bucket name '{name}' must start and end with a letter or digit"
            ));
        }

        Ok(Self(name))
    }

    /// Returns the bucket name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BucketName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
