//! Domain error types
//!
//! This module defines the error hierarchy for Logvault. Adapter errors are
//! expressed in domain terms and never expose HTTP client types.

use thiserror::Error;

/// Main Logvault error type
///
/// Errors of this type abort a whole run. Failures confined to a single
/// source's export pipeline are reported as values in the export report
/// instead (see [`crate::core::export::SourceFailure`]).
#[derive(Debug, Error)]
pub enum LogvaultError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Listing the available log sources failed
    #[error("Source enumeration error: {0}")]
    SourceEnumeration(String),

    /// No log source matched the inclusion list
    #[error("{message} ({available} sources available, {} requested)", .requested.len())]
    NoEligibleSources {
        /// Human readable description
        message: String,
        /// Number of sources returned by enumeration
        available: usize,
        /// Inclusion list that produced the empty result
        requested: Vec<String>,
    },

    /// Log service errors
    #[error("Log service error: {0}")]
    LogService(#[from] LogServiceError),

    /// Object store errors
    #[error("Object store error: {0}")]
    ObjectStore(#[from] ObjectStoreError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Request signing errors
    #[error("Signing error: {0}")]
    Signing(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Log service errors
///
/// Errors that occur when talking to the log-management service.
#[derive(Debug, Clone, Error)]
pub enum LogServiceError {
    /// Failed to reach the service
    #[error("Failed to connect to log service: {0}")]
    ConnectionFailed(String),

    /// The service rejected the request
    #[error("{code}: {message}")]
    Rejected { code: String, message: String },

    /// The service answered with something we could not interpret
    #[error("Invalid response from log service: {0}")]
    InvalidResponse(String),

    /// The export task is unknown to the service
    #[error("Export task not found: {0}")]
    TaskNotFound(String),
}

/// Object store errors
///
/// The existence guard does not distinguish an absent bucket from an
/// unreachable one; callers treat every variant as "do not proceed".
#[derive(Debug, Clone, Error)]
pub enum ObjectStoreError {
    /// The bucket does not exist
    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    /// The bucket exists but we may not use it
    #[error("Access denied to bucket: {0}")]
    AccessDenied(String),

    /// Any other failure
    #[error("Object store request failed: {0}")]
    RequestFailed(String),
}

impl From<std::io::Error> for LogvaultError {
    fn from(err: std::io::Error) -> Self {
        LogvaultError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LogvaultError {
    fn from(err: serde_json::Error) -> Self {
        LogvaultError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for LogvaultError {
    fn from(err: toml::de::Error) -> Self {
        LogvaultError::Configuration(format!("TOML parse error: {err}"))
    }
}
