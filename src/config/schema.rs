//! Configuration schema types
//!
//! This module defines the configuration structure that maps to the TOML file.

use crate::config::SecretString;
use crate::domain::ids::{BucketName, SourceId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retention window length used when none (or zero) is configured
pub const DEFAULT_RETENTION_DAYS: u32 = 90;

/// Per-task poll budget used when none (or zero) is configured
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30_000;

/// Largest accepted poll budget; the doubling backoff must be able to exceed it
pub const MAX_TIMEOUT_SECONDS: u64 = u64::MAX / 2;

/// Main Logvault configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogvaultConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// AWS connection settings
    #[serde(default)]
    pub aws: AwsConfig,

    /// Export settings
    pub export: ExportConfig,

    /// Which log sources to export
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LogvaultConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.aws.validate()?;
        self.export.validate()?;
        self.sources.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (plan the export without submitting tasks)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// AWS connection configuration
///
/// Credentials and region are optional here; the standard `AWS_*`
/// environment variables are consulted when a value is absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    /// AWS region (e.g. "us-east-1")
    #[serde(default)]
    pub region: Option<String>,

    /// Access key id
    #[serde(default)]
    pub access_key_id: Option<String>,

    /// Secret access key
    #[serde(default)]
    pub secret_access_key: Option<SecretString>,

    /// Session token for temporary credentials
    #[serde(default)]
    pub session_token: Option<SecretString>,

    /// Override for the CloudWatch Logs endpoint
    #[serde(default)]
    pub logs_endpoint: Option<String>,

    /// Override for the S3 endpoint (switches to path-style addressing)
    #[serde(default)]
    pub s3_endpoint: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

impl AwsConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(region) = &self.region {
            if region.trim().is_empty() {
                return Err("aws.region cannot be empty when set".to_string());
            }
        }

        for (name, endpoint) in [
            ("aws.logs_endpoint", &self.logs_endpoint),
            ("aws.s3_endpoint", &self.s3_endpoint),
        ] {
            if let Some(endpoint) = endpoint {
                if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                    return Err(format!("{name} must start with http:// or https://"));
                }
            }
        }

        if self.request_timeout_seconds == 0 {
            return Err("aws.request_timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }

    /// Request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: None,
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            logs_endpoint: None,
            s3_endpoint: None,
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Bucket that receives the exported log data
    pub destination_bucket: String,

    /// Days between "now" and the end of the exported day.
    /// Absent or zero means [`DEFAULT_RETENTION_DAYS`].
    #[serde(default)]
    pub retention_days: Option<u32>,

    /// Backoff value past which a still-running task is reported as timed out.
    /// Absent or zero means [`DEFAULT_TIMEOUT_SECONDS`].
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// First wait between submitting a task and polling it; doubles each poll
    #[serde(default = "default_initial_backoff_seconds")]
    pub initial_backoff_seconds: u64,

    /// Stop polling as soon as the service reports FAILED or CANCELLED
    /// instead of waiting out the timeout
    #[serde(default)]
    pub fail_fast_on_terminal_status: bool,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        BucketName::new(self.destination_bucket.clone())
            .map_err(|e| format!("export.destination_bucket is invalid: {e}"))?;

        if self.initial_backoff_seconds == 0 {
            return Err("export.initial_backoff_seconds must be > 0".to_string());
        }

        if self.effective_timeout_seconds() > MAX_TIMEOUT_SECONDS {
            return Err(format!(
                "export.timeout_seconds must be at most {MAX_TIMEOUT_SECONDS}"
            ));
        }

        Ok(())
    }

    /// Retention days with the zero/absent default applied
    pub fn effective_retention_days(&self) -> u32 {
        match self.retention_days {
            Some(days) if days > 0 => days,
            _ => DEFAULT_RETENTION_DAYS,
        }
    }

    /// Poll timeout with the zero/absent default applied
    pub fn effective_timeout_seconds(&self) -> u64 {
        match self.timeout_seconds {
            Some(secs) if secs > 0 => secs,
            _ => DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

/// Source selection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Exact source identifiers to export
    #[serde(default)]
    pub include: Vec<String>,

    /// Every source whose identifier starts with this prefix is also exported
    #[serde(default)]
    pub prefix: Option<String>,

    /// Page size used when listing sources
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl SourcesConfig {
    fn validate(&self) -> Result<(), String> {
        let has_prefix = self
            .prefix
            .as_ref()
            .map(|p| !p.trim().is_empty())
            .unwrap_or(false);

        if self.include.is_empty() && !has_prefix {
            return Err(
                "sources.include cannot be empty unless sources.prefix is set".to_string(),
            );
        }

        for id in &self.include {
            SourceId::new(id.clone()).map_err(|e| format!("sources.include: {e}"))?;
        }

        if !(1..=50).contains(&self.page_size) {
            return Err(format!(
                "sources.page_size must be between 1 and 50, got {}",
                self.page_size
            ));
        }

        Ok(())
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            prefix: None,
            page_size: default_page_size(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout_seconds() -> u64 {
    30
}

fn default_initial_backoff_seconds() -> u64 {
    2
}

fn default_page_size() -> u32 {
    50
}

fn default_local_path() -> String {
    "/var/log/logvault".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
