//! Configuration management for Logvault.
//!
//! # Overview
//!
//! Logvault reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `LOGVAULT_<SECTION>_<KEY>` overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level, dry run
//! - [`AwsConfig`] - region, credentials, endpoint overrides
//! - [`ExportConfig`] - destination bucket, retention window, poll timeout and backoff
//! - [`SourcesConfig`] - inclusion list and discovery prefix
//! - [`LoggingConfig`] - local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [aws]
//! region = "us-east-1"
//!
//! [export]
//! destination_bucket = "cw-logroup-to-s3"
//! retention_days = 1
//! timeout_seconds = 30000
//! initial_backoff_seconds = 2
//!
//! [sources]
//! include = ["/aws/ecs/app-a", "/aws/ecs/app-b"]
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, AwsConfig, ExportConfig, LoggingConfig, LogvaultConfig, SourcesConfig,
    DEFAULT_RETENTION_DAYS, DEFAULT_TIMEOUT_SECONDS, MAX_TIMEOUT_SECONDS,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
