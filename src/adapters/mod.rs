//! External system integrations for Logvault.
//!
//! - [`traits`] - boundary traits the export engine depends on
//! - [`aws`] - credential resolution and SigV4 request signing
//! - [`cloudwatch`] - CloudWatch Logs export tasks and log group enumeration
//! - [`s3`] - destination bucket existence guard
//!
//! # Design Pattern
//!
//! Adapters isolate the AWS wire protocols behind the traits in [`traits`],
//! so the export engine can be tested with in-memory implementations.
//!
//! ```rust,no_run
//! use logvault::adapters::cloudwatch::CloudWatchLogsClient;
//! use logvault::adapters::s3::S3BucketGuard;
//! use logvault::config::load_config;
//!
//! # fn example() -> logvault::domain::Result<()> {
//! let config = load_config("logvault.toml")?;
//! let logs = CloudWatchLogsClient::from_config(&config)?;
//! let guard = S3BucketGuard::from_config(&config)?;
//! # Ok(())
//! # }
//! ```

pub mod aws;
pub mod cloudwatch;
pub mod s3;
pub mod traits;
