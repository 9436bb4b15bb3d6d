// Logvault - CloudWatch Logs to S3 archival exporter
// Copyright (c) 2025 Logvault Contributors
// Licensed under the MIT License

//! # Logvault - CloudWatch Logs to S3 archival
//!
//! Logvault exports CloudWatch log groups into an S3 bucket, one export task
//! per log group, so logs can be kept past their CloudWatch retention.
//!
//! ## Overview
//!
//! One run of the exporter:
//! - **Selects** log groups from an inclusion list and an optional name prefix
//! - **Computes** one day-long window ending `retention_days` before now, shared by every export
//! - **Checks** that the destination bucket exists before each submission
//! - **Submits** one export task per log group under a dated object prefix
//! - **Polls** every task with a doubling backoff until it completes or the timeout is passed
//!
//! Log groups are processed concurrently; a failure in one never stops the others.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Export engine (window, submitter, poller, orchestrator)
//! - [`adapters`] - CloudWatch Logs and S3 clients behind boundary traits
//! - [`domain`] - Identifiers and error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use logvault::config::load_config;
//! use logvault::core::export::ExportCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("logvault.toml")?;
//!     let coordinator = ExportCoordinator::from_config(config)?;
//!
//!     let report = coordinator.execute_export().await?;
//!     println!("{}", report.message);
//!     Ok(())
//! }
//! ```
//!
//! ## Destination Layout
//!
//! Exported objects land under `<flattened-log-group>/<year>/<month>/<day>`,
//! where the date is the first day of the window and slashes in the log group
//! name become dashes:
//!
//! ```rust
//! use chrono::NaiveDate;
//! use logvault::core::export::compute_destination_path;
//! use logvault::domain::SourceId;
//!
//! let source = SourceId::new("/aws/ecs/app-a").unwrap();
//! let start = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
//! assert_eq!(compute_destination_path(&source, start), "aws-ecs-app-a/2024/2/28");
//! ```
//!
//! ## Error Handling
//!
//! Run-level failures use [`domain::LogvaultError`]. Per-log-group failures
//! never abort the run; they are recorded on the
//! [`core::export::TaskOutcome`] for that log group.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
