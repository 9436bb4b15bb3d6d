//! Core business logic for Logvault.
//!
//! # Modules
//!
//! - [`export`] - The export engine: window calculation, submission, polling, fan-out
//! - [`sources`] - Selection of the log sources to export
//!
//! # Export Workflow
//!
//! 1. **Enumerate**: list every log group, following pagination
//! 2. **Select**: keep the groups named in the inclusion list (or under the prefix)
//! 3. **Fan out**: one pipeline per group, all running concurrently
//! 4. **Per group**: compute the window and path, check the bucket, create the
//!    export task, poll it with exponential backoff
//! 5. **Report**: one outcome per group
//!
//! # Example
//!
//! ```rust,no_run
//! use logvault::config::load_config;
//! use logvault::core::export::ExportCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("logvault.toml")?;
//! let coordinator = ExportCoordinator::from_config(config)?;
//!
//! let report = coordinator.execute_export().await?;
//! println!("{}", report.message);
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod sources;
