//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Logvault using clap.

pub mod commands;

use crate::config::{load_config, LoggingConfig};
use clap::{Parser, Subcommand};

/// Log level used when neither the command line nor the config sets one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Logvault - CloudWatch Logs to S3 archival exporter
#[derive(Parser, Debug)]
#[command(name = "logvault")]
#[command(version, about, long_about = None)]
#[command(author = "Logvault Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "logvault.toml", env = "LOGVAULT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LOGVAULT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log level and logging sections to start the subscriber with
    ///
    /// `--log-level` wins over `application.log_level`. When the config
    /// cannot be loaded, console defaults are used and the command reports
    /// the load error itself.
    pub fn logging_settings(&self) -> (String, LoggingConfig) {
        let config = match &self.command {
            Commands::Init(_) => None,
            _ => load_config(&self.config).ok(),
        };

        match config {
            Some(config) => (
                self.log_level
                    .clone()
                    .unwrap_or(config.application.log_level),
                config.logging,
            ),
            None => (
                self.log_level
                    .clone()
                    .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
                LoggingConfig::default(),
            ),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export the selected log groups to the destination bucket
    Export(commands::export::ExportArgs),

    /// List the log groups an export would include
    Sources(commands::sources::SourcesArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
