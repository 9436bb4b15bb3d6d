//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Logvault configuration file.

use super::{EXIT_CONFIG, EXIT_SUCCESS};
use crate::config::{load_config, LogvaultConfig};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        match load_config(config_path) {
            Ok(config) => {
                println!("✅ Configuration is valid");
                println!();
                print_summary(&config);
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                println!();
                Ok(EXIT_CONFIG)
            }
        }
    }
}

fn print_summary(config: &LogvaultConfig) {
    println!("Configuration Summary:");
    println!("  Log Level: {}", config.application.log_level);
    println!("  Dry Run: {}", config.application.dry_run);
    println!(
        "  AWS Region: {}",
        config.aws.region.as_deref().unwrap_or("(from environment)")
    );
    if let Some(endpoint) = &config.aws.logs_endpoint {
        println!("  Logs Endpoint: {endpoint}");
    }
    if let Some(endpoint) = &config.aws.s3_endpoint {
        println!("  S3 Endpoint: {endpoint}");
    }
    println!("  Destination Bucket: {}", config.export.destination_bucket);
    println!(
        "  Retention Days: {}",
        config.export.effective_retention_days()
    );
    println!(
        "  Poll Timeout: {}s (initial backoff {}s)",
        config.export.effective_timeout_seconds(),
        config.export.initial_backoff_seconds
    );
    println!(
        "  Fail Fast On Terminal Status: {}",
        config.export.fail_fast_on_terminal_status
    );
    println!("  Included Log Groups: {:?}", config.sources.include);
    if let Some(prefix) = &config.sources.prefix {
        println!("  Log Group Prefix: {prefix}");
    }
    println!();
}
