//! Sources command implementation
//!
//! Lists the log groups the current configuration selects for export.

use super::{exit_code_for, OutputFormat, EXIT_CLIENT_INIT, EXIT_CONFIG, EXIT_SUCCESS};
use crate::adapters::cloudwatch::CloudWatchLogsClient;
use crate::adapters::traits::{LogSource, LogSourceEnumerator};
use crate::config::load_config;
use crate::core::sources::select_sources;
use crate::log_error_with_context;
use clap::Args;

/// Arguments for the sources command
#[derive(Args, Debug)]
pub struct SourcesArgs {
    /// List every available log group, not only the selected ones
    #[arg(long)]
    pub all: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

impl SourcesArgs {
    /// Execute the sources command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let client = match CloudWatchLogsClient::from_config(&config) {
            Ok(c) => c,
            Err(e) => {
                log_error_with_context!(&e, "Failed to create CloudWatch Logs client");
                eprintln!("Failed to initialize CloudWatch Logs client: {e}");
                return Ok(EXIT_CLIENT_INIT);
            }
        };

        let result = if self.all {
            client
                .list_all()
                .await
                .map_err(|e| crate::domain::LogvaultError::SourceEnumeration(e.to_string()))
        } else {
            select_sources(&client, &config.sources)
                .await
                .map(|selection| selection.eligible)
        };

        let sources = match result {
            Ok(s) => s,
            Err(e) => {
                log_error_with_context!(&e, "Failed to list log groups");
                eprintln!("{e}");
                return Ok(exit_code_for(&e));
            }
        };

        self.print(&sources)?;
        Ok(EXIT_SUCCESS)
    }

    fn print(&self, sources: &[LogSource]) -> anyhow::Result<()> {
        if self.output == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(sources)?);
            return Ok(());
        }

        for source in sources {
            match source.stored_bytes {
                Some(bytes) => println!("{}  ({bytes} bytes)", source.id),
                None => println!("{}", source.id),
            }
        }
        println!();
        println!("{} log groups", sources.len());
        Ok(())
    }
}
