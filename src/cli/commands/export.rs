//! Export command implementation
//!
//! Runs one export of the selected log groups, or prints the plan with
//! `--dry-run`.

use super::{exit_code_for, OutputFormat, EXIT_CLIENT_INIT, EXIT_CONFIG, EXIT_PARTIAL, EXIT_SUCCESS};
use crate::config::loader::split_list;
use crate::config::{load_config, LogvaultConfig};
use crate::core::export::{ExportCoordinator, ExportPlan, ExportReport};
use crate::log_error_with_context;
use clap::Args;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Print the export plan without checking the bucket or creating tasks
    #[arg(long)]
    pub dry_run: bool,

    /// Override the log groups to export (comma-separated)
    #[arg(long)]
    pub source: Option<String>,

    /// Override the retention window in days
    #[arg(long)]
    pub retention_days: Option<u32>,

    /// Override the destination bucket
    #[arg(long)]
    pub bucket: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

impl ExportArgs {
    /// Apply command-line overrides to a loaded configuration
    pub fn apply_overrides(&self, config: &mut LogvaultConfig) {
        if let Some(sources) = &self.source {
            let ids = split_list(sources);
            tracing::info!(sources = ?ids, "Overriding log groups from CLI");
            config.sources.include = ids;
            config.sources.prefix = None;
        }

        if let Some(days) = self.retention_days {
            tracing::info!(retention_days = days, "Overriding retention from CLI");
            config.export.retention_days = Some(days);
        }

        if let Some(bucket) = &self.bucket {
            tracing::info!(bucket = %bucket, "Overriding destination bucket from CLI");
            config.export.destination_bucket = bucket.clone();
        }

        if self.dry_run {
            config.application.dry_run = true;
        }
    }

    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG);
        }

        let dry_run = config.application.dry_run;

        let coordinator = match ExportCoordinator::from_config(config) {
            Ok(c) => c,
            Err(e) => {
                log_error_with_context!(&e, "Failed to create export coordinator");
                eprintln!("Failed to initialize export: {e}");
                return Ok(EXIT_CLIENT_INIT);
            }
        };

        if dry_run {
            tracing::info!("Dry run mode enabled - no export tasks will be created");
            return match coordinator.plan().await {
                Ok(plan) => {
                    self.print_plan(&plan)?;
                    Ok(EXIT_SUCCESS)
                }
                Err(e) => {
                    log_error_with_context!(&e, "Failed to plan export");
                    eprintln!("Export planning failed: {e}");
                    Ok(exit_code_for(&e))
                }
            };
        }

        let report = match coordinator.execute_export().await {
            Ok(r) => r,
            Err(e) => {
                log_error_with_context!(&e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        self.print_report(&report)?;

        Ok(if report.all_succeeded() {
            EXIT_SUCCESS
        } else {
            EXIT_PARTIAL
        })
    }

    fn print_plan(&self, plan: &ExportPlan) -> anyhow::Result<()> {
        if self.output == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(plan)?);
            return Ok(());
        }

        println!("🔍 DRY RUN - no export tasks will be created");
        println!();
        println!("  Bucket: {}", plan.bucket);
        println!(
            "  Window: {} .. {} ({} days retention)",
            plan.window.from_millis, plan.window.to_millis, plan.retention_days
        );
        println!(
            "  Polling: start at {}s, give up above {}s",
            plan.initial_backoff_secs, plan.timeout_secs
        );
        println!();
        for export in &plan.exports {
            println!("  {} -> s3://{}/{}", export.source, plan.bucket, export.destination_path);
        }
        println!();
        Ok(())
    }

    fn print_report(&self, report: &ExportReport) -> anyhow::Result<()> {
        if self.output == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(report)?);
            return Ok(());
        }

        println!();
        println!("📊 Export Summary:");
        println!("  Log groups: {}", report.outcomes.len());
        println!("  Submitted: {}", report.submitted_count());
        println!("  Completed: {}", report.succeeded_count());
        println!("  Failed: {}", report.failed_count());
        println!("  Duration: {:.2}s", report.duration.as_secs_f64());
        println!();

        for outcome in &report.outcomes {
            let marker = if outcome.succeeded { "✅" } else { "❌" };
            println!(
                "  {marker} {} [{}] {}",
                outcome.source,
                outcome.state_label(),
                outcome.destination_path.as_deref().unwrap_or("-")
            );
            if let Some(message) = outcome.error_message() {
                println!("      {message}");
            }
        }
        println!();

        if report.all_succeeded() {
            println!("✅ Export completed successfully!");
        } else {
            println!("⚠️  Export completed with failures");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    fn args() -> ExportArgs {
        ExportArgs {
            dry_run: false,
            source: None,
            retention_days: None,
            bucket: None,
            output: OutputFormat::Text,
        }
    }

    fn config() -> LogvaultConfig {
        parse_config(
            r#"
[export]
destination_bucket = "cw-logroup-to-s3"

[sources]
prefix = "/aws/ecs/"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let mut config = config();
        args().apply_overrides(&mut config);

        assert_eq!(config.export.destination_bucket, "cw-logroup-to-s3");
        assert_eq!(config.sources.prefix.as_deref(), Some("/aws/ecs/"));
        assert!(!config.application.dry_run);
    }

    #[test]
    fn test_overrides_replace_selection() {
        let mut config = config();
        let args = ExportArgs {
            dry_run: true,
            source: Some("/aws/ecs/app-a, /aws/ecs/app-b".to_string()),
            retention_days: Some(7),
            bucket: Some("other-bucket".to_string()),
            ..args()
        };

        args.apply_overrides(&mut config);

        assert_eq!(config.sources.include, vec!["/aws/ecs/app-a", "/aws/ecs/app-b"]);
        assert!(config.sources.prefix.is_none());
        assert_eq!(config.export.retention_days, Some(7));
        assert_eq!(config.export.destination_bucket, "other-bucket");
        assert!(config.application.dry_run);
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_missing_config_file_is_config_error() {
        let code = args().execute("/nonexistent/logvault.toml").await.unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }
}
