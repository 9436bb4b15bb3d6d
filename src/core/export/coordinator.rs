//! Export coordinator - one complete export run
//!
//! Enumerates log sources, selects the eligible ones and hands them to the
//! [`ExportOrchestrator`]. Failures before the fan-out abort the run; failures
//! inside a source's pipeline end up in the report.

use super::orchestrator::ExportOrchestrator;
use super::poller::PollSettings;
use super::report::ExportReport;
use super::window::{compute_destination_path, compute_window, RetentionWindow};
use crate::adapters::cloudwatch::CloudWatchLogsClient;
use crate::adapters::s3::S3BucketGuard;
use crate::adapters::traits::{LogService, LogSourceEnumerator, ObjectStoreGuard};
use crate::config::LogvaultConfig;
use crate::core::sources::{select_sources, SourceSelection};
use crate::domain::ids::{BucketName, SourceId};
use crate::domain::{LogvaultError, Result};
use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use std::sync::Arc;
use tokio::runtime::Handle;

/// One source's planned export (dry run)
#[derive(Debug, Clone, Serialize)]
pub struct PlannedExport {
    pub source: SourceId,
    pub destination_path: String,
}

/// What an export run would do, without touching the bucket or the log service's tasks
#[derive(Debug, Clone, Serialize)]
pub struct ExportPlan {
    pub bucket: BucketName,
    pub retention_days: u32,
    pub window: RetentionWindow,
    pub timeout_secs: u64,
    pub initial_backoff_secs: u64,
    pub exports: Vec<PlannedExport>,
}

/// Export coordinator
pub struct ExportCoordinator {
    config: LogvaultConfig,
    bucket: BucketName,
    enumerator: Arc<dyn LogSourceEnumerator>,
    orchestrator: ExportOrchestrator,
}

impl ExportCoordinator {
    /// Create a coordinator backed by the AWS clients described in `config`
    ///
    /// Must be called from within a Tokio runtime; pipelines are spawned on it.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the clients cannot be
    /// built, or there is no current runtime.
    pub fn from_config(config: LogvaultConfig) -> Result<Self> {
        let logs = Arc::new(CloudWatchLogsClient::from_config(&config)?);
        let guard = Arc::new(S3BucketGuard::from_config(&config)?);
        let runtime = Handle::try_current()
            .map_err(|e| LogvaultError::Other(format!("No Tokio runtime available: {e}")))?;

        tracing::debug!(logs_endpoint = %logs.endpoint(), "Created AWS clients");

        Self::new(config, logs.clone(), logs, guard, runtime)
    }

    /// Create a coordinator with explicit collaborators
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the destination bucket name is invalid.
    pub fn new(
        config: LogvaultConfig,
        log_service: Arc<dyn LogService>,
        enumerator: Arc<dyn LogSourceEnumerator>,
        guard: Arc<dyn ObjectStoreGuard>,
        runtime: Handle,
    ) -> Result<Self> {
        let bucket = BucketName::new(config.export.destination_bucket.as_str())
            .map_err(LogvaultError::Configuration)?;
        let orchestrator = ExportOrchestrator::new(
            log_service,
            guard,
            PollSettings::from(&config.export),
            runtime,
        );

        Ok(Self {
            config,
            bucket,
            enumerator,
            orchestrator,
        })
    }

    pub fn config(&self) -> &LogvaultConfig {
        &self.config
    }

    /// Enumerate and filter the sources to export
    ///
    /// # Errors
    ///
    /// `SourceEnumeration` or `NoEligibleSources`; see [`select_sources`].
    pub async fn resolve_sources(&self) -> Result<SourceSelection> {
        select_sources(self.enumerator.as_ref(), &self.config.sources).await
    }

    /// Run the export for every eligible source
    pub async fn execute_export(&self) -> Result<ExportReport> {
        self.execute_export_at(Local::now()).await
    }

    /// Run the export with an explicit "now"
    pub async fn execute_export_at<Tz: TimeZone>(&self, now: DateTime<Tz>) -> Result<ExportReport> {
        let selection = self.resolve_sources().await?;
        let sources = selection.eligible_ids();

        tracing::info!(
            sources = sources.len(),
            bucket = %self.bucket,
            "Starting export"
        );

        self.orchestrator
            .export_all_at(
                &sources,
                self.config.export.effective_retention_days(),
                &self.bucket,
                now,
            )
            .await
    }

    /// Describe what an export would do now
    pub async fn plan(&self) -> Result<ExportPlan> {
        self.plan_at(Local::now()).await
    }

    /// Describe what an export would do at `now`
    pub async fn plan_at<Tz: TimeZone>(&self, now: DateTime<Tz>) -> Result<ExportPlan> {
        let selection = self.resolve_sources().await?;
        let retention_days = self.config.export.effective_retention_days();
        let window = compute_window(&now, retention_days)?;
        let settings = self.orchestrator.poll_settings();

        let exports = selection
            .eligible
            .into_iter()
            .map(|source| PlannedExport {
                destination_path: compute_destination_path(&source.id, window.start_date),
                source: source.id,
            })
            .collect();

        Ok(ExportPlan {
            bucket: self.bucket.clone(),
            retention_days,
            window,
            timeout_secs: settings.timeout_secs,
            initial_backoff_secs: settings.initial_backoff_secs,
            exports,
        })
    }
}
