//! Concurrent export fan-out
//!
//! One pipeline per source (window → guard → submit → poll) is spawned on an
//! explicit runtime handle and all of them are joined. A failing pipeline only
//! produces a failed outcome for its own source.

use super::poller::{PollSettings, TaskPoller};
use super::report::{ExportReport, FailureKind, SourceFailure, TaskOutcome};
use super::submitter::ExportSubmitter;
use super::window::{compute_destination_path, compute_window, RetentionWindow};
use crate::adapters::traits::{LogService, ObjectStoreGuard};
use crate::domain::ids::{BucketName, SourceId};
use crate::domain::Result;
use chrono::{DateTime, Local, TimeZone};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Handle;

/// Runs one export pipeline per source concurrently
pub struct ExportOrchestrator {
    submitter: ExportSubmitter,
    poller: TaskPoller,
    runtime: Handle,
}

impl ExportOrchestrator {
    /// Create an orchestrator that spawns its pipelines on `runtime`
    pub fn new(
        log_service: Arc<dyn LogService>,
        guard: Arc<dyn ObjectStoreGuard>,
        settings: PollSettings,
        runtime: Handle,
    ) -> Self {
        Self {
            submitter: ExportSubmitter::new(log_service.clone(), guard),
            poller: TaskPoller::new(log_service, settings),
            runtime,
        }
    }

    pub fn poll_settings(&self) -> &PollSettings {
        self.poller.settings()
    }

    /// Export every source's window ending `retention_days` before now (local time)
    ///
    /// # Errors
    ///
    /// Fails before anything is submitted if the retention window cannot be
    /// computed. Per-source failures are reported in the returned outcomes.
    pub async fn export_all(
        &self,
        sources: &[SourceId],
        retention_days: u32,
        destination: &BucketName,
    ) -> Result<ExportReport> {
        self.export_all_at(sources, retention_days, destination, Local::now())
            .await
    }

    /// Like [`ExportOrchestrator::export_all`] with an explicit "now"
    pub async fn export_all_at<Tz: TimeZone>(
        &self,
        sources: &[SourceId],
        retention_days: u32,
        destination: &BucketName,
        now: DateTime<Tz>,
    ) -> Result<ExportReport> {
        let started = Instant::now();
        let window = compute_window(&now, retention_days)?;

        tracing::info!(
            sources = sources.len(),
            retention_days = retention_days,
            from_millis = window.from_millis,
            to_millis = window.to_millis,
            bucket = %destination,
            "Starting export fan-out"
        );

        let handles: Vec<_> = sources
            .iter()
            .map(|source| {
                let submitter = self.submitter.clone();
                let poller = self.poller.clone();
                let source = source.clone();
                let destination = destination.clone();
                self.runtime.spawn(async move {
                    run_pipeline(&submitter, &poller, source, window, &destination).await
                })
            })
            .collect();

        let outcomes = join_all(handles)
            .await
            .into_iter()
            .zip(sources)
            .map(|(joined, source)| {
                joined.unwrap_or_else(|e| {
                    tracing::error!(source = %source, error = %e, "Export pipeline aborted");
                    TaskOutcome::not_submitted(
                        source.clone(),
                        Some(window),
                        Some(compute_destination_path(source, window.start_date)),
                        SourceFailure::new(
                            FailureKind::Internal,
                            format!("Export pipeline aborted: {e}"),
                        ),
                    )
                })
            })
            .collect();

        let report = ExportReport::new(outcomes, started.elapsed());
        report.log_summary();
        Ok(report)
    }
}

async fn run_pipeline(
    submitter: &ExportSubmitter,
    poller: &TaskPoller,
    source: SourceId,
    window: RetentionWindow,
    destination: &BucketName,
) -> TaskOutcome {
    let destination_path = compute_destination_path(&source, window.start_date);

    let mut task = match submitter
        .submit(&source, window, destination, &destination_path)
        .await
    {
        Ok(task) => task,
        Err(failure) => {
            crate::log_export_outcome!(source, false, "not_submitted", 0u64, std::time::Duration::ZERO);
            return TaskOutcome::not_submitted(
                source,
                Some(window),
                Some(destination_path),
                failure,
            );
        }
    };

    let polled = poller.poll(&mut task).await;
    let succeeded = polled.failure.is_none();

    crate::log_export_outcome!(
        task.source,
        succeeded,
        polled.state,
        polled.final_backoff_secs,
        polled.elapsed
    );

    TaskOutcome {
        source: task.source,
        succeeded,
        state: Some(polled.state),
        task_id: Some(task.task_id),
        destination_path: Some(task.destination_path),
        window: Some(task.window),
        last_status: task.last_status,
        final_backoff_secs: Some(polled.final_backoff_secs),
        elapsed: polled.elapsed,
        iterations: polled.iterations,
        failure: polled.failure,
    }
}
