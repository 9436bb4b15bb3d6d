//! Export task submission
//!
//! Checks the destination bucket, then creates exactly one export task in
//! the log service. Nothing is created when the bucket check fails.

use super::report::{FailureKind, SourceFailure};
use super::window::RetentionWindow;
use crate::adapters::traits::{
    CreateExportTaskRequest, ExportTaskStatus, LogService, ObjectStoreGuard,
};
use crate::domain::ids::{BucketName, SourceId, TaskId};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Lifecycle of a submitted export task
///
/// `Submitted -> Polling* -> {Completed, TimedOut, Failed}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Submitted,
    Polling,
    Completed,
    TimedOut,
    Failed,
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::TimedOut | Self::Failed)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Submitted => "submitted",
            Self::Polling => "polling",
            Self::Completed => "completed",
            Self::TimedOut => "timed_out",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// An export task owned by one source's pipeline
///
/// Created by [`ExportSubmitter::submit`]; only the poller changes its state.
#[derive(Debug, Clone)]
pub struct ExportTask {
    pub task_id: TaskId,
    pub source: SourceId,
    pub window: RetentionWindow,
    pub destination_path: String,
    pub state: TaskState,
    pub last_status: Option<ExportTaskStatus>,
}

/// Submits export tasks after a destination pre-flight check
#[derive(Clone)]
pub struct ExportSubmitter {
    log_service: Arc<dyn LogService>,
    guard: Arc<dyn ObjectStoreGuard>,
}

impl ExportSubmitter {
    pub fn new(log_service: Arc<dyn LogService>, guard: Arc<dyn ObjectStoreGuard>) -> Self {
        Self { log_service, guard }
    }

    /// Submit one export task for `source` over `window`
    ///
    /// A guard failure is returned unchanged as `DestinationMissing`; a
    /// service rejection becomes `Submission`.
    pub async fn submit(
        &self,
        source: &SourceId,
        window: RetentionWindow,
        destination: &BucketName,
        destination_path: &str,
    ) -> Result<ExportTask, SourceFailure> {
        if let Err(e) = self.guard.ensure_bucket_exists(destination).await {
            tracing::error!(
                source = %source,
                bucket = %destination,
                error = %e,
                "Destination bucket check failed"
            );
            return Err(SourceFailure::new(FailureKind::DestinationMissing, e.to_string()));
        }

        let request = CreateExportTaskRequest {
            task_name: Uuid::new_v4().to_string(),
            source: source.clone(),
            from_millis: window.from_millis,
            to_millis: window.to_millis,
            destination: destination.clone(),
            destination_prefix: destination_path.to_string(),
        };

        match self.log_service.create_export_task(&request).await {
            Ok(task_id) => {
                crate::log_export_submitted!(source, task_id, destination_path);
                Ok(ExportTask {
                    task_id,
                    source: source.clone(),
                    window,
                    destination_path: destination_path.to_string(),
                    state: TaskState::Submitted,
                    last_status: None,
                })
            }
            Err(e) => {
                tracing::error!(source = %source, error = %e, "Export task submission failed");
                Err(SourceFailure::new(FailureKind::Submission, e.to_string()))
            }
        }
    }
}
