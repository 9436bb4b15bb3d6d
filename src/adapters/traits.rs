//! Boundary traits for the export engine
//!
//! The export engine only talks to the outside world through these traits:
//! a log service that runs export tasks, an enumerator that lists log sources,
//! and a guard that checks the destination bucket. The AWS implementations
//! live in [`crate::adapters::cloudwatch`] and [`crate::adapters::s3`]; tests
//! substitute in-memory fakes.

use crate::domain::ids::{BucketName, SourceId, TaskId};
use crate::domain::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A log source as returned by enumeration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSource {
    /// Source identifier (log group name)
    pub id: SourceId,

    /// Service-side resource name, if reported
    pub arn: Option<String>,

    /// Creation time in epoch milliseconds
    pub creation_time: Option<i64>,

    /// Retention configured on the source itself
    pub retention_in_days: Option<u32>,

    /// Bytes currently stored
    pub stored_bytes: Option<u64>,
}

impl LogSource {
    /// Create a source carrying only its identifier
    pub fn new(id: SourceId) -> Self {
        Self {
            id,
            arn: None,
            creation_time: None,
            retention_in_days: None,
            stored_bytes: None,
        }
    }
}

/// Parameters for creating one export task
#[derive(Debug, Clone, PartialEq)]
pub struct CreateExportTaskRequest {
    /// Unique name for the service's bookkeeping
    pub task_name: String,

    /// Source to export
    pub source: SourceId,

    /// Inclusive window start, epoch milliseconds
    pub from_millis: i64,

    /// Exclusive window end, epoch milliseconds
    pub to_millis: i64,

    /// Destination bucket
    pub destination: BucketName,

    /// Object key prefix inside the bucket
    pub destination_prefix: String,
}

/// Status code reported by the log service for an export task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExportTaskStatusCode {
    Pending,
    PendingCancel,
    Running,
    Completed,
    Cancelled,
    Failed,
    /// A code this client does not know about
    Unknown(String),
}

impl ExportTaskStatusCode {
    /// Wire representation
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::PendingCancel => "PENDING_CANCEL",
            Self::Running => "RUNNING",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Failed => "FAILED",
            Self::Unknown(code) => code,
        }
    }

    /// Whether the task finished successfully
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Whether the service will never complete this task
    pub fn is_failed_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Failed)
    }
}

impl From<String> for ExportTaskStatusCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "PENDING" => Self::Pending,
            "PENDING_CANCEL" => Self::PendingCancel,
            "RUNNING" => Self::Running,
            "COMPLETED" => Self::Completed,
            "CANCELLED" => Self::Cancelled,
            "FAILED" => Self::Failed,
            _ => Self::Unknown(code),
        }
    }
}

impl From<&str> for ExportTaskStatusCode {
    fn from(code: &str) -> Self {
        Self::from(code.to_string())
    }
}

impl From<ExportTaskStatusCode> for String {
    fn from(code: ExportTaskStatusCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for ExportTaskStatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status record of an export task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportTaskStatus {
    /// Status code
    pub code: ExportTaskStatusCode,

    /// Optional service-provided detail
    pub message: Option<String>,
}

impl ExportTaskStatus {
    /// Status with no message
    pub fn new(code: impl Into<ExportTaskStatusCode>) -> Self {
        Self {
            code: code.into(),
            message: None,
        }
    }
}

/// Everything the log service reports about one export task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportTaskDescription {
    pub task_id: TaskId,
    pub task_name: Option<String>,
    pub source: Option<String>,
    pub status: ExportTaskStatus,
    pub from_millis: Option<i64>,
    pub to_millis: Option<i64>,
    pub destination: Option<String>,
    pub destination_prefix: Option<String>,
    pub creation_time: Option<i64>,
    pub completion_time: Option<i64>,
}

impl ExportTaskDescription {
    /// Description carrying only an id and a status
    pub fn new(task_id: TaskId, status: ExportTaskStatus) -> Self {
        Self {
            task_id,
            task_name: None,
            source: None,
            status,
            from_millis: None,
            to_millis: None,
            destination: None,
            destination_prefix: None,
            creation_time: None,
            completion_time: None,
        }
    }
}

/// Log-management service that runs asynchronous export tasks
#[async_trait]
pub trait LogService: Send + Sync {
    /// Create one export task and return the id the service assigned to it
    ///
    /// # Errors
    ///
    /// Returns an error on a malformed window, an unknown source, or a
    /// destination the service cannot write to.
    async fn create_export_task(&self, request: &CreateExportTaskRequest) -> Result<TaskId>;

    /// Fetch the current status record of an export task
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot be queried or does not know the task.
    async fn describe_export_task(&self, task_id: &TaskId) -> Result<ExportTaskDescription>;
}

/// Lists the log sources available for export
#[async_trait]
pub trait LogSourceEnumerator: Send + Sync {
    /// Every available source; pagination is handled internally
    async fn list_all(&self) -> Result<Vec<LogSource>>;

    /// Every available source whose identifier starts with `prefix`
    async fn list_with_prefix(&self, prefix: &str) -> Result<Vec<LogSource>>;
}

/// Pre-flight check that the destination bucket is usable
#[async_trait]
pub trait ObjectStoreGuard: Send + Sync {
    /// Succeeds only if the bucket exists and is reachable
    ///
    /// # Errors
    ///
    /// Both a missing bucket and any other failure are errors; callers must
    /// not proceed with the export in either case.
    async fn ensure_bucket_exists(&self, bucket: &BucketName) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_parsing() {
        assert_eq!(ExportTaskStatusCode::from("COMPLETED"), ExportTaskStatusCode::Completed);
        assert_eq!(ExportTaskStatusCode::from("RUNNING"), ExportTaskStatusCode::Running);
        assert_eq!(
            ExportTaskStatusCode::from("PENDING_CANCEL"),
            ExportTaskStatusCode::PendingCancel
        );
        assert_eq!(
            ExportTaskStatusCode::from("ARCHIVED"),
            ExportTaskStatusCode::Unknown("ARCHIVED".to_string())
        );
    }

    #[test]
    fn test_status_code_classification() {
        assert!(ExportTaskStatusCode::Completed.is_completed());
        assert!(!ExportTaskStatusCode::Running.is_completed());
        assert!(ExportTaskStatusCode::Failed.is_failed_terminal());
        assert!(ExportTaskStatusCode::Cancelled.is_failed_terminal());
        assert!(!ExportTaskStatusCode::Pending.is_failed_terminal());
        assert!(!ExportTaskStatusCode::Unknown("X".to_string()).is_failed_terminal());
    }

    #[test]
    fn test_status_code_serde_round_trip_through_wire_names() {
        let status: ExportTaskStatus =
            serde_json::from_str(r#"{"code":"CANCELLED","message":"Cancelled by user"}"#).unwrap();
        assert_eq!(status.code, ExportTaskStatusCode::Cancelled);
        assert_eq!(
            serde_json::to_value(&status.code).unwrap(),
            serde_json::json!("CANCELLED")
        );
    }
}
