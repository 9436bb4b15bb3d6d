//! Export outcomes and the run report
//!
//! Per-source failures are values, not errors: each source gets exactly one
//! [`TaskOutcome`], and a failure in one source's pipeline never becomes an
//! `Err` for the run as a whole.

use super::submitter::TaskState;
use super::window::RetentionWindow;
use crate::adapters::traits::ExportTaskStatus;
use crate::domain::ids::{SourceId, TaskId};
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Where in a source's pipeline a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The destination bucket guard did not confirm the bucket
    DestinationMissing,
    /// The log service rejected the export task
    Submission,
    /// The backoff budget ran out while the task was still not completed
    PollingTimeout,
    /// Querying the task status failed
    PollingQuery,
    /// The service reported FAILED or CANCELLED (fast-fail mode only)
    TaskFailed,
    /// The pipeline itself aborted
    Internal,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DestinationMissing => "destination_missing",
            Self::Submission => "submission",
            Self::PollingTimeout => "polling_timeout",
            Self::PollingQuery => "polling_query",
            Self::TaskFailed => "task_failed",
            Self::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// Failure of one source's export pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{message}")]
pub struct SourceFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl SourceFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Final result of one source's export
#[derive(Debug, Clone, Serialize)]
pub struct TaskOutcome {
    pub source: SourceId,

    /// True only when the task reached COMPLETED
    pub succeeded: bool,

    /// Terminal poller state; `None` when no task was ever submitted
    pub state: Option<TaskState>,

    pub task_id: Option<TaskId>,
    pub destination_path: Option<String>,
    pub window: Option<RetentionWindow>,

    /// Last status record observed while polling
    pub last_status: Option<ExportTaskStatus>,

    /// The backoff interval in effect when polling stopped, in seconds.
    ///
    /// This is NOT how long the export took; see `elapsed` for that.
    pub final_backoff_secs: Option<u64>,

    /// Wall-clock time spent polling
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,

    /// Number of status queries issued
    pub iterations: u32,

    pub failure: Option<SourceFailure>,
}

impl TaskOutcome {
    /// Outcome for a source whose pipeline stopped before or at submission
    pub fn not_submitted(
        source: SourceId,
        window: Option<RetentionWindow>,
        destination_path: Option<String>,
        failure: SourceFailure,
    ) -> Self {
        Self {
            source,
            succeeded: false,
            state: None,
            task_id: None,
            destination_path,
            window,
            last_status: None,
            final_backoff_secs: None,
            elapsed: Duration::ZERO,
            iterations: 0,
            failure: Some(failure),
        }
    }

    /// Whether a task was created for this source
    pub fn was_submitted(&self) -> bool {
        self.task_id.is_some()
    }

    /// Human-readable failure detail, if any
    pub fn error_message(&self) -> Option<&str> {
        self.failure.as_ref().map(|f| f.message.as_str())
    }

    /// Short label for the terminal state
    pub fn state_label(&self) -> String {
        self.state
            .map(|s| s.to_string())
            .unwrap_or_else(|| "not_submitted".to_string())
    }
}

/// Result of one export run
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    /// One outcome per source, in input order
    pub outcomes: Vec<TaskOutcome>,

    /// Human-readable summary
    pub message: String,

    /// Overall success flag, see [`ExportReport::success`]
    pub success: bool,

    /// True when every export reached COMPLETED
    pub all_succeeded: bool,

    /// Total run time
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
}

impl ExportReport {
    pub fn new(outcomes: Vec<TaskOutcome>, duration: Duration) -> Self {
        let mut report = Self {
            outcomes,
            message: String::new(),
            success: false,
            all_succeeded: false,
            duration,
        };
        report.message = report.summary_message();
        report.success = report.outcomes.iter().all(TaskOutcome::was_submitted);
        report.all_succeeded = report.outcomes.iter().all(|o| o.succeeded);
        report
    }

    /// Overall success flag
    ///
    /// True when every source had a usable destination and an export task
    /// was submitted for it. Tasks that later time out or fail while
    /// polling do not clear this flag; use [`ExportReport::all_succeeded`]
    /// for "every export completed".
    pub fn success(&self) -> bool {
        self.success
    }

    /// True when every source's export reached COMPLETED
    pub fn all_succeeded(&self) -> bool {
        self.all_succeeded
    }

    pub fn succeeded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.succeeded_count()
    }

    pub fn submitted_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.was_submitted()).count()
    }

    /// Outcomes that did not complete
    pub fn failures(&self) -> impl Iterator<Item = &TaskOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded)
    }

    fn summary_message(&self) -> String {
        format!(
            "{} of {} log groups exported ({} submitted, {} failed)",
            self.succeeded_count(),
            self.outcomes.len(),
            self.submitted_count(),
            self.failed_count()
        )
    }

    /// Log the report
    pub fn log_summary(&self) {
        tracing::info!(
            sources = self.outcomes.len(),
            submitted = self.submitted_count(),
            succeeded = self.succeeded_count(),
            failed = self.failed_count(),
            success = self.success(),
            duration_secs = self.duration.as_secs(),
            "Export run completed"
        );

        for outcome in self.failures() {
            tracing::warn!(
                source = %outcome.source,
                state = %outcome.state_label(),
                kind = ?outcome.failure.as_ref().map(|f| f.kind),
                message = outcome.error_message().unwrap_or(""),
                "Export failed"
            );
        }
    }
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(id: &str) -> TaskOutcome {
        TaskOutcome {
            source: SourceId::new(id).unwrap(),
            succeeded: true,
            state: Some(TaskState::Completed),
            task_id: Some(TaskId::new(format!("task-{id}")).unwrap()),
            destination_path: Some("x/2024/2/29".to_string()),
            window: None,
            last_status: None,
            final_backoff_secs: Some(4),
            elapsed: Duration::from_secs(6),
            iterations: 2,
            failure: None,
        }
    }

    fn timed_out(id: &str) -> TaskOutcome {
        TaskOutcome {
            succeeded: false,
            state: Some(TaskState::TimedOut),
            failure: Some(SourceFailure::new(FailureKind::PollingTimeout, "still running")),
            ..completed(id)
        }
    }

    fn missing_destination(id: &str) -> TaskOutcome {
        TaskOutcome::not_submitted(
            SourceId::new(id).unwrap(),
            None,
            None,
            SourceFailure::new(FailureKind::DestinationMissing, "Bucket not found: b"),
        )
    }

    #[test]
    fn test_all_completed() {
        let report = ExportReport::new(vec![completed("/a"), completed("/b")], Duration::ZERO);

        assert!(report.success());
        assert!(report.all_succeeded());
        assert_eq!(report.message, "2 of 2 log groups exported (2 submitted, 0 failed)");
    }

    #[test]
    fn test_poll_failure_keeps_overall_success() {
        let report = ExportReport::new(vec![completed("/a"), timed_out("/b")], Duration::ZERO);

        assert!(report.success());
        assert!(!report.all_succeeded());
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn test_missing_destination_clears_overall_success() {
        let report =
            ExportReport::new(vec![completed("/a"), missing_destination("/b")], Duration::ZERO);

        assert!(!report.success());
        assert_eq!(report.submitted_count(), 1);
        let failed = report.failures().next().unwrap();
        assert_eq!(failed.state_label(), "not_submitted");
        assert_eq!(failed.error_message(), Some("Bucket not found: b"));
    }

    #[test]
    fn test_empty_report_is_vacuously_successful() {
        let report = ExportReport::new(Vec::new(), Duration::ZERO);
        assert!(report.success());
        assert!(report.all_succeeded());
    }

    #[test]
    fn test_report_serializes_durations_as_millis() {
        let report = ExportReport::new(vec![timed_out("/a")], Duration::from_millis(1500));
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["duration_ms"], 1500);
        assert_eq!(json["success"], true);
        assert_eq!(json["all_succeeded"], false);
        assert_eq!(json["outcomes"][0]["elapsed_ms"], 6000);
        assert_eq!(json["outcomes"][0]["state"], "timed_out");
        assert_eq!(json["outcomes"][0]["failure"]["kind"], "polling_timeout");
        assert_eq!(json["outcomes"][0]["final_backoff_secs"], 4);
    }
}
