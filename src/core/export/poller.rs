//! Export task polling with exponential backoff
//!
//! The poller drives one submitted task to a terminal state:
//!
//! 1. `t = initial_backoff_secs`
//! 2. sleep `t`, then query the task status
//! 3. if `t > timeout_secs`, stop as `TimedOut` with the last status seen
//! 4. else if the status is not COMPLETED, double `t` and go to 2
//! 5. else stop as `Completed`
//!
//! A failed status query stops immediately as `Failed`. The timeout is checked
//! against the backoff value after the sleep, not against elapsed time, so a
//! task may be polled for up to one interval past `timeout_secs`.
//!
//! Service-side FAILED and CANCELLED statuses are treated like any other
//! non-completed status unless `fail_fast` is set.

use super::report::{FailureKind, SourceFailure};
use super::submitter::{ExportTask, TaskState};
use crate::adapters::traits::{ExportTaskDescription, ExportTaskStatus, LogService};
use crate::config::{ExportConfig, MAX_TIMEOUT_SECONDS};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Poll timing and termination settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Backoff value above which polling gives up; at most [`MAX_TIMEOUT_SECONDS`]
    pub timeout_secs: u64,

    /// First sleep interval; never below one second
    pub initial_backoff_secs: u64,

    /// Stop as soon as the service reports FAILED or CANCELLED
    pub fail_fast: bool,
}

impl PollSettings {
    pub fn new(timeout_secs: u64, initial_backoff_secs: u64) -> Self {
        Self {
            timeout_secs: timeout_secs.min(MAX_TIMEOUT_SECONDS),
            initial_backoff_secs: initial_backoff_secs.max(1),
            fail_fast: false,
        }
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Upper bound on status queries for these settings
    ///
    /// `ceil(log2(timeout / initial)) + 2`
    pub fn max_iterations(&self) -> u32 {
        let mut t = self.initial_backoff_secs;
        let mut doublings = 0;
        while t < self.timeout_secs {
            t = t.saturating_mul(2);
            doublings += 1;
        }
        doublings + 2
    }
}

impl From<&ExportConfig> for PollSettings {
    fn from(config: &ExportConfig) -> Self {
        Self::new(
            config.effective_timeout_seconds(),
            config.initial_backoff_seconds,
        )
        .with_fail_fast(config.fail_fast_on_terminal_status)
    }
}

/// What polling observed
#[derive(Debug, Clone)]
pub struct PollOutcome {
    /// Terminal state reached
    pub state: TaskState,

    /// Last full description received, if any query succeeded
    pub last_description: Option<ExportTaskDescription>,

    /// Backoff interval when polling stopped (seconds, not elapsed time)
    pub final_backoff_secs: u64,

    /// Wall-clock time spent in the poll loop
    pub elapsed: Duration,

    /// Status queries issued
    pub iterations: u32,

    pub failure: Option<SourceFailure>,
}

impl PollOutcome {
    pub fn last_status(&self) -> Option<&ExportTaskStatus> {
        self.last_description.as_ref().map(|d| &d.status)
    }
}

/// Drives submitted export tasks to a terminal state
#[derive(Clone)]
pub struct TaskPoller {
    log_service: Arc<dyn LogService>,
    settings: PollSettings,
}

impl TaskPoller {
    pub fn new(log_service: Arc<dyn LogService>, settings: PollSettings) -> Self {
        Self {
            log_service,
            settings,
        }
    }

    pub fn settings(&self) -> &PollSettings {
        &self.settings
    }

    /// Poll `task` until it completes, times out or the query fails
    ///
    /// Updates `task.state` and `task.last_status` as it goes. Always
    /// returns with `task.state` terminal.
    pub async fn poll(&self, task: &mut ExportTask) -> PollOutcome {
        let started = Instant::now();
        let mut t = self.settings.initial_backoff_secs;
        let mut iterations = 0u32;
        let mut last_description: Option<ExportTaskDescription> = None;

        task.state = TaskState::Polling;

        let (state, failure) = loop {
            tokio::time::sleep(Duration::from_secs(t)).await;
            iterations += 1;

            let description = match self.log_service.describe_export_task(&task.task_id).await {
                Ok(description) => description,
                Err(e) => {
                    let message = format!(
                        "Unable to verify status of task:{}. ERROR:{}",
                        task.task_id, e
                    );
                    tracing::error!(task_id = %task.task_id, source = %task.source, error = %e, "Status query failed");
                    break (
                        TaskState::Failed,
                        Some(SourceFailure::new(FailureKind::PollingQuery, message)),
                    );
                }
            };

            let code = description.status.code.clone();
            crate::log_poll_attempt!(task.task_id, iterations, t, code);
            task.last_status = Some(description.status.clone());
            last_description = Some(description);

            if t > self.settings.timeout_secs {
                let message = format!(
                    "Task:{} is still running after {} seconds. Status:{}",
                    task.task_id, t, code
                );
                break (
                    TaskState::TimedOut,
                    Some(SourceFailure::new(FailureKind::PollingTimeout, message)),
                );
            }

            if self.settings.fail_fast && code.is_failed_terminal() {
                let detail = task
                    .last_status
                    .as_ref()
                    .and_then(|s| s.message.clone())
                    .unwrap_or_default();
                let message = format!("Task:{} ended with status {}. {}", task.task_id, code, detail);
                break (
                    TaskState::Failed,
                    Some(SourceFailure::new(FailureKind::TaskFailed, message.trim_end())),
                );
            }

            if !code.is_completed() {
                t = t.saturating_mul(2);
                continue;
            }

            break (TaskState::Completed, None);
        };

        task.state = state;
        let elapsed = started.elapsed();

        tracing::info!(
            task_id = %task.task_id,
            source = %task.source,
            state = %state,
            final_backoff_secs = t,
            iterations = iterations,
            "Polling finished"
        );

        PollOutcome {
            state,
            last_description,
            final_backoff_secs: t,
            elapsed,
            iterations,
            failure,
        }
    }
}
