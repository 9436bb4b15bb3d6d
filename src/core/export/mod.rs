//! Export engine
//!
//! - [`window`] - retention window and destination path
//! - [`submitter`] - destination check and task creation
//! - [`poller`] - exponential-backoff status polling
//! - [`orchestrator`] - concurrent per-source fan-out
//! - [`report`] - per-source outcomes and the run report
//! - [`coordinator`] - source selection plus fan-out for one run

pub mod coordinator;
pub mod orchestrator;
pub mod poller;
pub mod report;
pub mod submitter;
pub mod window;

pub use coordinator::{ExportCoordinator, ExportPlan, PlannedExport};
pub use orchestrator::ExportOrchestrator;
pub use poller::{PollOutcome, PollSettings, TaskPoller};
pub use report::{ExportReport, FailureKind, SourceFailure, TaskOutcome};
pub use submitter::{ExportSubmitter, ExportTask, TaskState};
pub use window::{compute_destination_path, compute_window, RetentionWindow};
