//! Logging and observability
//!
//! Structured logging through `tracing`, with:
//! - Console output
//! - Configurable log levels (`RUST_LOG` wins when set)
//! - Optional JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use logvault::logging::init_logging;
//! use logvault::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a successfully submitted export task
///
/// # Example
///
/// ```no_run
/// use logvault::log_export_submitted;
///
/// log_export_submitted!("/aws/ecs/app-a", "b3a1-task", "aws-ecs-app-a/2024/2/29");
/// ```
#[macro_export]
macro_rules! log_export_submitted {
    ($source:expr, $task_id:expr, $destination_path:expr) => {
        tracing::info!(
            source = %$source,
            task_id = %$task_id,
            destination_path = %$destination_path,
            "Export task submitted"
        );
    };
}

/// Log one status poll of an export task
///
/// # Example
///
/// ```no_run
/// use logvault::log_poll_attempt;
///
/// log_poll_attempt!("b3a1-task", 3, 8, "RUNNING");
/// ```
#[macro_export]
macro_rules! log_poll_attempt {
    ($task_id:expr, $iteration:expr, $backoff_secs:expr, $status:expr) => {
        tracing::debug!(
            task_id = %$task_id,
            iteration = $iteration,
            backoff_secs = $backoff_secs,
            status = %$status,
            "Polled export task"
        );
    };
}

/// Log the final outcome of one source's export
///
/// # Example
///
/// ```no_run
/// use logvault::log_export_outcome;
/// use std::time::Duration;
///
/// log_export_outcome!("/aws/ecs/app-a", true, "completed", 16, Duration::from_secs(30));
/// ```
#[macro_export]
macro_rules! log_export_outcome {
    ($source:expr, $succeeded:expr, $state:expr, $final_backoff_secs:expr, $elapsed:expr) => {
        if $succeeded {
            tracing::info!(
                source = %$source,
                state = %$state,
                final_backoff_secs = $final_backoff_secs,
                elapsed_ms = $elapsed.as_millis() as u64,
                "Export finished"
            );
        } else {
            tracing::warn!(
                source = %$source,
                state = %$state,
                final_backoff_secs = $final_backoff_secs,
                elapsed_ms = $elapsed.as_millis() as u64,
                "Export did not complete"
            );
        }
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use logvault::log_error_with_context;
/// use logvault::domain::LogvaultError;
///
/// let error = LogvaultError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
