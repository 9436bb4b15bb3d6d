//! CloudWatch Logs adapter
//!
//! Export task submission and status, plus log group enumeration.

pub mod client;
pub mod models;

pub use client::CloudWatchLogsClient;
