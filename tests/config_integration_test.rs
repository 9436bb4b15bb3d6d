//! Integration tests for configuration loading and validation
//!
//! Every test here takes `ENV_MUTEX`, since `LOGVAULT_*` overrides are read
//! on each load and tests run in parallel threads.

use logvault::config::load_config;
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::{Mutex, MutexGuard};
use tempfile::NamedTempFile;

// Mutex to serialize tests that read or modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn lock_env() -> MutexGuard<'static, ()> {
    let guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    guard
}

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    for var in [
        "LOGVAULT_APPLICATION_LOG_LEVEL",
        "LOGVAULT_APPLICATION_DRY_RUN",
        "LOGVAULT_AWS_REGION",
        "LOGVAULT_EXPORT_DESTINATION_BUCKET",
        "LOGVAULT_EXPORT_RETENTION_DAYS",
        "LOGVAULT_EXPORT_TIMEOUT_SECONDS",
        "LOGVAULT_LOGGING_LOCAL_ENABLED",
        "LOGVAULT_SOURCES_INCLUDE",
        "LOGVAULT_SOURCES_PREFIX",
        "TEST_LOGVAULT_SECRET_KEY",
    ] {
        std::env::remove_var(var);
    }
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(contents.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = lock_env();
    let file = write_config(
        r#"
[application]
log_level = "debug"
dry_run = true

[aws]
region = "eu-west-1"
access_key_id = "AKIDEXAMPLE"
secret_access_key = "wJalrXUtnFEMI"
logs_endpoint = "http://localhost:4566"
s3_endpoint = "http://localhost:4566"
request_timeout_seconds = 10

[export]
destination_bucket = "cw-logroup-to-s3"
retention_days = 7
timeout_seconds = 600
initial_backoff_seconds = 5
fail_fast_on_terminal_status = true

[sources]
include = ["/aws/ecs/app-a", "/aws/ecs/app-b"]
prefix = "/aws/lambda/"
page_size = 25

[logging]
local_enabled = true
local_path = "/tmp/logvault"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "debug");
    assert!(config.application.dry_run);
    assert_eq!(config.aws.region.as_deref(), Some("eu-west-1"));
    assert_eq!(config.aws.access_key_id.as_deref(), Some("AKIDEXAMPLE"));
    assert_eq!(
        config
            .aws
            .secret_access_key
            .as_ref()
            .map(|s| s.expose_secret().as_ref().to_string()),
        Some("wJalrXUtnFEMI".to_string())
    );
    assert_eq!(config.aws.request_timeout().as_secs(), 10);
    assert_eq!(config.export.destination_bucket, "cw-logroup-to-s3");
    assert_eq!(config.export.effective_retention_days(), 7);
    assert_eq!(config.export.effective_timeout_seconds(), 600);
    assert_eq!(config.export.initial_backoff_seconds, 5);
    assert!(config.export.fail_fast_on_terminal_status);
    assert_eq!(config.sources.include, vec!["/aws/ecs/app-a", "/aws/ecs/app-b"]);
    assert_eq!(config.sources.prefix.as_deref(), Some("/aws/lambda/"));
    assert_eq!(config.sources.page_size, 25);
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _lock = lock_env();
    let file = write_config(
        r#"
[export]
destination_bucket = "cw-logroup-to-s3"
retention_days = 0
timeout_seconds = 0

[sources]
include = ["/aws/ecs/app-a"]
"#,
    );

    let config = load_config(file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "info");
    assert!(!config.application.dry_run);
    assert!(config.aws.region.is_none());
    assert_eq!(config.export.effective_retention_days(), 90);
    assert_eq!(config.export.effective_timeout_seconds(), 30_000);
    assert!(!config.export.fail_fast_on_terminal_status);
    assert!(config.sources.prefix.is_none());
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution() {
    let _lock = lock_env();
    std::env::set_var("TEST_LOGVAULT_SECRET_KEY", "substituted-secret");

    let file = write_config(
        r#"
[aws]
access_key_id = "AKIDEXAMPLE"
secret_access_key = "${TEST_LOGVAULT_SECRET_KEY}"

[export]
destination_bucket = "cw-logroup-to-s3"

[sources]
include = ["/aws/ecs/app-a"]
"#,
    );

    let config = load_config(file.path()).expect("Failed to load config");

    assert_eq!(
        config
            .aws
            .secret_access_key
            .as_ref()
            .map(|s| s.expose_secret().as_ref().to_string()),
        Some("substituted-secret".to_string())
    );

    std::env::remove_var("TEST_LOGVAULT_SECRET_KEY");
}

#[test]
fn test_missing_substitution_variable_fails() {
    let _lock = lock_env();
    let file = write_config(
        r#"
[aws]
secret_access_key = "${TEST_LOGVAULT_SECRET_KEY}"

[export]
destination_bucket = "cw-logroup-to-s3"

[sources]
include = ["/aws/ecs/app-a"]
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_LOGVAULT_SECRET_KEY"));
}

#[test]
fn test_env_var_overrides() {
    let _lock = lock_env();
    std::env::set_var("LOGVAULT_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("LOGVAULT_EXPORT_DESTINATION_BUCKET", "override-bucket");
    std::env::set_var("LOGVAULT_EXPORT_RETENTION_DAYS", "3");
    std::env::set_var("LOGVAULT_SOURCES_INCLUDE", "/aws/ecs/x, /aws/ecs/y,");

    let file = write_config(
        r#"
[application]
log_level = "info"

[export]
destination_bucket = "cw-logroup-to-s3"
retention_days = 1

[sources]
include = ["/aws/ecs/app-a"]
"#,
    );

    let config = load_config(file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.export.destination_bucket, "override-bucket");
    assert_eq!(config.export.effective_retention_days(), 3);
    assert_eq!(config.sources.include, vec!["/aws/ecs/x", "/aws/ecs/y"]);

    cleanup_env_vars();
}

#[test]
fn test_non_numeric_override_is_rejected() {
    let _lock = lock_env();
    std::env::set_var("LOGVAULT_EXPORT_TIMEOUT_SECONDS", "soon");

    let file = write_config(
        r#"
[export]
destination_bucket = "cw-logroup-to-s3"

[sources]
include = ["/aws/ecs/app-a"]
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("LOGVAULT_EXPORT_TIMEOUT_SECONDS"));

    cleanup_env_vars();
}

#[test]
fn test_non_boolean_override_is_rejected() {
    let _lock = lock_env();
    std::env::set_var("LOGVAULT_LOGGING_LOCAL_ENABLED", "maybe");

    let file = write_config(
        r#"
[export]
destination_bucket = "cw-logroup-to-s3"

[sources]
include = ["/aws/ecs/app-a"]

[logging]
local_enabled = true
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("LOGVAULT_LOGGING_LOCAL_ENABLED"));

    std::env::set_var("LOGVAULT_LOGGING_LOCAL_ENABLED", "false");
    let config = load_config(file.path()).unwrap();
    assert!(!config.logging.local_enabled);

    cleanup_env_vars();
}

#[test]
fn test_invalid_config_validation() {
    let _lock = lock_env();

    let invalid = [
        // unknown log level
        "[application]\nlog_level = \"loud\"\n[export]\ndestination_bucket = \"b-1\"\n[sources]\ninclude = [\"/a\"]",
        // nothing selected
        "[export]\ndestination_bucket = \"cw-logroup-to-s3\"",
        // empty bucket
        "[export]\ndestination_bucket = \"\"\n[sources]\ninclude = [\"/a\"]",
        // zero backoff
        "[export]\ndestination_bucket = \"cw-logroup-to-s3\"\ninitial_backoff_seconds = 0\n[sources]\ninclude = [\"/a\"]",
    ];

    for contents in invalid {
        let file = write_config(contents);
        assert!(load_config(file.path()).is_err(), "accepted: {contents}");
    }
}
