//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::LogvaultConfig;
use super::secret::secret_string;
use crate::domain::errors::LogvaultError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into LogvaultConfig
/// 4. Applies environment variable overrides (LOGVAULT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns a configuration error if the file cannot be read or parsed, a
/// referenced environment variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use logvault::config::loader::load_config;
///
/// let config = load_config("logvault.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<LogvaultConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(LogvaultError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        LogvaultError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text, applying substitution, overrides and validation
pub fn parse_config(contents: &str) -> Result<LogvaultConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: LogvaultConfig = toml::from_str(&contents)
        .map_err(|e| LogvaultError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        LogvaultError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| LogvaultError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(LogvaultError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using LOGVAULT_* prefix
///
/// Environment variables follow the pattern: LOGVAULT_<SECTION>_<KEY>,
/// e.g. LOGVAULT_EXPORT_DESTINATION_BUCKET. Numeric and boolean overrides
/// that fail to parse are rejected rather than ignored.
fn apply_env_overrides(config: &mut LogvaultConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("LOGVAULT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("LOGVAULT_APPLICATION_DRY_RUN") {
        config.application.dry_run = parse_override("LOGVAULT_APPLICATION_DRY_RUN", &val)?;
    }

    // AWS overrides
    if let Ok(val) = std::env::var("LOGVAULT_AWS_REGION") {
        config.aws.region = Some(val);
    }
    if let Ok(val) = std::env::var("LOGVAULT_AWS_ACCESS_KEY_ID") {
        config.aws.access_key_id = Some(val);
    }
    if let Ok(val) = std::env::var("LOGVAULT_AWS_SECRET_ACCESS_KEY") {
        config.aws.secret_access_key = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("LOGVAULT_AWS_SESSION_TOKEN") {
        config.aws.session_token = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("LOGVAULT_AWS_LOGS_ENDPOINT") {
        config.aws.logs_endpoint = Some(val);
    }
    if let Ok(val) = std::env::var("LOGVAULT_AWS_S3_ENDPOINT") {
        config.aws.s3_endpoint = Some(val);
    }

    // Export overrides
    if let Ok(val) = std::env::var("LOGVAULT_EXPORT_DESTINATION_BUCKET") {
        config.export.destination_bucket = val;
    }
    if let Ok(val) = std::env::var("LOGVAULT_EXPORT_RETENTION_DAYS") {
        config.export.retention_days = Some(parse_override("LOGVAULT_EXPORT_RETENTION_DAYS", &val)?);
    }
    if let Ok(val) = std::env::var("LOGVAULT_EXPORT_TIMEOUT_SECONDS") {
        config.export.timeout_seconds =
            Some(parse_override("LOGVAULT_EXPORT_TIMEOUT_SECONDS", &val)?);
    }
    if let Ok(val) = std::env::var("LOGVAULT_EXPORT_INITIAL_BACKOFF_SECONDS") {
        config.export.initial_backoff_seconds =
            parse_override("LOGVAULT_EXPORT_INITIAL_BACKOFF_SECONDS", &val)?;
    }
    if let Ok(val) = std::env::var("LOGVAULT_EXPORT_FAIL_FAST_ON_TERMINAL_STATUS") {
        config.export.fail_fast_on_terminal_status =
            parse_override("LOGVAULT_EXPORT_FAIL_FAST_ON_TERMINAL_STATUS", &val)?;
    }

    // Source overrides
    if let Ok(val) = std::env::var("LOGVAULT_SOURCES_INCLUDE") {
        config.sources.include = split_list(&val);
    }
    if let Ok(val) = std::env::var("LOGVAULT_SOURCES_PREFIX") {
        config.sources.prefix = Some(val);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("LOGVAULT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_override("LOGVAULT_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("LOGVAULT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

fn parse_override<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        LogvaultError::Configuration(format!("{name} has an invalid value: '{value}'"))
    })
}

/// Splits a comma-separated list, dropping blank entries
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("LOGVAULT_LOADER_TEST_VAR", "test_value");
        let input = "bucket = \"${LOGVAULT_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "bucket = \"test_value\"\n");
        std::env::remove_var("LOGVAULT_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("LOGVAULT_LOADER_MISSING_VAR");
        let input = "secret_access_key = \"${LOGVAULT_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("LOGVAULT_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        let input = "# bucket = \"${LOGVAULT_LOADER_NEVER_SET}\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${LOGVAULT_LOADER_NEVER_SET}"));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list(" /aws/ecs/a, /aws/ecs/b ,,"),
            vec!["/aws/ecs/a".to_string(), "/aws/ecs/b".to_string()]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_parse_override_rejects_garbage() {
        assert_eq!(parse_override::<u32>("X", " 7 ").unwrap(), 7);
        assert!(parse_override::<u32>("X", "-1").is_err());
        assert!(parse_override::<u64>("X", "soon").is_err());
        assert!(parse_override::<bool>("X", "true").unwrap());
        assert!(parse_override::<bool>("X", "yes").is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-logvault.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "info"

[aws]
region = "us-east-1"

[export]
destination_bucket = "cw-logroup-to-s3"
retention_days = 1
initial_backoff_seconds = 2

[sources]
include = ["/aws/ecs/app-a", "/aws/ecs/app-b"]
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.export.destination_bucket, "cw-logroup-to-s3");
        assert_eq!(config.export.effective_retention_days(), 1);
        assert_eq!(config.export.effective_timeout_seconds(), 30_000);
        assert_eq!(config.sources.include.len(), 2);
    }
}
