//! CLI command implementations
//!
//! Every command returns a process exit code:
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | success |
//! | 1 | some log groups were not exported |
//! | 2 | configuration error |
//! | 3 | log group enumeration failed or nothing matched |
//! | 4 | AWS client initialisation failed |
//! | 5 | fatal error |

pub mod export;
pub mod init;
pub mod sources;
pub mod validate;

use crate::domain::LogvaultError;
use clap::ValueEnum;

/// Report format for command output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_PARTIAL: i32 = 1;
pub const EXIT_CONFIG: i32 = 2;
pub const EXIT_SOURCES: i32 = 3;
pub const EXIT_CLIENT_INIT: i32 = 4;
pub const EXIT_FATAL: i32 = 5;

/// Exit code for a run-level error
pub fn exit_code_for(error: &LogvaultError) -> i32 {
    match error {
        LogvaultError::Configuration(_) | LogvaultError::Validation(_) => EXIT_CONFIG,
        LogvaultError::SourceEnumeration(_) | LogvaultError::NoEligibleSources { .. } => {
            EXIT_SOURCES
        }
        _ => EXIT_FATAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LogServiceError;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            exit_code_for(&LogvaultError::Configuration("x".to_string())),
            EXIT_CONFIG
        );
        assert_eq!(
            exit_code_for(&LogvaultError::NoEligibleSources {
                message: "none".to_string(),
                available: 3,
                requested: vec!["/a".to_string()],
            }),
            EXIT_SOURCES
        );
        assert_eq!(
            exit_code_for(&LogvaultError::SourceEnumeration("throttled".to_string())),
            EXIT_SOURCES
        );
        assert_eq!(
            exit_code_for(&LogServiceError::ConnectionFailed("x".to_string()).into()),
            EXIT_FATAL
        );
    }
}
