//! AWS credential and region resolution
//!
//! Values from the `[aws]` configuration section win; otherwise the standard
//! `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_SESSION_TOKEN`,
//! `AWS_REGION` and `AWS_DEFAULT_REGION` environment variables are used.

use crate::config::{secret_string, AwsConfig, SecretString};
use crate::domain::{LogvaultError, Result};
use secrecy::ExposeSecret;

/// Static credentials used to sign requests
#[derive(Debug, Clone)]
pub struct AwsCredentials {
    access_key_id: String,
    secret_access_key: SecretString,
    session_token: Option<SecretString>,
}

impl AwsCredentials {
    /// Create credentials from explicit values
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: SecretString,
        session_token: Option<SecretString>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key,
            session_token,
        }
    }

    /// Resolve credentials from configuration, falling back to the environment
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no access key id or secret key can be found.
    pub fn resolve(config: &AwsConfig) -> Result<Self> {
        let access_key_id = config
            .access_key_id
            .clone()
            .or_else(|| std::env::var("AWS_ACCESS_KEY_ID").ok())
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                LogvaultError::Configuration(
                    "AWS access key id not found in [aws] or AWS_ACCESS_KEY_ID".to_string(),
                )
            })?;

        let secret_access_key = match &config.secret_access_key {
            Some(secret) if !secret.expose_secret().is_empty() => secret.clone(),
            _ => std::env::var("AWS_SECRET_ACCESS_KEY")
                .ok()
                .filter(|v| !v.is_empty())
                .map(secret_string)
                .ok_or_else(|| {
                    LogvaultError::Configuration(
                        "AWS secret access key not found in [aws] or AWS_SECRET_ACCESS_KEY"
                            .to_string(),
                    )
                })?,
        };

        let session_token = config.session_token.clone().or_else(|| {
            std::env::var("AWS_SESSION_TOKEN")
                .ok()
                .filter(|v| !v.is_empty())
                .map(secret_string)
        });

        Ok(Self::new(access_key_id, secret_access_key, session_token))
    }

    /// Access key id
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Secret access key
    pub fn secret_access_key(&self) -> &str {
        self.secret_access_key.expose_secret().as_ref()
    }

    /// Session token for temporary credentials
    pub fn session_token(&self) -> Option<&str> {
        self.session_token
            .as_ref()
            .map(|token| token.expose_secret().as_ref())
    }
}

/// Resolve the AWS region from configuration or the environment
///
/// # Errors
///
/// Returns a configuration error if no region is configured anywhere.
pub fn resolve_region(config: &AwsConfig) -> Result<String> {
    config
        .region
        .clone()
        .or_else(|| std::env::var("AWS_REGION").ok())
        .or_else(|| std::env::var("AWS_DEFAULT_REGION").ok())
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            LogvaultError::Configuration(
                "AWS region not found in [aws], AWS_REGION or AWS_DEFAULT_REGION".to_string(),
            )
        })
}
