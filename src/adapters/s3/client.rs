//! S3 bucket existence guard
//!
//! Issues a signed `HeadBucket` request. Uses virtual-hosted addressing
//! against AWS, and path-style addressing when an endpoint override is set
//! (LocalStack, MinIO and similar).

use crate::adapters::aws::{resolve_region, AwsCredentials, SigV4Signer};
use crate::adapters::traits::ObjectStoreGuard;
use crate::config::LogvaultConfig;
use crate::domain::ids::BucketName;
use crate::domain::{LogvaultError, ObjectStoreError, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;
use url::Url;

/// Checks destination buckets with `HeadBucket`
pub struct S3BucketGuard {
    client: Client,
    signer: SigV4Signer,
    endpoint: Option<Url>,
}

impl S3BucketGuard {
    /// Create a guard; `endpoint` switches to path-style requests against that URL
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is invalid or the HTTP client cannot be built.
    pub fn new(
        signer: SigV4Signer,
        endpoint: Option<&str>,
        request_timeout: Duration,
    ) -> Result<Self> {
        let endpoint = endpoint
            .map(|e| {
                Url::parse(e).map_err(|err| {
                    LogvaultError::Configuration(format!("Invalid S3 endpoint '{e}': {err}"))
                })
            })
            .transpose()?;

        let client = ClientBuilder::new()
            .timeout(request_timeout)
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                LogvaultError::ObjectStore(ObjectStoreError::RequestFailed(format!(
                    "Failed to build HTTP client: {e}"
                )))
            })?;

        Ok(Self {
            client,
            signer,
            endpoint,
        })
    }

    /// Create a guard from the `[aws]` configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if region or credentials cannot be resolved.
    pub fn from_config(config: &LogvaultConfig) -> Result<Self> {
        let region = resolve_region(&config.aws)?;
        let credentials = AwsCredentials::resolve(&config.aws)?;
        Self::new(
            SigV4Signer::new(credentials, region, "s3"),
            config.aws.s3_endpoint.as_deref(),
            config.aws.request_timeout(),
        )
    }

    /// URL addressed by `HeadBucket` for `bucket`
    pub fn bucket_url(&self, bucket: &BucketName) -> Result<Url> {
        let url = match &self.endpoint {
            Some(endpoint) => {
                let base = endpoint.as_str().trim_end_matches('/');
                format!("{base}/{bucket}")
            }
            None => format!(
                "https://{bucket}.s3.{}.amazonaws.com/",
                self.signer.region()
            ),
        };
        Url::parse(&url).map_err(|e| {
            LogvaultError::ObjectStore(ObjectStoreError::RequestFailed(format!(
                "Invalid bucket URL '{url}': {e}"
            )))
        })
    }
}

#[async_trait]
impl ObjectStoreGuard for S3BucketGuard {
    async fn ensure_bucket_exists(&self, bucket: &BucketName) -> Result<()> {
        let url = self.bucket_url(bucket)?;
        let signed = self.signer.sign("HEAD", &url, &[], b"", Utc::now())?;

        let mut request = self.client.head(url);
        for (name, value) in signed {
            request = request.header(name, value);
        }

        let response = request.send().await.map_err(|e| {
            LogvaultError::ObjectStore(ObjectStoreError::RequestFailed(format!("{bucket}: {e}")))
        })?;

        let status = response.status();
        tracing::debug!(bucket = %bucket, status = %status, "HeadBucket");

        match status {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(ObjectStoreError::BucketNotFound(bucket.to_string()).into()),
            StatusCode::FORBIDDEN => Err(ObjectStoreError::AccessDenied(bucket.to_string()).into()),
            other => Err(ObjectStoreError::RequestFailed(format!(
                "{bucket}: unexpected status {other}"
            ))
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn signer() -> SigV4Signer {
        SigV4Signer::new(
            AwsCredentials::new("AKIDEXAMPLE", secret_string("secret"), None),
            "eu-west-1",
            "s3",
        )
    }

    #[test]
    fn test_virtual_hosted_url() {
        let guard = S3BucketGuard::new(signer(), None, Duration::from_secs(5)).unwrap();
        let bucket = BucketName::new("cw-logroup-to-s3").unwrap();
        assert_eq!(
            guard.bucket_url(&bucket).unwrap().as_str(),
            "https://cw-logroup-to-s3.s3.eu-west-1.amazonaws.com/"
        );
    }

    #[test]
    fn test_path_style_url_with_endpoint() {
        let guard = S3BucketGuard::new(
            signer(),
            Some("http://localhost:4566/"),
            Duration::from_secs(5),
        )
        .unwrap();
        let bucket = BucketName::new("cw-logroup-to-s3").unwrap();
        assert_eq!(
            guard.bucket_url(&bucket).unwrap().as_str(),
            "http://localhost:4566/cw-logroup-to-s3"
        );
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        assert!(S3BucketGuard::new(signer(), Some("not a url"), Duration::from_secs(5)).is_err());
    }
}
