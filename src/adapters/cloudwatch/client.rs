//! CloudWatch Logs client
//!
//! Speaks the JSON 1.1 protocol directly over `reqwest`, signing each request
//! with SigV4. Implements [`LogService`] for export tasks and
//! [`LogSourceEnumerator`] for log group discovery.

use super::models::{
    CreateExportTaskBody, CreateExportTaskResponse, DescribeExportTasksBody,
    DescribeExportTasksResponse, DescribeLogGroupsBody, DescribeLogGroupsResponse, ErrorBody,
};
use crate::adapters::aws::{resolve_region, AwsCredentials, SigV4Signer};
use crate::adapters::traits::{
    CreateExportTaskRequest, ExportTaskDescription, LogService, LogSource, LogSourceEnumerator,
};
use crate::config::LogvaultConfig;
use crate::domain::ids::TaskId;
use crate::domain::{LogServiceError, LogvaultError, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

const CONTENT_TYPE: &str = "application/x-amz-json-1.1";
const TARGET_PREFIX: &str = "Logs_20140328";

/// CloudWatch Logs API client
///
/// # Example
///
/// ```no_run
/// use logvault::adapters::cloudwatch::CloudWatchLogsClient;
/// use logvault::adapters::traits::LogSourceEnumerator;
/// use logvault::config::parse_config;
///
/// # async fn example() -> logvault::domain::Result<()> {
/// let config = parse_config(r#"
/// [aws]
/// region = "us-east-1"
/// [export]
/// destination_bucket = "cw-logroup-to-s3"
/// "#)?;
/// let client = CloudWatchLogsClient::from_config(&config)?;
/// let groups = client.list_all().await?;
/// # Ok(())
/// # }
/// ```
pub struct CloudWatchLogsClient {
    client: Client,
    endpoint: Url,
    signer: SigV4Signer,
    page_size: u32,
}

impl CloudWatchLogsClient {
    /// Create a client for an explicit endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid URL or the HTTP client
    /// cannot be built.
    pub fn new(
        signer: SigV4Signer,
        endpoint: &str,
        request_timeout: Duration,
        page_size: u32,
    ) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            LogvaultError::Configuration(format!("Invalid logs endpoint '{endpoint}': {e}"))
        })?;

        let client = ClientBuilder::new()
            .timeout(request_timeout)
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                LogvaultError::LogService(LogServiceError::ConnectionFailed(format!(
                    "Failed to build HTTP client: {e}"
                )))
            })?;

        Ok(Self {
            client,
            endpoint,
            signer,
            page_size,
        })
    }

    /// Create a client from the `[aws]` and `[sources]` configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if region or credentials cannot be resolved.
    pub fn from_config(config: &LogvaultConfig) -> Result<Self> {
        let region = resolve_region(&config.aws)?;
        let credentials = AwsCredentials::resolve(&config.aws)?;
        let endpoint = config
            .aws
            .logs_endpoint
            .clone()
            .unwrap_or_else(|| format!("https://logs.{region}.amazonaws.com/"));

        Self::new(
            SigV4Signer::new(credentials, region, "logs"),
            &endpoint,
            config.aws.request_timeout(),
            config.sources.page_size,
        )
    }

    /// Endpoint this client talks to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn call<B, R>(&self, operation: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body)?;
        let target = format!("{TARGET_PREFIX}.{operation}");
        let signed = self.signer.sign(
            "POST",
            &self.endpoint,
            &[("content-type", CONTENT_TYPE), ("x-amz-target", target.as_str())],
            &payload,
            Utc::now(),
        )?;

        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header("content-type", CONTENT_TYPE)
            .header("x-amz-target", target.as_str());
        for (name, value) in signed {
            request = request.header(name, value);
        }

        tracing::debug!(operation = %operation, endpoint = %self.endpoint, "Calling CloudWatch Logs");

        let response = request.body(payload).send().await.map_err(|e| {
            LogvaultError::LogService(LogServiceError::ConnectionFailed(format!(
                "{operation}: {e}"
            )))
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            LogvaultError::LogService(LogServiceError::ConnectionFailed(format!(
                "{operation}: failed to read response body: {e}"
            )))
        })?;

        if !status.is_success() {
            let (code, message) = match serde_json::from_slice::<ErrorBody>(&bytes) {
                Ok(error) => (
                    error.code().to_string(),
                    error.message.clone().unwrap_or_default(),
                ),
                Err(_) => (
                    format!("HTTP{}", status.as_u16()),
                    String::from_utf8_lossy(&bytes).into_owned(),
                ),
            };
            tracing::debug!(operation = %operation, status = %status, code = %code, "CloudWatch Logs rejected request");
            return Err(LogvaultError::LogService(LogServiceError::Rejected {
                code,
                message,
            }));
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            LogvaultError::LogService(LogServiceError::InvalidResponse(format!(
                "{operation}: {e}"
            )))
        })
    }

    async fn describe_log_groups(&self, prefix: Option<&str>) -> Result<Vec<LogSource>> {
        let mut sources = Vec::new();
        let mut next_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let body = DescribeLogGroupsBody {
                limit: self.page_size,
                next_token: next_token.as_deref(),
                log_group_name_prefix: prefix,
            };
            let page: DescribeLogGroupsResponse = self.call("DescribeLogGroups", &body).await?;
            pages += 1;

            sources.extend(page.log_groups.into_iter().filter_map(|g| g.into_source()));

            match page.next_token {
                Some(token) if Some(&token) != next_token.as_ref() => next_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!(
            pages = pages,
            sources = sources.len(),
            prefix = prefix.unwrap_or(""),
            "Enumerated log groups"
        );

        Ok(sources)
    }
}

#[async_trait]
impl LogService for CloudWatchLogsClient {
    async fn create_export_task(&self, request: &CreateExportTaskRequest) -> Result<TaskId> {
        let response: CreateExportTaskResponse = self
            .call("CreateExportTask", &CreateExportTaskBody::from(request))
            .await?;

        let task_id = response.task_id.ok_or_else(|| {
            LogvaultError::LogService(LogServiceError::InvalidResponse(
                "CreateExportTask response without taskId".to_string(),
            ))
        })?;

        TaskId::new(task_id)
            .map_err(|e| LogvaultError::LogService(LogServiceError::InvalidResponse(e)))
    }

    async fn describe_export_task(&self, task_id: &TaskId) -> Result<ExportTaskDescription> {
        let response: DescribeExportTasksResponse = self
            .call(
                "DescribeExportTasks",
                &DescribeExportTasksBody {
                    task_id: task_id.as_str(),
                },
            )
            .await?;

        response
            .export_tasks
            .into_iter()
            .next()
            .ok_or_else(|| {
                LogvaultError::LogService(LogServiceError::TaskNotFound(task_id.to_string()))
            })?
            .into_description()
    }
}

#[async_trait]
impl LogSourceEnumerator for CloudWatchLogsClient {
    async fn list_all(&self) -> Result<Vec<LogSource>> {
        self.describe_log_groups(None).await
    }

    async fn list_with_prefix(&self, prefix: &str) -> Result<Vec<LogSource>> {
        self.describe_log_groups(Some(prefix)).await
    }
}
