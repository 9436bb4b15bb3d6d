//! CloudWatch Logs JSON 1.1 wire models
//!
//! These structures mirror the request and response bodies of the
//! `Logs_20140328` API and are kept separate from the boundary models in
//! [`crate::adapters::traits`].

use crate::adapters::traits::{
    CreateExportTaskRequest, ExportTaskDescription, ExportTaskStatus, LogSource,
};
use crate::domain::ids::{SourceId, TaskId};
use crate::domain::{LogServiceError, LogvaultError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExportTaskBody<'a> {
    pub task_name: &'a str,
    pub log_group_name: &'a str,
    pub from: i64,
    pub to: i64,
    pub destination: &'a str,
    pub destination_prefix: &'a str,
}

impl<'a> From<&'a CreateExportTaskRequest> for CreateExportTaskBody<'a> {
    fn from(request: &'a CreateExportTaskRequest) -> Self {
        Self {
            task_name: &request.task_name,
            log_group_name: request.source.as_str(),
            from: request.from_millis,
            to: request.to_millis,
            destination: request.destination.as_str(),
            destination_prefix: &request.destination_prefix,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExportTaskResponse {
    pub task_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeExportTasksBody<'a> {
    pub task_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeExportTasksResponse {
    #[serde(default)]
    pub export_tasks: Vec<ExportTaskWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportTaskWire {
    pub task_id: Option<String>,
    pub task_name: Option<String>,
    pub log_group_name: Option<String>,
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub destination: Option<String>,
    pub destination_prefix: Option<String>,
    pub status: Option<ExportTaskStatus>,
    pub execution_info: Option<ExecutionInfoWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionInfoWire {
    pub creation_time: Option<i64>,
    pub completion_time: Option<i64>,
}

impl ExportTaskWire {
    /// Convert to the boundary description
    ///
    /// # Errors
    ///
    /// Returns an invalid-response error when the task id or status is missing.
    pub fn into_description(self) -> Result<ExportTaskDescription> {
        let task_id = self
            .task_id
            .ok_or_else(|| invalid_response("export task without taskId"))
            .and_then(|id| TaskId::new(id).map_err(invalid_response))?;
        let status = self
            .status
            .ok_or_else(|| invalid_response(format!("export task {task_id} without status")))?;

        let mut description = ExportTaskDescription::new(task_id, status);
        description.task_name = self.task_name;
        description.source = self.log_group_name;
        description.from_millis = self.from;
        description.to_millis = self.to;
        description.destination = self.destination;
        description.destination_prefix = self.destination_prefix;
        if let Some(info) = self.execution_info {
            description.creation_time = info.creation_time;
            description.completion_time = info.completion_time;
        }
        Ok(description)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeLogGroupsBody<'a> {
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_group_name_prefix: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeLogGroupsResponse {
    #[serde(default)]
    pub log_groups: Vec<LogGroupWire>,
    pub next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogGroupWire {
    pub log_group_name: Option<String>,
    pub arn: Option<String>,
    pub creation_time: Option<i64>,
    pub retention_in_days: Option<u32>,
    pub stored_bytes: Option<u64>,
}

impl LogGroupWire {
    /// Convert to a boundary source; groups without a usable name are dropped
    pub fn into_source(self) -> Option<LogSource> {
        let id = SourceId::new(self.log_group_name?).ok()?;
        Some(LogSource {
            id,
            arn: self.arn,
            creation_time: self.creation_time,
            retention_in_days: self.retention_in_days,
            stored_bytes: self.stored_bytes,
        })
    }
}

/// Error body returned by the service on non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "__type")]
    pub error_type: Option<String>,
    #[serde(alias = "Message")]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Short error code: the part of `__type` after the last '#'
    pub fn code(&self) -> &str {
        self.error_type
            .as_deref()
            .map(|t| t.rsplit('#').next().unwrap_or(t))
            .unwrap_or("UnknownError")
    }
}

fn invalid_response(message: impl Into<String>) -> LogvaultError {
    LogvaultError::LogService(LogServiceError::InvalidResponse(message.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::traits::ExportTaskStatusCode;
    use crate::domain::ids::BucketName;

    #[test]
    fn test_create_body_uses_wire_names() {
        let request = CreateExportTaskRequest {
            task_name: "5b1c".to_string(),
            source: SourceId::new("/aws/ecs/app-a").unwrap(),
            from_millis: 1_709_164_800_000,
            to_millis: 1_709_251_200_000,
            destination: BucketName::new("cw-logroup-to-s3").unwrap(),
            destination_prefix: "aws-ecs-app-a/2024/2/29".to_string(),
        };

        let json = serde_json::to_value(CreateExportTaskBody::from(&request)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "taskName": "5b1c",
                "logGroupName": "/aws/ecs/app-a",
                "from": 1_709_164_800_000_i64,
                "to": 1_709_251_200_000_i64,
                "destination": "cw-logroup-to-s3",
                "destinationPrefix": "aws-ecs-app-a/2024/2/29"
            })
        );
    }

    #[test]
    fn test_export_task_conversion() {
        let body = r#"{
            "exportTasks": [{
                "taskId": "t-1",
                "taskName": "n",
                "logGroupName": "/aws/ecs/app-a",
                "from": 1, "to": 2,
                "destination": "cw-logroup-to-s3",
                "destinationPrefix": "aws-ecs-app-a/2024/2/29",
                "status": {"code": "RUNNING", "message": "Started"},
                "executionInfo": {"creationTime": 10}
            }]
        }"#;
        let response: DescribeExportTasksResponse = serde_json::from_str(body).unwrap();
        let description = response
            .export_tasks
            .into_iter()
            .next()
            .unwrap()
            .into_description()
            .unwrap();

        assert_eq!(description.task_id.as_str(), "t-1");
        assert_eq!(description.status.code, ExportTaskStatusCode::Running);
        assert_eq!(description.status.message.as_deref(), Some("Started"));
        assert_eq!(description.creation_time, Some(10));
        assert_eq!(description.completion_time, None);
    }

    #[test]
    fn test_export_task_without_status_is_invalid() {
        let wire: ExportTaskWire = serde_json::from_str(r#"{"taskId":"t-1"}"#).unwrap();
        assert!(wire.into_description().is_err());
    }

    #[test]
    fn test_describe_log_groups_body_omits_absent_fields() {
        let body = DescribeLogGroupsBody {
            limit: 50,
            next_token: None,
            log_group_name_prefix: Some("/aws/ecs"),
        };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({"limit": 50, "logGroupNamePrefix": "/aws/ecs"})
        );
    }

    #[test]
    fn test_error_code_strips_namespace() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"__type":"com.amazonaws.logs#ResourceNotFoundException","message":"nope"}"#,
        )
        .unwrap();
        assert_eq!(body.code(), "ResourceNotFoundException");

        let bare: ErrorBody = serde_json::from_str(r#"{"Message":"x"}"#).unwrap();
        assert_eq!(bare.code(), "UnknownError");
        assert_eq!(bare.message.as_deref(), Some("x"));
    }
}
