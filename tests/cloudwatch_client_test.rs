//! Integration tests for the CloudWatch Logs client against a mock HTTP server

use logvault::adapters::aws::{AwsCredentials, SigV4Signer};
use logvault::adapters::cloudwatch::CloudWatchLogsClient;
use logvault::adapters::traits::{
    CreateExportTaskRequest, ExportTaskStatusCode, LogService, LogSourceEnumerator,
};
use logvault::config::secret_string;
use logvault::domain::{BucketName, LogServiceError, LogvaultError, SourceId, TaskId};
use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;

const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

fn client(server: &Server, page_size: u32) -> CloudWatchLogsClient {
    let signer = SigV4Signer::new(
        AwsCredentials::new("AKIDEXAMPLE", secret_string("wJalrXUtnFEMI/K7MDENG"), None),
        "us-east-1",
        "logs",
    );
    CloudWatchLogsClient::new(signer, &server.url(), Duration::from_secs(5), page_size).unwrap()
}

fn target(operation: &str) -> String {
    format!("Logs_20140328.{operation}")
}

#[tokio::test]
async fn test_create_export_task_sends_signed_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_header("x-amz-target", target("CreateExportTask").as_str())
        .match_header("content-type", CONTENT_TYPE)
        .match_header(
            "authorization",
            Matcher::Regex(r"^AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/\d{8}/us-east-1/logs/aws4_request".to_string()),
        )
        .match_header("x-amz-date", Matcher::Regex(r"^\d{8}T\d{6}Z$".to_string()))
        .match_body(Matcher::Json(json!({
            "taskName": "6f1c2a",
            "logGroupName": "/aws/ecs/app-a",
            "from": 1709164800000i64,
            "to": 1709251200000i64,
            "destination": "cw-logroup-to-s3",
            "destinationPrefix": "aws-ecs-app-a/2024/2/29"
        })))
        .with_status(200)
        .with_header("content-type", CONTENT_TYPE)
        .with_body(r#"{"taskId":"efb0b8f3-1b3c-4a3f-9b55-5b0f3e1f4a11"}"#)
        .create_async()
        .await;

    let request = CreateExportTaskRequest {
        task_name: "6f1c2a".to_string(),
        source: SourceId::new("/aws/ecs/app-a").unwrap(),
        from_millis: 1_709_164_800_000,
        to_millis: 1_709_251_200_000,
        destination: BucketName::new("cw-logroup-to-s3").unwrap(),
        destination_prefix: "aws-ecs-app-a/2024/2/29".to_string(),
    };

    let task_id = client(&server, 50).create_export_task(&request).await.unwrap();

    assert_eq!(task_id.as_str(), "efb0b8f3-1b3c-4a3f-9b55-5b0f3e1f4a11");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_describe_export_task_parses_status() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_header("x-amz-target", target("DescribeExportTasks").as_str())
        .match_body(Matcher::Json(json!({"taskId": "task-1"})))
        .with_status(200)
        .with_body(
            json!({
                "exportTasks": [{
                    "taskId": "task-1",
                    "taskName": "6f1c2a",
                    "logGroupName": "/aws/ecs/app-a",
                    "from": 1709164800000i64,
                    "to": 1709251200000i64,
                    "destination": "cw-logroup-to-s3",
                    "destinationPrefix": "aws-ecs-app-a/2024/2/29",
                    "status": {"code": "RUNNING", "message": "Started"},
                    "executionInfo": {"creationTime": 1709337600000i64}
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let description = client(&server, 50)
        .describe_export_task(&TaskId::new("task-1").unwrap())
        .await
        .unwrap();

    assert_eq!(description.task_id.as_str(), "task-1");
    assert_eq!(description.status.code, ExportTaskStatusCode::Running);
    assert_eq!(description.status.message.as_deref(), Some("Started"));
    assert_eq!(description.source.as_deref(), Some("/aws/ecs/app-a"));
    assert_eq!(description.creation_time, Some(1_709_337_600_000));
    assert_eq!(description.completion_time, None);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_describe_unknown_task_is_not_found() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/")
        .match_header("x-amz-target", target("DescribeExportTasks").as_str())
        .with_status(200)
        .with_body(r#"{"exportTasks":[]}"#)
        .create_async()
        .await;

    let err = client(&server, 50)
        .describe_export_task(&TaskId::new("missing").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LogvaultError::LogService(LogServiceError::TaskNotFound(ref id)) if id == "missing"
    ));
}

#[tokio::test]
async fn test_service_error_maps_type_and_message() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(400)
        .with_header("content-type", CONTENT_TYPE)
        .with_body(
            r#"{"__type":"com.amazonaws.logs#LimitExceededException","message":"Resource limit exceeded."}"#,
        )
        .create_async()
        .await;

    let request = CreateExportTaskRequest {
        task_name: "n".to_string(),
        source: SourceId::new("/aws/ecs/app-a").unwrap(),
        from_millis: 0,
        to_millis: 86_400_000,
        destination: BucketName::new("cw-logroup-to-s3").unwrap(),
        destination_prefix: "aws-ecs-app-a/1970/1/1".to_string(),
    };

    let err = client(&server, 50)
        .create_export_task(&request)
        .await
        .unwrap_err();

    match err {
        LogvaultError::LogService(LogServiceError::Rejected { code, message }) => {
            assert_eq!(code, "LimitExceededException");
            assert_eq!(message, "Resource limit exceeded.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unparseable_error_body_keeps_http_status() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(503)
        .with_body("Service Unavailable")
        .create_async()
        .await;

    let err = client(&server, 50).list_all().await.unwrap_err();

    match err {
        LogvaultError::LogService(LogServiceError::Rejected { code, message }) => {
            assert_eq!(code, "HTTP503");
            assert_eq!(message, "Service Unavailable");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_describe_log_groups_follows_pagination() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("POST", "/")
        .match_header("x-amz-target", target("DescribeLogGroups").as_str())
        .match_body(Matcher::Json(json!({"limit": 2, "logGroupNamePrefix": "/aws/ecs/"})))
        .with_status(200)
        .with_body(
            json!({
                "logGroups": [
                    {"logGroupName": "/aws/ecs/app-a", "storedBytes": 1024},
                    {"logGroupName": "/aws/ecs/app-b", "retentionInDays": 14}
                ],
                "nextToken": "page-2"
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("POST", "/")
        .match_header("x-amz-target", target("DescribeLogGroups").as_str())
        .match_body(Matcher::Json(json!({
            "limit": 2,
            "nextToken": "page-2",
            "logGroupNamePrefix": "/aws/ecs/"
        })))
        .with_status(200)
        .with_body(json!({"logGroups": [{"logGroupName": "/aws/ecs/app-c"}]}).to_string())
        .expect(1)
        .create_async()
        .await;

    let sources = client(&server, 2)
        .list_with_prefix("/aws/ecs/")
        .await
        .unwrap();

    let names: Vec<_> = sources.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(names, vec!["/aws/ecs/app-a", "/aws/ecs/app-b", "/aws/ecs/app-c"]);
    assert_eq!(sources[0].stored_bytes, Some(1024));
    assert_eq!(sources[1].retention_in_days, Some(14));
    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn test_repeated_next_token_stops_pagination() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("POST", "/")
        .match_body(Matcher::Json(json!({"limit": 50})))
        .with_status(200)
        .with_body(r#"{"logGroups":[{"logGroupName":"/a"}],"nextToken":"same"}"#)
        .expect(1)
        .create_async()
        .await;
    let repeat = server
        .mock("POST", "/")
        .match_body(Matcher::Json(json!({"limit": 50, "nextToken": "same"})))
        .with_status(200)
        .with_body(r#"{"logGroups":[{"logGroupName":"/b"}],"nextToken":"same"}"#)
        .expect(1)
        .create_async()
        .await;

    let sources = client(&server, 50).list_all().await.unwrap();

    assert_eq!(sources.len(), 2);
    first.assert_async().await;
    repeat.assert_async().await;
}
