use super::{
    ExportTaskRecord, ExportTaskRequest, LogGroup, LogGroupPage, LogService, LogServiceError,
    Result,
};
use async_trait::async_trait;
use aws_sdk_cloudwatchlogs::error::DisplayErrorContext;
use aws_sdk_cloudwatchlogs::Client;
use std::collections::HashMap;
use tracing::debug;

/// `LogService` backed by the CloudWatch Logs API.
#[derive(Debug, Clone)]
pub struct CloudWatchLogs {
    client: Client,
}

impl CloudWatchLogs {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn request_error<E>(operation: &'static str, err: E) -> LogServiceError
where
    E: std::error::Error,
{
    LogServiceError::Request {
        operation,
        message: DisplayErrorContext(err).to_string(),
    }
}

#[async_trait]
impl LogService for CloudWatchLogs {
    async fn list_log_groups(&self, limit: i32, next_token: Option<String>) -> Result<LogGroupPage> {
        let output = self
            .client
            .describe_log_groups()
            .limit(limit)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| request_error("DescribeLogGroups", e))?;

        let groups = output
            .log_groups()
            .iter()
            .map(|group| {
                group
                    .log_group_name()
                    .map(|name| LogGroup {
                        name: name.to_string(),
                    })
                    .ok_or(LogServiceError::MissingField {
                        operation: "DescribeLogGroups",
                        field: "logGroupName",
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            groups = groups.len(),
            has_more = output.next_token().is_some(),
            "Listed log groups"
        );

        Ok(LogGroupPage {
            groups,
            next_token: output.next_token().map(str::to_string),
        })
    }

    async fn list_tags(&self, log_group_name: &str) -> Result<HashMap<String, String>> {
        // ListTagsForResource needs the group ARN, which DescribeLogGroups only
        // returns for some identities; the by-name call still works everywhere.
        #[allow(deprecated)]
        let output = self
            .client
            .list_tags_log_group()
            .log_group_name(log_group_name)
            .send()
            .await
            .map_err(|e| request_error("ListTagsLogGroup", e))?;

        Ok(output.tags().cloned().unwrap_or_default())
    }

    async fn create_export_task(&self, request: &ExportTaskRequest) -> Result<String> {
        let output = self
            .client
            .create_export_task()
            .log_group_name(&request.log_group_name)
            .from(request.from_ms)
            .to(request.to_ms)
            .destination(&request.destination_bucket)
            .destination_prefix(&request.destination_prefix)
            .task_name(&request.task_name)
            .send()
            .await
            .map_err(|e| request_error("CreateExportTask", e))?;

        output
            .task_id()
            .map(str::to_string)
            .ok_or(LogServiceError::MissingField {
                operation: "CreateExportTask",
                field: "taskId",
            })
    }

    async fn describe_export_task(&self, task_id: &str) -> Result<Vec<ExportTaskRecord>> {
        let output = self
            .client
            .describe_export_tasks()
            .task_id(task_id)
            .send()
            .await
            .map_err(|e| request_error("DescribeExportTasks", e))?;

        output
            .export_tasks()
            .iter()
            .map(|task| {
                let code = task
                    .status()
                    .and_then(|status| status.code())
                    .ok_or(LogServiceError::MissingField {
                        operation: "DescribeExportTasks",
                        field: "status.code",
                    })?;

                Ok(ExportTaskRecord {
                    task_id: task.task_id().map(str::to_string),
                    status: code.as_str().parse()?,
                })
            })
            .collect()
    }
}
