pub mod cloudwatch;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use cloudwatch::CloudWatchLogs;

#[derive(Debug, Error)]
pub enum LogServiceError {
    #[error("{operation} failed: {message}")]
    Request {
        operation: &'static str,
        message: String,
    },

    #[error("{operation} response is missing {field}")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },

    #[error("unknown export task status code: {0}")]
    UnknownStatus(String),
}

pub type Result<T> = std::result::Result<T, LogServiceError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogGroup {
    pub name: String,
}

/// One page of `list_log_groups`. An absent `next_token` means the listing is
/// exhausted.
#[derive(Debug, Clone, Default)]
pub struct LogGroupPage {
    pub groups: Vec<LogGroup>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTaskRequest {
    pub log_group_name: String,
    pub from_ms: i64,
    pub to_ms: i64,
    pub destination_bucket: String,
    pub destination_prefix: String,
    pub task_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTaskRecord {
    pub task_id: Option<String>,
    pub status: ExportTaskStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExportTaskStatus {
    Pending,
    PendingCancel,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl ExportTaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportTaskStatus::Pending => "PENDING",
            ExportTaskStatus::PendingCancel => "PENDING_CANCEL",
            ExportTaskStatus::Running => "RUNNING",
            ExportTaskStatus::Completed => "COMPLETED",
            ExportTaskStatus::Cancelled => "CANCELLED",
            ExportTaskStatus::Failed => "FAILED",
        }
    }

    /// The service never moves a task out of these states.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExportTaskStatus::Completed | ExportTaskStatus::Cancelled | ExportTaskStatus::Failed
        )
    }
}

impl fmt::Display for ExportTaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportTaskStatus {
    type Err = LogServiceError;

    fn from_str(code: &str) -> Result<Self> {
        match code {
            "PENDING" => Ok(ExportTaskStatus::Pending),
            "PENDING_CANCEL" => Ok(ExportTaskStatus::PendingCancel),
            "RUNNING" => Ok(ExportTaskStatus::Running),
            "COMPLETED" => Ok(ExportTaskStatus::Completed),
            "CANCELLED" => Ok(ExportTaskStatus::Cancelled),
            "FAILED" => Ok(ExportTaskStatus::Failed),
            other => Err(LogServiceError::UnknownStatus(other.to_string())),
        }
    }
}

/// Control plane of the hosted log service, as seen by the export driver.
///
/// Implementations are expected to be already authenticated. Every call is a
/// remote request; none of them are retried here.
#[async_trait]
pub trait LogService: Send + Sync {
    async fn list_log_groups(&self, limit: i32, next_token: Option<String>) -> Result<LogGroupPage>;

    async fn list_tags(&self, log_group_name: &str) -> Result<HashMap<String, String>>;

    /// Returns the id the service assigned to the new task.
    async fn create_export_task(&self, request: &ExportTaskRequest) -> Result<String>;

    async fn describe_export_task(&self, task_id: &str) -> Result<Vec<ExportTaskRecord>>;
}
