use crate::window::WindowAnchor;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_OPT_IN_TAG: &str = "ExportLogs";

/// Largest page CloudWatch Logs accepts for DescribeLogGroups.
pub const MAX_PAGE_SIZE: i32 = 50;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Destination bucket. `S3_BUCKET_NAME` takes precedence when set.
    pub bucket: String,
    pub export: ExportConfig,
    pub polling: PollingConfig,
    pub errors: ErrorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub opt_in_tag: String,
    pub page_size: i32,
    /// Follow continuation tokens past the first page of log groups.
    pub paginate: bool,
    pub window_anchor: WindowAnchor,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            opt_in_tag: DEFAULT_OPT_IN_TAG.to_string(),
            page_size: MAX_PAGE_SIZE,
            paginate: true,
            window_anchor: WindowAnchor::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
    /// Upper bound on how long a single export task is polled. Unbounded when absent.
    #[serde(with = "humantime_serde")]
    pub max_wait: Option<Duration>,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_wait: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorConfig {
    pub on_group_error: GroupErrorStrategy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupErrorStrategy {
    /// Stop the sweep at the first failed call.
    #[default]
    Abort,
    /// Record the failure and move on to the next log group.
    Continue,
}
