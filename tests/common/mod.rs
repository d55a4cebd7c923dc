//! Scripted `LogService` and manual `Clock` shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use cloudwatch_s3_export::clock::Clock;
use cloudwatch_s3_export::config::Config;
use cloudwatch_s3_export::logs::{
    ExportTaskRecord, ExportTaskRequest, ExportTaskStatus, LogGroup, LogGroupPage, LogService,
    LogServiceError, Result,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListLogGroups {
        limit: i32,
        next_token: Option<String>,
    },
    ListTags(String),
    CreateExportTask(ExportTaskRequest),
    DescribeExportTask(String),
}

struct ScriptedGroup {
    name: String,
    tags: HashMap<String, String>,
    statuses: Vec<ExportTaskStatus>,
}

/// In-memory log service. Each group carries the sequence of statuses its
/// export task reports; the last status repeats once the script runs out.
///
/// Like CloudWatch Logs, it rejects a create while an earlier export task has
/// not been observed in a terminal state.
#[derive(Default)]
pub struct ScriptedLogService {
    pages: Vec<Vec<ScriptedGroup>>,
    failing_tags: HashSet<String>,
    failing_creates: HashSet<String>,
    stale_records: HashSet<String>,
    calls: Mutex<Vec<Call>>,
    tasks: Mutex<HashMap<String, VecDeque<ExportTaskStatus>>>,
    active_task: Mutex<Option<String>>,
    stale_tasks: Mutex<HashSet<String>>,
}

impl ScriptedLogService {
    pub fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            ..Default::default()
        }
    }

    pub fn group(mut self, name: &str, tags: &[(&str, &str)], statuses: &[ExportTaskStatus]) -> Self {
        let group = ScriptedGroup {
            name: name.to_string(),
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            statuses: statuses.to_vec(),
        };
        self.pages
            .last_mut()
            .expect("at least one page")
            .push(group);
        self
    }

    pub fn tagged(self, name: &str, statuses: &[ExportTaskStatus]) -> Self {
        self.group(name, &[("ExportLogs", "true")], statuses)
    }

    /// Groups added after this call are returned on the next page.
    pub fn page_break(mut self) -> Self {
        self.pages.push(Vec::new());
        self
    }

    pub fn fail_tags_for(mut self, name: &str) -> Self {
        self.failing_tags.insert(name.to_string());
        self
    }

    pub fn fail_create_for(mut self, name: &str) -> Self {
        self.failing_creates.insert(name.to_string());
        self
    }

    /// Describes for this group's task also return a pending record of an
    /// older, unrelated task, listed first.
    pub fn stale_record_for(mut self, name: &str) -> Self {
        self.stale_records.insert(name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn creates(&self) -> Vec<ExportTaskRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::CreateExportTask(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    pub fn describe_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::DescribeExportTask(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn find_group(&self, name: &str) -> Option<&ScriptedGroup> {
        self.pages.iter().flatten().find(|group| group.name == name)
    }
}

fn request_failed(operation: &'static str) -> LogServiceError {
    LogServiceError::Request {
        operation,
        message: "ServiceUnavailableException: scripted failure".to_string(),
    }
}

#[async_trait]
impl LogService for ScriptedLogService {
    async fn list_log_groups(&self, limit: i32, next_token: Option<String>) -> Result<LogGroupPage> {
        self.record(Call::ListLogGroups {
            limit,
            next_token: next_token.clone(),
        });

        let index = match next_token {
            None => 0,
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| request_failed("DescribeLogGroups"))?,
        };
        let page = self
            .pages
            .get(index)
            .ok_or_else(|| request_failed("DescribeLogGroups"))?;

        Ok(LogGroupPage {
            groups: page
                .iter()
                .map(|group| LogGroup {
                    name: group.name.clone(),
                })
                .collect(),
            next_token: (index + 1 < self.pages.len()).then(|| format!("page-{}", index + 1)),
        })
    }

    async fn list_tags(&self, log_group_name: &str) -> Result<HashMap<String, String>> {
        self.record(Call::ListTags(log_group_name.to_string()));

        if self.failing_tags.contains(log_group_name) {
            return Err(request_failed("ListTagsLogGroup"));
        }

        Ok(self
            .find_group(log_group_name)
            .map(|group| group.tags.clone())
            .unwrap_or_default())
    }

    async fn create_export_task(&self, request: &ExportTaskRequest) -> Result<String> {
        self.record(Call::CreateExportTask(request.clone()));

        if self.failing_creates.contains(&request.log_group_name) {
            return Err(request_failed("CreateExportTask"));
        }

        let mut active = self.active_task.lock().unwrap();
        if let Some(task_id) = active.as_ref() {
            return Err(LogServiceError::Request {
                operation: "CreateExportTask",
                message: format!("LimitExceededException: export task {} is still active", task_id),
            });
        }

        let statuses = self
            .find_group(&request.log_group_name)
            .map(|group| group.statuses.clone())
            .unwrap_or_default();

        let mut tasks = self.tasks.lock().unwrap();
        let task_id = format!("task-{}", tasks.len() + 1);
        tasks.insert(task_id.clone(), statuses.into());
        *active = Some(task_id.clone());
        if self.stale_records.contains(&request.log_group_name) {
            self.stale_tasks.lock().unwrap().insert(task_id.clone());
        }

        Ok(task_id)
    }

    async fn describe_export_task(&self, task_id: &str) -> Result<Vec<ExportTaskRecord>> {
        self.record(Call::DescribeExportTask(task_id.to_string()));

        let mut tasks = self.tasks.lock().unwrap();
        let script = tasks
            .get_mut(task_id)
            .ok_or_else(|| request_failed("DescribeExportTasks"))?;

        let status = match script.len() {
            0 => return Ok(Vec::new()),
            1 => script[0],
            _ => script.pop_front().expect("non-empty script"),
        };

        if status.is_terminal() {
            let mut active = self.active_task.lock().unwrap();
            if active.as_deref() == Some(task_id) {
                *active = None;
            }
        }

        let mut records = Vec::new();
        if self.stale_tasks.lock().unwrap().contains(task_id) {
            records.push(ExportTaskRecord {
                task_id: Some("task-0".to_string()),
                status: ExportTaskStatus::Pending,
            });
        }
        records.push(ExportTaskRecord {
            task_id: Some(task_id.to_string()),
            status,
        });
        Ok(records)
    }
}

/// Clock whose time only moves when the driver sleeps.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
    sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        let mut now = self.now.lock().unwrap();
        *now += chrono::Duration::from_std(duration).expect("sleep fits in chrono duration");
    }
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.bucket = "log-archive".to_string();
    config
}
