use super::report::{ExportOutcome, GroupFailure, SweepReport};
use crate::clock::{format_wall_clock, Clock};
use crate::config::types::{Config, GroupErrorStrategy};
use crate::logs::{ExportTaskRequest, ExportTaskStatus, LogGroup, LogService, LogServiceError};
use crate::window::{short_group_name, task_name, TimeWindow, WindowAnchor};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("log service error: {0}")]
    LogService(#[from] LogServiceError),

    #[error("describe returned no record for export task {task_id}")]
    MissingTaskRecord { task_id: String },

    #[error("export task {task_id} still not finished after {waited:?}")]
    PollTimeout { task_id: String, waited: Duration },
}

/// A failed group, and whether its export task may still hold the account's
/// single export slot.
struct GroupError {
    error: ExportError,
    task_active: bool,
}

impl From<ExportError> for GroupError {
    fn from(error: ExportError) -> Self {
        Self {
            error,
            task_active: false,
        }
    }
}

impl From<LogServiceError> for GroupError {
    fn from(error: LogServiceError) -> Self {
        ExportError::from(error).into()
    }
}

/// Runs sweeps: one export task per opted-in log group, strictly one at a
/// time, each polled to a terminal status before the next group is touched.
///
/// CloudWatch Logs allows a single active export task per account, so the
/// sequencing here is required for correctness.
pub struct ExportDriver {
    logs: Arc<dyn LogService>,
    clock: Arc<dyn Clock>,
    bucket: String,
    opt_in_tag: String,
    page_size: i32,
    paginate: bool,
    window_anchor: WindowAnchor,
    poll_interval: Duration,
    max_wait: Option<Duration>,
    on_group_error: GroupErrorStrategy,
}

impl ExportDriver {
    pub fn new(logs: Arc<dyn LogService>, clock: Arc<dyn Clock>, config: &Config) -> Self {
        Self {
            logs,
            clock,
            bucket: config.bucket.clone(),
            opt_in_tag: config.export.opt_in_tag.clone(),
            page_size: config.export.page_size,
            paginate: config.export.paginate,
            window_anchor: config.export.window_anchor,
            poll_interval: config.polling.interval,
            max_wait: config.polling.max_wait,
            on_group_error: config.errors.on_group_error,
        }
    }

    pub async fn run_sweep(&self) -> Result<SweepReport, ExportError> {
        let started_at = self.clock.now();
        let mut report = SweepReport::new(started_at);

        info!(bucket = %self.bucket, "Starting log export sweep");

        let groups = self.list_log_groups().await?;
        report.groups_seen = groups.len();

        for group in &groups {
            match self.export_group(group, started_at).await {
                Ok(Some(outcome)) => report.exported.push(outcome),
                Ok(None) => report.skipped.push(group.name.clone()),
                Err(GroupError { error, task_active }) => match self.on_group_error {
                    GroupErrorStrategy::Abort => return Err(error),
                    // Another create would be rejected while this task runs
                    GroupErrorStrategy::Continue if task_active => {
                        error!(log_group = %group.name, error = %error, "Export task state unknown, stopping sweep");
                        return Err(error);
                    }
                    GroupErrorStrategy::Continue => {
                        error!(log_group = %group.name, error = %error, "Export of log group failed, continuing");
                        report.failures.push(GroupFailure {
                            log_group: group.name.clone(),
                            error: error.to_string(),
                        });
                    }
                },
            }
        }

        info!(
            groups = report.groups_seen,
            exported = report.exported.len(),
            skipped = report.skipped.len(),
            failed = report.failures.len(),
            "Log export sweep finished"
        );

        Ok(report)
    }

    async fn list_log_groups(&self) -> Result<Vec<LogGroup>, ExportError> {
        let mut groups = Vec::new();
        let mut next_token = None;

        loop {
            let page = self
                .logs
                .list_log_groups(self.page_size, next_token.take())
                .await?;
            groups.extend(page.groups);

            match page.next_token.filter(|token| !token.is_empty()) {
                Some(token) if self.paginate => next_token = Some(token),
                Some(_) => {
                    warn!(
                        listed = groups.len(),
                        "More log groups are available but pagination is disabled; ignoring the rest"
                    );
                    break;
                }
                None => break,
            }
        }

        debug!(groups = groups.len(), "Enumerated log groups");
        Ok(groups)
    }

    /// Returns `None` when the group is not opted in.
    async fn export_group(
        &self,
        group: &LogGroup,
        sweep_started_at: DateTime<Utc>,
    ) -> Result<Option<ExportOutcome>, GroupError> {
        let tags = self.logs.list_tags(&group.name).await?;
        if !tags.contains_key(&self.opt_in_tag) {
            debug!(log_group = %group.name, "Log group not tagged for export, skipping");
            return Ok(None);
        }

        let anchor = match self.window_anchor {
            WindowAnchor::PerGroup => self.clock.now(),
            WindowAnchor::PerSweep => sweep_started_at,
        };
        let window = TimeWindow::ending_at(anchor);
        let date_prefix = window.date_prefix();
        let task_name = task_name(&group.name, &date_prefix);

        if short_group_name(&group.name).is_empty() {
            warn!(log_group = %group.name, task_name = %task_name, "Log group name ends with '/', task name has no group component");
        }

        let request = ExportTaskRequest {
            log_group_name: group.name.clone(),
            from_ms: window.from_ms,
            to_ms: window.to_ms,
            destination_bucket: self.bucket.clone(),
            destination_prefix: date_prefix.to_string(),
            task_name: task_name.clone(),
        };
        let task_id = self.logs.create_export_task(&request).await?;

        info!(
            log_group = %group.name,
            date_prefix = %date_prefix,
            task_id = %task_id,
            at = %format_wall_clock(self.clock.now()),
            "Started to export log group"
        );

        let status = self
            .wait_for_completion(&task_id)
            .await
            .map_err(|error| GroupError {
                error,
                task_active: true,
            })?;

        info!(
            log_group = %group.name,
            date_prefix = %date_prefix,
            at = %format_wall_clock(self.clock.now()),
            status = %status,
            "Completed export of log group"
        );

        Ok(Some(ExportOutcome {
            log_group: group.name.clone(),
            task_id,
            task_name,
            date_prefix,
            from_ms: window.from_ms,
            to_ms: window.to_ms,
            status,
        }))
    }

    async fn wait_for_completion(&self, task_id: &str) -> Result<ExportTaskStatus, ExportError> {
        let started = self.clock.now();

        loop {
            let records = self.logs.describe_export_task(task_id).await?;
            let status = records
                .iter()
                .find(|record| record.task_id.as_deref().map_or(true, |id| id == task_id))
                .map(|record| record.status)
                .ok_or_else(|| ExportError::MissingTaskRecord {
                    task_id: task_id.to_string(),
                })?;

            if status.is_terminal() {
                return Ok(status);
            }

            if let Some(max_wait) = self.max_wait {
                let waited = (self.clock.now() - started).to_std().unwrap_or_default();
                if waited >= max_wait {
                    return Err(ExportError::PollTimeout {
                        task_id: task_id.to_string(),
                        waited,
                    });
                }
            }

            info!(task_id = %task_id, status = %status, "Waiting for export task to complete");
            self.clock.sleep(self.poll_interval).await;
        }
    }
}
