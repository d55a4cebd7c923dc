use crate::logs::ExportTaskStatus;
use crate::window::DatePrefix;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of one sweep, returned to the host as the invocation result.
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub started_at: DateTime<Utc>,
    pub groups_seen: usize,
    pub skipped: Vec<String>,
    pub exported: Vec<ExportOutcome>,
    pub failures: Vec<GroupFailure>,
}

impl SweepReport {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            groups_seen: 0,
            skipped: Vec::new(),
            exported: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Exports that reached a terminal state other than COMPLETED.
    pub fn unsuccessful_exports(&self) -> impl Iterator<Item = &ExportOutcome> {
        self.exported
            .iter()
            .filter(|outcome| outcome.status != ExportTaskStatus::Completed)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportOutcome {
    pub log_group: String,
    pub task_id: String,
    pub task_name: String,
    pub date_prefix: DatePrefix,
    pub from_ms: i64,
    pub to_ms: i64,
    pub status: ExportTaskStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupFailure {
    pub log_group: String,
    pub error: String,
}
