use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which clock reading a group's export window is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowAnchor {
    /// Read the clock when each group's processing begins.
    #[default]
    PerGroup,
    /// Read the clock once when the sweep starts and reuse it for every group.
    PerSweep,
}

/// Half-open interval `[from_ms, to_ms)` covering the UTC calendar day before
/// the anchor instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from_ms: i64,
    pub to_ms: i64,
    pub day: NaiveDate,
}

impl TimeWindow {
    pub fn ending_at(now: DateTime<Utc>) -> Self {
        let day = (now - Duration::hours(24)).date_naive();
        let today = now.date_naive();

        Self {
            from_ms: start_of_day_ms(day),
            to_ms: start_of_day_ms(today),
            day,
        }
    }

    pub fn date_prefix(&self) -> DatePrefix {
        DatePrefix::for_day(self.day)
    }
}

fn start_of_day_ms(day: NaiveDate) -> i64 {
    Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN))
        .timestamp_millis()
}

/// `YEAR-MONTH-DAY` with month and day left unpadded, e.g. `2024-3-14`.
///
/// Used both as the S3 key prefix and as the suffix of the export task name,
/// so it must stay byte-compatible with objects already in the bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DatePrefix(String);

impl DatePrefix {
    pub fn for_day(day: NaiveDate) -> Self {
        Self(format!("{}-{}-{}", day.year(), day.month(), day.day()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Last `/`-separated segment of a log group name.
pub fn short_group_name(log_group_name: &str) -> &str {
    log_group_name
        .rsplit('/')
        .next()
        .unwrap_or(log_group_name)
}

pub fn task_name(log_group_name: &str, prefix: &DatePrefix) -> String {
    format!("{}-{}", short_group_name(log_group_name), prefix)
}
