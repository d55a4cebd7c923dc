use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Format used for the wall-clock time in export log lines,
/// e.g. `Fri Mar 15 10:00:00 UTC 2024`.
pub const WALL_CLOCK_FORMAT: &str = "%a %b %e %H:%M:%S UTC %Y";

/// Source of the current time and of the pause between export status polls.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

pub fn format_wall_clock(instant: DateTime<Utc>) -> String {
    instant.format(WALL_CLOCK_FORMAT).to_string()
}
