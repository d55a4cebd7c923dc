use super::BoxError;
use crate::clock::SystemClock;
use crate::config::{load_config, resolve_config_path, Config, ConfigError};
use crate::export::{ExportDriver, ExportError, SweepReport};
use crate::logs::CloudWatchLogs;
use aws_config::BehaviorVersion;
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("export error: {0}")]
    Export(#[from] ExportError),

    #[error("sweep finished with {} failed log group(s): {}", .0.failures.len(), failed_groups(.0))]
    Incomplete(Box<SweepReport>),
}

fn failed_groups(report: &SweepReport) -> String {
    report
        .failures
        .iter()
        .map(|failure| failure.log_group.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Registers the sweep as the Lambda function handler. The config is loaded
/// once, before the runtime starts polling for invocations, so a missing
/// bucket fails the cold start instead of an individual sweep.
pub async fn run_lambda(config_path: Option<PathBuf>) -> Result<(), BoxError> {
    let config = load(config_path)?;
    let driver = build_driver(&config).await;

    info!(bucket = %config.bucket, "Waiting for scheduled invocations");
    lambda_runtime::run(service_fn(|event: LambdaEvent<Value>| {
        handle_invocation(event, &driver)
    }))
    .await
}

/// Runs a single sweep outside of Lambda and prints the report.
pub async fn run_once(config_path: Option<PathBuf>) -> Result<(), BoxError> {
    let config = load(config_path)?;
    let driver = build_driver(&config).await;

    let report = sweep(&driver).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

pub async fn handle_invocation(
    event: LambdaEvent<Value>,
    driver: &ExportDriver,
) -> Result<Value, BoxError> {
    info!(request_id = %event.context.request_id, "Export sweep triggered");

    let report = sweep(driver).await?;
    Ok(serde_json::to_value(&report)?)
}

/// Runs one sweep and turns recorded group failures into an error, so the
/// host sees the invocation as failed.
pub async fn sweep(driver: &ExportDriver) -> Result<SweepReport, RunError> {
    let report = driver.run_sweep().await?;

    for outcome in report.unsuccessful_exports() {
        warn!(
            log_group = %outcome.log_group,
            task_id = %outcome.task_id,
            status = %outcome.status,
            "Export task did not complete successfully"
        );
    }

    if !report.is_success() {
        return Err(RunError::Incomplete(Box::new(report)));
    }

    Ok(report)
}

fn load(config_path: Option<PathBuf>) -> Result<Config, RunError> {
    let config_path = resolve_config_path(config_path.as_deref());
    if let Some(path) = &config_path {
        info!(config_path = %path.display(), "Loading configuration");
    }

    Ok(load_config(config_path.as_deref())?)
}

async fn build_driver(config: &Config) -> ExportDriver {
    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let logs = CloudWatchLogs::new(aws_sdk_cloudwatchlogs::Client::new(&sdk_config));

    ExportDriver::new(Arc::new(logs), Arc::new(SystemClock), config)
}
