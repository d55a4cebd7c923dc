pub fn generate_starter_config() -> String {
    r#"# =============================================================================
# CLOUDWATCH S3 EXPORT CONFIGURATION
# =============================================================================
# Every setting below is optional; the values shown are the defaults unless
# noted otherwise.
#
# Config file locations (in order of precedence):
#   1. Path specified via --config argument
#   2. Path in the EXPORT_CONFIG_PATH environment variable
# Without either, the defaults are used and only S3_BUCKET_NAME is required.
#
# Environment variables can be referenced with the $env{...} syntax.

# Destination bucket for exported logs. Required unless S3_BUCKET_NAME is set,
# which always takes precedence.
# bucket: my-log-archive

# =============================================================================
# EXPORT
# =============================================================================
export:
  # Log groups carrying this tag key are exported. The tag value is ignored.
  opt_in_tag: ExportLogs

  # Log groups requested per DescribeLogGroups call (1-50).
  page_size: 50

  # Follow continuation tokens. When false only the first page of log groups
  # is considered.
  paginate: true

  # Which clock reading defines the exported day:
  #   per_group: read when each log group's export starts
  #   per_sweep: read once when the sweep starts, shared by all groups
  window_anchor: per_group

# =============================================================================
# POLLING
# =============================================================================
polling:
  # Pause between export task status checks.
  interval: 10s

  # Give up on a single export task after this long. Unbounded when omitted.
  # max_wait: 10m

# =============================================================================
# ERRORS
# =============================================================================
errors:
  # abort:    stop the sweep at the first failed API call
  # continue: record the failure, export the remaining log groups, and report
  #           the sweep as failed at the end
  on_group_error: abort
"#
    .to_string()
}
