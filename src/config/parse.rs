use super::types::*;
use crate::config::{expand_env_vars, ENV_VAR_PATTERN};
use regex::Regex;
use std::fs::File;
use std::path::Path;
use thiserror::Error;

pub const BUCKET_ENV_VAR: &str = "S3_BUCKET_NAME";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation failed:\n{}", .0.join("\n"))]
    ValidationList(Vec<String>),

    #[error("validation failed: {0}")]
    Validation(String),
}

/// Loads the config file (if any), applies environment overrides and validates
/// the result.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    load_config_with_env(path, |name| std::env::var(name).ok())
}

/// Same as [`load_config`] but reads overrides through `env` instead of the
/// process environment.
pub fn load_config_with_env<F>(path: Option<&Path>, env: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => Config::default(),
    };

    apply_env_overrides(&mut config, env);
    validate_config(&config)?;

    Ok(config)
}

pub fn parse_config(yaml: &str) -> Result<Config, ConfigError> {
    // Expand environment variables in the YAML string before parsing
    let yaml = expand_env_vars(yaml);
    check_unexpanded_vars(&yaml)?;

    // An empty file deserializes to unit, not to an empty mapping
    if yaml.trim().is_empty() {
        return Ok(Config::default());
    }

    Ok(serde_yaml::from_str(&yaml)?)
}

fn read_config_file(path: &Path) -> Result<Config, ConfigError> {
    use std::io::Read;

    let mut file = File::open(path).map_err(|e| {
        ConfigError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to open config file '{}': {}", path.display(), e),
        ))
    })?;

    let mut yaml_string = String::new();
    file.read_to_string(&mut yaml_string).map_err(|e| {
        ConfigError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to read config file '{}': {}", path.display(), e),
        ))
    })?;

    parse_config(&yaml_string).map_err(|e| match e {
        ConfigError::YamlParse(e) => ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("in file '{}': {}", path.display(), e),
        )),
        other => other,
    })
}

fn apply_env_overrides<F>(config: &mut Config, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(bucket) = env(BUCKET_ENV_VAR) {
        config.bucket = bucket;
    }
}

/// Checks for unexpanded environment variables and returns a helpful error
fn check_unexpanded_vars(yaml_string: &str) -> Result<(), ConfigError> {
    let re = Regex::new(ENV_VAR_PATTERN).expect("static regex");
    let mut unexpanded_vars: Vec<String> = re
        .captures_iter(yaml_string)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
        .collect();

    if unexpanded_vars.is_empty() {
        return Ok(());
    }

    unexpanded_vars.sort();
    unexpanded_vars.dedup();

    Err(ConfigError::Validation(format!(
        "environment variables referenced in config are not set: {}",
        unexpanded_vars.join(", ")
    )))
}

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if config.bucket.trim().is_empty() {
        errors.push(format!(
            "destination bucket is not set; export {} or set 'bucket' in the config file",
            BUCKET_ENV_VAR
        ));
    }

    if config.export.opt_in_tag.is_empty() {
        errors.push("export.opt_in_tag must not be empty".to_string());
    }

    if !(1..=MAX_PAGE_SIZE).contains(&config.export.page_size) {
        errors.push(format!(
            "export.page_size must be between 1 and {}, got {}",
            MAX_PAGE_SIZE, config.export.page_size
        ));
    }

    if config.polling.interval.is_zero() {
        errors.push("polling.interval must be greater than zero".to_string());
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(ConfigError::Validation(errors.remove(0))),
        _ => Err(ConfigError::ValidationList(errors)),
    }
}
