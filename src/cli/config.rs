use super::BoxError;
use crate::config::generate::generate_starter_config;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "export-config.yml";

pub fn init(stdout: bool, output: Option<PathBuf>) -> Result<(), BoxError> {
    let config_content = generate_starter_config();

    if stdout {
        print!("{}", config_content);
        return Ok(());
    }

    let config_path = output.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    write_config(&config_content, &config_path)?;

    println!("Config file written to {}", config_path.display());
    Ok(())
}

fn write_config(config_content: &str, config_path: &Path) -> Result<(), BoxError> {
    if config_path.exists() {
        return Err(format!(
            "config file already exists at {}; remove it first or use --stdout",
            config_path.display()
        )
        .into());
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    fs::write(config_path, config_content)?;
    Ok(())
}

pub fn validate(config_path: Option<PathBuf>) -> Result<(), BoxError> {
    match &config_path {
        Some(path) => println!("Validating config file: {}", path.display()),
        None => println!("No config file given, validating defaults and environment"),
    }

    match crate::config::load_config(config_path.as_deref()) {
        Ok(config) => {
            println!("✓ Config is valid (bucket: {})", config.bucket);
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Config validation failed:\n{}", e);
            Err(e.into())
        }
    }
}
