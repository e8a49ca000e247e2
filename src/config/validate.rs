// src/config/validate.rs

use std::path::Path;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{InterpkitError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::InterpkitError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        let config = ConfigFile::new_unchecked(raw);
        validate_layout(&config)?;
        Ok(config)
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_environment(cfg)?;
    validate_resolver(cfg)?;
    validate_runner(cfg)?;
    Ok(())
}

fn validate_environment(cfg: &RawConfigFile) -> Result<()> {
    if cfg.environment.caller_id.trim().is_empty() {
        return Err(InterpkitError::ConfigError(
            "[environment].caller_id must not be empty".to_string(),
        ));
    }

    for (key, _) in cfg.environment.extra_variables.iter() {
        if key.is_empty() || key.contains('=') || key.contains('\0') {
            return Err(InterpkitError::ConfigError(format!(
                "[environment.extra_variables] has invalid variable name '{}'",
                key
            )));
        }
    }
    Ok(())
}

fn validate_resolver(cfg: &RawConfigFile) -> Result<()> {
    if cfg
        .resolver
        .custom_directories
        .iter()
        .any(|dir| dir.trim().is_empty())
    {
        return Err(InterpkitError::ConfigError(
            "[resolver].custom_directories must not contain empty entries".to_string(),
        ));
    }
    Ok(())
}

fn validate_runner(cfg: &RawConfigFile) -> Result<()> {
    if cfg.runner.timeout_secs == Some(0) {
        return Err(InterpkitError::ConfigError(
            "[runner].timeout_secs must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_layout(cfg: &ConfigFile) -> Result<()> {
    let dirs: [(&str, &Path); 4] = [
        ("cache_dir", cfg.layout.cache_dir.as_path()),
        ("core_dir", cfg.layout.core_dir.as_path()),
        ("env_root_dir", cfg.layout.env_root_dir.as_path()),
        ("env_bin_dir", cfg.layout.env_bin_dir.as_path()),
    ];

    for (name, dir) in dirs {
        if !dir.is_absolute() {
            return Err(InterpkitError::ConfigError(format!(
                "[layout].{} must be an absolute path (got '{}')",
                name,
                dir.display()
            )));
        }
    }
    Ok(())
}
