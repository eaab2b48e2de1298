//! Post-merge configuration validation.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Validate a fully-merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_workspace(config)?;
    validate_logging(config)?;
    validate_audit(config)?;
    Ok(())
}

fn one_of(field: &str, value: &str, allowed: &[&str], what: &str) -> ConfigResult<()> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        field: field.to_owned(),
        message: format!(
            "unsupported {what} '{value}'; expected one of: {}",
            allowed.join(", ")
        ),
    })
}

fn non_blank(field: &str, value: Option<&str>) -> ConfigResult<()> {
    match value {
        Some(v) if v.trim().is_empty() => Err(ConfigError::ValidationError {
            field: field.to_owned(),
            message: "must not be empty when set".to_owned(),
        }),
        _ => Ok(()),
    }
}

fn validate_workspace(config: &Config) -> ConfigResult<()> {
    let ws = &config.workspace;
    non_blank("workspace.root", ws.root.as_deref())?;
    one_of(
        "workspace.case_sensitivity",
        &ws.case_sensitivity,
        &["auto", "sensitive", "insensitive"],
        "case sensitivity",
    )?;
    one_of(
        "workspace.violation_detail",
        &ws.violation_detail,
        &["verbose", "minimal"],
        "violation detail",
    )
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let logging = &config.logging;
    one_of(
        "logging.level",
        &logging.level,
        &["trace", "debug", "info", "warn", "error"],
        "log level",
    )?;
    one_of(
        "logging.format",
        &logging.format,
        &["pretty", "compact", "json", "full"],
        "log format",
    )?;
    non_blank("logging.directory", logging.directory.as_deref())
}

fn validate_audit(config: &Config) -> ConfigResult<()> {
    non_blank("audit.directory", config.audit.directory.as_deref())
}
