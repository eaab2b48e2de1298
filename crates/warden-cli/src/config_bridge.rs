//! Conversion from configuration values to library types.

use std::path::PathBuf;

use warden_config::{Config, ConfigResult};
use warden_telemetry::{LogConfig, LogFormat};
use warden_workspace::{CaseSensitivity, SandboxOptions, ViolationDetail};

/// Convert config to [`LogConfig`].
pub(crate) fn to_log_config(cfg: &Config, verbose: bool) -> LogConfig {
    let format = match cfg.logging.format.as_str() {
        "pretty" => LogFormat::Pretty,
        "json" => LogFormat::Json,
        "full" => LogFormat::Full,
        _ => LogFormat::Compact,
    };

    let level = if verbose {
        "debug"
    } else {
        cfg.logging.level.as_str()
    };
    let mut log_config = LogConfig::new(level).with_format(format);

    for directive in &cfg.logging.directives {
        log_config = log_config.with_directive(directive);
    }

    if let Some(dir) = &cfg.logging.directory {
        log_config = log_config.with_file_logging(dir);
    }

    log_config
}

/// Logging used when the configuration itself failed to load.
pub(crate) fn fallback_log_config(verbose: bool) -> LogConfig {
    let level = if verbose { "debug" } else { "warn" };
    LogConfig::new(level).with_format(LogFormat::Compact)
}

/// Convert config to [`SandboxOptions`].
pub(crate) fn to_sandbox_options(cfg: &Config) -> SandboxOptions {
    let case = match cfg.workspace.case_sensitivity.as_str() {
        "sensitive" => CaseSensitivity::Sensitive,
        "insensitive" => CaseSensitivity::Insensitive,
        _ => CaseSensitivity::host_default(),
    };

    let detail = match cfg.workspace.violation_detail.as_str() {
        "minimal" => ViolationDetail::Minimal,
        _ => ViolationDetail::Verbose,
    };

    SandboxOptions::new()
        .with_case_sensitivity(case)
        .with_violation_detail(detail)
        .same_volume_only(cfg.workspace.same_volume_only)
}

/// Directory for the audit log, or `None` when auditing is off.
pub(crate) fn audit_dir(cfg: &Config) -> ConfigResult<Option<PathBuf>> {
    if !cfg.audit.enabled {
        return Ok(None);
    }
    match &cfg.audit.directory {
        Some(dir) => Ok(Some(PathBuf::from(dir))),
        None => Ok(Some(warden_config::loader::warden_home()?.join("audit"))),
    }
}
