//! Config file discovery and layered loading.
//!
//! 1. Parse `defaults.toml` → base
//! 2. Merge `~/.warden/config.toml` (or `$WARDEN_HOME/config.toml`)
//! 3. Merge the explicit `--config` file, if any
//! 4. Apply env var fallbacks for fields no file set
//! 5. Deserialize and validate
//!
//! The workspace directory is never consulted: the agent can write there.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::env::{apply_env_fallbacks, collect_env_vars};
use crate::error::{ConfigError, ConfigResult};
use crate::merge::{ConfigLayer, FieldSources, merge_layer, record_leaves};
use crate::show::ResolvedConfig;
use crate::types::Config;
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Maximum allowed config file size (1 MiB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Name of the per-user directory under the home directory.
const HOME_DIR_NAME: &str = ".warden";

/// Load the configuration with layered file precedence.
///
/// `explicit` is a file named on the command line; unlike the user file it
/// must exist. `warden_home_override` replaces the `~/.warden` directory.
///
/// # Errors
///
/// Returns a [`ConfigError`] if any config file is unreadable or malformed,
/// or if the merged configuration fails validation.
pub fn load(
    explicit: Option<&Path>,
    warden_home_override: Option<&Path>,
) -> ConfigResult<ResolvedConfig> {
    load_with_env(explicit, warden_home_override, &collect_env_vars())
}

fn load_with_env(
    explicit: Option<&Path>,
    warden_home_override: Option<&Path>,
    env_vars: &HashMap<String, String>,
) -> ConfigResult<ResolvedConfig> {
    let mut merged: toml::Value =
        toml::from_str(DEFAULTS_TOML).map_err(|e| ConfigError::ParseError {
            path: "<embedded defaults>".to_owned(),
            source: e,
        })?;

    let mut field_sources = FieldSources::new();
    let mut loaded_files = Vec::new();
    record_leaves(&merged, "", ConfigLayer::Defaults, &mut field_sources);

    // User config.
    let user_config = match warden_home_override {
        Some(dir) => {
            let path = dir.join("config.toml");
            try_load_file(&path)?.map(|overlay| (overlay, path))
        },
        None => discover_user_config(env_vars)?,
    };
    if let Some((overlay, path)) = user_config {
        merge_layer(&mut merged, &overlay, "", ConfigLayer::User, &mut field_sources);
        loaded_files.push(path.display().to_string());
        info!(path = %path.display(), "loaded user config");
    }

    // Explicit config.
    if let Some(path) = explicit {
        let overlay = try_load_file(path)?.ok_or_else(|| ConfigError::ReadError {
            path: path.display().to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })?;
        merge_layer(&mut merged, &overlay, "", ConfigLayer::Explicit, &mut field_sources);
        loaded_files.push(path.display().to_string());
        info!(path = %path.display(), "loaded explicit config");
    }

    let env_count = apply_env_fallbacks(&mut merged, &mut field_sources, env_vars);
    if env_count > 0 {
        debug!(count = env_count, "applied environment variable fallbacks");
    }

    let config: Config =
        merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::ParseError {
                path: "<merged config>".to_owned(),
                source: e,
            })?;

    validate::validate(&config)?;

    Ok(ResolvedConfig {
        config,
        field_sources,
        loaded_files,
    })
}

/// `~/.warden/config.toml`, falling back to `$WARDEN_HOME/config.toml`.
fn discover_user_config(
    env_vars: &HashMap<String, String>,
) -> ConfigResult<Option<(toml::Value, PathBuf)>> {
    let home_dir = home_directory()?;
    let user_path = home_dir.join(HOME_DIR_NAME).join("config.toml");
    if let Some(overlay) = try_load_file(&user_path)? {
        return Ok(Some((overlay, user_path)));
    }

    let Some(warden_home) = env_vars.get("WARDEN_HOME") else {
        return Ok(None);
    };
    let Some(canonical) = validate_warden_home(warden_home, &home_dir) else {
        warn!(
            path = warden_home,
            "WARDEN_HOME is not a valid directory owned by current user; ignoring"
        );
        return Ok(None);
    };
    let alt_path = canonical.join("config.toml");
    Ok(try_load_file(&alt_path)?.map(|overlay| (overlay, alt_path)))
}

/// The directory holding per-user Warden state: `$WARDEN_HOME` when set,
/// otherwise `~/.warden`.
///
/// # Errors
///
/// Returns [`ConfigError::NoHomeDir`] if neither can be determined.
pub fn warden_home() -> ConfigResult<PathBuf> {
    if let Ok(dir) = std::env::var("WARDEN_HOME")
        && !dir.trim().is_empty()
    {
        return Ok(PathBuf::from(dir));
    }
    Ok(home_directory()?.join(HOME_DIR_NAME))
}

/// Load a config from a specific file path (no layering).
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
/// validation.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let value = try_load_file(path)?.ok_or_else(|| ConfigError::ReadError {
        path: path.display().to_string(),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    })?;
    let config: Config = value
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::ParseError {
            path: path.display().to_string(),
            source: e,
        })?;
    validate::validate(&config)?;
    Ok(config)
}

/// Try to load a file, returning `None` if the file doesn't exist.
fn try_load_file(path: &Path) -> ConfigResult<Option<toml::Value>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, skipping");
            return Ok(None);
        },
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.display().to_string(),
                source: e,
            });
        },
    };

    // Check size after reading to avoid TOCTOU between stat and read.
    let len = u64::try_from(content.len()).unwrap_or(u64::MAX);
    if len > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {len} bytes, exceeding the {MAX_CONFIG_FILE_SIZE} byte limit"
            ),
        });
    }

    let value: toml::Value = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(Some(value))
}

/// Validate that a `WARDEN_HOME` path is a real directory owned by the same
/// user who owns `home_dir`. Returns the canonicalized path on success.
fn validate_warden_home(raw_path: &str, home_dir: &Path) -> Option<PathBuf> {
    let canonical = PathBuf::from(raw_path).canonicalize().ok()?;
    if !canonical.is_dir() {
        return None;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        let dir_uid = canonical.metadata().ok()?.uid();
        let home_uid = home_dir.metadata().ok()?.uid();
        if dir_uid != home_uid {
            return None;
        }
    }

    #[cfg(not(unix))]
    let _ = home_dir;

    Some(canonical)
}

/// Determine the user's home directory.
fn home_directory() -> ConfigResult<PathBuf> {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDir)
}
