//! Errors raised while loading configuration.

use std::io;
use thiserror::Error;

/// Why a configuration could not be produced.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file exists (or was required) but could not be read.
    #[error("cannot read {path}: {source}")]
    ReadError {
        /// File that was being read.
        path: String,
        /// The I/O failure.
        #[source]
        source: io::Error,
    },

    /// A config file is not valid TOML or has a field of the wrong type.
    #[error("invalid TOML in {path}: {source}")]
    ParseError {
        /// File that was being parsed.
        path: String,
        /// The parser's diagnostic.
        #[source]
        source: toml::de::Error,
    },

    /// The merged configuration holds a value outside its allowed set.
    #[error("invalid value for `{field}`: {message}")]
    ValidationError {
        /// Dotted field path, e.g. `workspace.case_sensitivity`.
        field: String,
        /// What was wrong.
        message: String,
    },

    /// Neither `$WARDEN_HOME` nor a home directory is available.
    #[error("no home directory; set WARDEN_HOME")]
    NoHomeDir,
}

/// Shorthand for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
