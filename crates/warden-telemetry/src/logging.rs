//! Subscriber construction for the `warden` binary and its tests.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{Directive, EnvFilter};
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{Layer, Registry};

use crate::error::{TelemetryError, TelemetryResult};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Line layout of emitted events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, indented fields.
    Pretty,
    /// One line per event.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
    /// One line per event with span context.
    Full,
}

/// Where events are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    /// Standard output.
    Stdout,
    /// Standard error. Keeps stdout free for command output.
    #[default]
    Stderr,
    /// Daily-rotated files in this directory.
    File(PathBuf),
}

/// Subscriber settings.
///
/// Missing fields take their [`Default`] values when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Base filter, in `EnvFilter` syntax (`info`, `warden_workspace=debug`).
    pub level: String,
    /// Line layout.
    pub format: LogFormat,
    /// Destination.
    pub target: LogTarget,
    /// Prefix of rotated file names (`<prefix>.<date>.log`).
    pub file_prefix: String,
    /// Print event timestamps.
    pub timestamps: bool,
    /// Print source file and line.
    pub file_info: bool,
    /// Color output.
    pub ansi: bool,
    /// Extra per-target filters layered over `level`.
    pub directives: Vec<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Compact,
            target: LogTarget::Stderr,
            file_prefix: "warden".to_owned(),
            timestamps: true,
            file_info: false,
            ansi: true,
            directives: Vec::new(),
        }
    }
}

impl LogConfig {
    /// Settings for `level` with everything else at its default.
    #[must_use]
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Self::default()
        }
    }

    /// Use `format`.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Write to `target`.
    #[must_use]
    pub fn with_target(mut self, target: LogTarget) -> Self {
        self.target = target;
        self
    }

    /// Write daily-rotated files under `directory`. Turns colors off.
    #[must_use]
    pub fn with_file_logging(mut self, directory: impl Into<PathBuf>) -> Self {
        self.ansi = false;
        self.with_target(LogTarget::File(directory.into()))
    }

    /// Append a per-target filter such as `warden_config=trace`.
    #[must_use]
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    /// Omit timestamps (useful under test harnesses).
    #[must_use]
    pub fn without_timestamps(mut self) -> Self {
        self.timestamps = false;
        self
    }

    /// Include source locations.
    #[must_use]
    pub fn with_file_info(mut self) -> Self {
        self.file_info = true;
        self
    }

    /// Turn colors off.
    #[must_use]
    pub fn without_ansi(mut self) -> Self {
        self.ansi = false;
        self
    }

    fn env_filter(&self) -> TelemetryResult<EnvFilter> {
        let base = EnvFilter::try_new(&self.level)
            .map_err(|e| TelemetryError::ConfigError(format!("level {:?}: {e}", self.level)))?;

        self.directives.iter().try_fold(base, |filter, raw| {
            let directive: Directive = raw
                .parse()
                .map_err(|e| TelemetryError::ConfigError(format!("directive {raw:?}: {e}")))?;
            Ok(filter.add_directive(directive))
        })
    }

    fn fmt_layer<W>(&self, writer: W) -> BoxedLayer
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(self.ansi)
            .with_file(self.file_info)
            .with_line_number(self.file_info);

        // `without_time` changes the layer's type, so each arm boxes.
        match (self.format, self.timestamps) {
            (LogFormat::Pretty, true) => layer.pretty().boxed(),
            (LogFormat::Pretty, false) => layer.pretty().without_time().boxed(),
            (LogFormat::Compact, true) => layer.compact().boxed(),
            (LogFormat::Compact, false) => layer.compact().without_time().boxed(),
            (LogFormat::Json, true) => layer.json().boxed(),
            (LogFormat::Json, false) => layer.json().without_time().boxed(),
            (LogFormat::Full, true) => layer.boxed(),
            (LogFormat::Full, false) => layer.without_time().boxed(),
        }
    }

    fn build_layer(&self) -> TelemetryResult<BoxedLayer> {
        Ok(match &self.target {
            LogTarget::Stdout => self.fmt_layer(std::io::stdout),
            LogTarget::Stderr => self.fmt_layer(std::io::stderr),
            LogTarget::File(dir) => {
                std::fs::create_dir_all(dir)?;
                let appender = RollingFileAppender::builder()
                    .rotation(Rotation::DAILY)
                    .filename_prefix(&self.file_prefix)
                    .filename_suffix("log")
                    .build(dir)
                    .map_err(|e| TelemetryError::InitError(e.to_string()))?;
                self.fmt_layer(appender)
            },
        })
    }
}

/// Install the process-wide subscriber described by `config`.
///
/// # Errors
///
/// Returns [`TelemetryError::ConfigError`] for an unparsable level or
/// directive, [`TelemetryError::IoError`] if the log directory cannot be
/// created, and [`TelemetryError::InitError`] if a subscriber is already
/// installed.
pub fn setup_logging(config: &LogConfig) -> TelemetryResult<()> {
    let filter = config.env_filter()?;
    let layer = config.build_layer()?;

    Registry::default()
        .with(layer)
        .with(filter)
        .try_init()
        .map_err(|e| TelemetryError::InitError(e.to_string()))?;

    tracing::debug!(
        level = %config.level,
        format = ?config.format,
        output = ?config.target,
        "Logging initialized"
    );
    Ok(())
}

/// Install compact `info` logging on stderr.
///
/// # Errors
///
/// Returns [`TelemetryError::InitError`] if a subscriber is already installed.
pub fn setup_default_logging() -> TelemetryResult<()> {
    setup_logging(&LogConfig::default())
}
