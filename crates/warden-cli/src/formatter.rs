//! Output formatting shared by the commands.

use colored::Colorize;
use warden_workspace::{ResolvedPath, SandboxViolation};

use crate::theme::Theme;

/// How results are printed on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    /// Colored, one line per result.
    Pretty,
    /// A single JSON document.
    Json,
}

impl OutputFormat {
    /// Parse the `--format` flag; anything but `json` is pretty.
    pub(crate) fn from_flag(flag: &str) -> Self {
        match flag {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// JSON shape of one resolve outcome.
pub(crate) fn outcome_json(
    candidate: &str,
    outcome: &Result<ResolvedPath, SandboxViolation>,
) -> serde_json::Value {
    match outcome {
        Ok(path) => serde_json::json!({
            "candidate": candidate,
            "allowed": true,
            "resolved": path.to_string(),
        }),
        Err(v) => serde_json::json!({
            "candidate": candidate,
            "allowed": false,
            "reason": v.reason,
            "error": v.to_string(),
        }),
    }
}

/// Pretty line for one resolve outcome.
pub(crate) fn outcome_line(
    candidate: &str,
    outcome: &Result<ResolvedPath, SandboxViolation>,
) -> String {
    match outcome {
        Ok(path) => Theme::success(&format!("{candidate} {} {path}", "->".dimmed())),
        Err(v) => Theme::error(&format!("{candidate}: {v}")),
    }
}
