//! Configuration types.
//!
//! Enumerated settings stay plain strings here and are checked by
//! [`validate`](crate::validate); the binary maps them onto the sandbox and
//! telemetry types.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Workspace root and sandbox policy.
    pub workspace: WorkspaceSection,
    /// Logging level, format, and destination.
    pub logging: LoggingSection,
    /// Audit trail of resolve decisions.
    pub audit: AuditSection,
}

/// Sandbox settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceSection {
    /// Default workspace root when none is given on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    /// `"auto"` (host convention), `"sensitive"`, or `"insensitive"`.
    pub case_sensitivity: String,
    /// `"verbose"` (violation messages name resolved paths) or `"minimal"`
    /// (only the caller's own candidate is echoed).
    pub violation_detail: String,
    /// Reject paths that reach another mounted volume inside the root.
    pub same_volume_only: bool,
}

impl Default for WorkspaceSection {
    fn default() -> Self {
        Self {
            root: None,
            case_sensitivity: "auto".to_owned(),
            violation_detail: "verbose".to_owned(),
            same_volume_only: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, `"json"`, or `"full"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["warden_workspace=debug"]`).
    pub directives: Vec<String>,
    /// Write logs to daily files in this directory instead of stderr.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
            directory: None,
        }
    }
}

/// Audit trail configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditSection {
    /// Record every resolve decision.
    pub enabled: bool,
    /// Directory holding `audit.log.jsonl`. Defaults to `audit/` under the
    /// Warden home directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}
