//! Audit entry types.
//!
//! One entry is written per sandbox decision, allowed or denied, so the trail
//! shows every path the agent asked for and what it was given.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use warden_workspace::{ResolvedPath, SandboxViolation, ViolationReason};

/// Outcome of a resolve request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    /// The candidate resolved inside the workspace.
    Allowed,
    /// The sandbox refused the candidate.
    Denied,
}

/// A single audit log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique entry identifier.
    pub id: Uuid,
    /// When this entry was created.
    pub timestamp: DateTime<Utc>,
    /// What the caller was about to do (`read`, `write`, `list`, ...).
    pub action: String,
    /// The candidate string exactly as supplied.
    pub candidate: String,
    /// The canonical path, when allowed.
    pub resolved: Option<String>,
    /// Allowed or denied.
    pub status: AuditStatus,
    /// Violation class, when denied.
    pub reason: Option<ViolationReason>,
    /// Rendered violation, when denied.
    pub error: Option<String>,
    /// Time spent resolving.
    pub duration_ms: Option<u64>,
    /// Free-form context.
    #[serde(default)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl AuditEntry {
    fn new(action: impl Into<String>, candidate: impl Into<String>, status: AuditStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            action: action.into(),
            candidate: candidate.into(),
            resolved: None,
            status,
            reason: None,
            error: None,
            duration_ms: None,
            details: serde_json::Map::new(),
        }
    }

    /// Entry for a candidate the sandbox accepted.
    #[must_use]
    pub fn allowed(
        action: impl Into<String>,
        candidate: impl Into<String>,
        resolved: &ResolvedPath,
    ) -> Self {
        let mut entry = Self::new(action, candidate, AuditStatus::Allowed);
        entry.resolved = Some(resolved.to_string());
        entry
    }

    /// Entry for a candidate the sandbox refused.
    #[must_use]
    pub fn denied(
        action: impl Into<String>,
        candidate: impl Into<String>,
        violation: &SandboxViolation,
    ) -> Self {
        let mut entry = Self::new(action, candidate, AuditStatus::Denied);
        entry.reason = Some(violation.reason);
        entry.error = Some(violation.to_string());
        entry
    }

    /// Build the entry matching a resolve outcome.
    #[must_use]
    pub fn from_outcome(
        action: &str,
        candidate: &str,
        outcome: &Result<ResolvedPath, SandboxViolation>,
    ) -> Self {
        match outcome {
            Ok(resolved) => Self::allowed(action, candidate, resolved),
            Err(violation) => Self::denied(action, candidate, violation),
        }
    }

    /// Record how long the decision took.
    #[must_use]
    pub fn with_duration(mut self, elapsed: Duration) -> Self {
        self.duration_ms = Some(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Attach a context value.
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Check if the request was allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.status == AuditStatus::Allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use warden_workspace::WorkspaceSandbox;

    #[test]
    fn test_outcomes_map_to_entries() {
        let dir = TempDir::new().unwrap();
        let sandbox = WorkspaceSandbox::create(dir.path()).unwrap();

        let ok = sandbox.resolve("notes.md");
        let entry = AuditEntry::from_outcome("read", "notes.md", &ok);
        assert!(entry.is_allowed());
        assert_eq!(
            entry.resolved.as_deref(),
            Some(sandbox.root().join("notes.md").to_str().unwrap())
        );
        assert!(entry.reason.is_none());

        let denied = sandbox.resolve("../escape");
        let entry = AuditEntry::from_outcome("write", "../escape", &denied);
        assert_eq!(entry.status, AuditStatus::Denied);
        assert_eq!(entry.reason, Some(ViolationReason::PathEscapesWorkspace));
        assert!(
            entry
                .error
                .as_deref()
                .unwrap()
                .starts_with("Path escapes workspace")
        );
        assert!(entry.resolved.is_none());
    }

    #[test]
    fn test_serialized_shape() {
        let violation = SandboxViolation::new(ViolationReason::UncPathRejected, r"\\srv\share");
        let entry = AuditEntry::denied("list", r"\\srv\share", &violation)
            .with_duration(Duration::from_micros(1500))
            .with_detail("workspace", "/ws");

        let json: serde_json::Value = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["status"], "denied");
        assert_eq!(json["reason"], "unc_path_rejected");
        assert_eq!(json["duration_ms"], 1);
        assert_eq!(json["details"]["workspace"], "/ws");
        assert!(json["resolved"].is_null());

        let back: AuditEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }
}
