//! Sandbox error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use thiserror::Error;

/// Why a candidate path was refused.
///
/// The set is closed so callers can match exhaustively and pick their own
/// wording for each class of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationReason {
    /// Empty, malformed, or otherwise unusable input.
    InvalidPath,
    /// Network share syntax (`\\server\share\...`).
    UncPathRejected,
    /// Extended-length or device namespace prefix (`\\?\...`).
    LongPathRejected,
    /// Absolute path on a different drive or volume than the root.
    CrossDriveRejected,
    /// The fully resolved path lies outside the workspace root.
    PathEscapesWorkspace,
    /// The filesystem could not resolve the path (broken link, permissions).
    ResolutionError,
}

impl ViolationReason {
    /// Human-readable prefix used when rendering a violation.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidPath => "Invalid path",
            Self::UncPathRejected | Self::LongPathRejected => "UNC/long paths are not allowed",
            Self::CrossDriveRejected => "Cross-drive absolute paths are not allowed",
            Self::PathEscapesWorkspace => "Path escapes workspace",
            Self::ResolutionError => "Path could not be resolved",
        }
    }

    /// Stable snake_case code, matching the serde representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidPath => "invalid_path",
            Self::UncPathRejected => "unc_path_rejected",
            Self::LongPathRejected => "long_path_rejected",
            Self::CrossDriveRejected => "cross_drive_rejected",
            Self::PathEscapesWorkspace => "path_escapes_workspace",
            Self::ResolutionError => "resolution_error",
        }
    }

    /// Check if the input tried to reach outside the workspace boundary.
    #[must_use]
    pub fn is_out_of_bounds(self) -> bool {
        matches!(
            self,
            Self::UncPathRejected
                | Self::LongPathRejected
                | Self::CrossDriveRejected
                | Self::PathEscapesWorkspace
        )
    }

    /// Check if the failure came from the filesystem rather than the input.
    #[must_use]
    pub fn is_environmental(self) -> bool {
        matches!(self, Self::ResolutionError)
    }
}

impl fmt::Display for ViolationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A refused `resolve` call.
///
/// Carries no path that could be mistaken for a usable result; `detail` is
/// for display and debugging only.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{}: {detail}", reason.message())]
pub struct SandboxViolation {
    /// The rejection class.
    pub reason: ViolationReason,
    /// Context for humans (the candidate or the offending resolved path).
    pub detail: String,
}

impl SandboxViolation {
    /// Create a violation.
    #[must_use]
    pub fn new(reason: ViolationReason, detail: impl Into<String>) -> Self {
        Self {
            reason,
            detail: detail.into(),
        }
    }

    pub(crate) fn invalid(detail: impl Into<String>) -> Self {
        Self::new(ViolationReason::InvalidPath, detail)
    }

    pub(crate) fn resolution(subject: impl fmt::Display, err: &io::Error) -> Self {
        Self::new(ViolationReason::ResolutionError, format!("{subject} ({err})"))
    }
}

/// Errors creating or switching a workspace.
#[derive(Debug, Error)]
pub enum SandboxError {
    /// The workspace root cannot be used.
    #[error("Invalid workspace root {root:?}: {reason}")]
    InvalidRoot {
        /// The root as supplied.
        root: String,
        /// What was wrong with it.
        reason: String,
        /// Underlying I/O error, when there was one.
        #[source]
        source: Option<io::Error>,
    },

    /// A path was requested before any workspace was selected.
    #[error("No workspace has been selected")]
    NoWorkspaceSelected,
}

impl SandboxError {
    pub(crate) fn invalid_root(root: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRoot {
            root: root.into(),
            reason: reason.into(),
            source: None,
        }
    }

    pub(crate) fn root_io(root: impl Into<String>, reason: impl Into<String>, e: io::Error) -> Self {
        Self::InvalidRoot {
            root: root.into(),
            reason: reason.into(),
            source: Some(e),
        }
    }
}

/// Result type for sandbox construction.
pub type SandboxResult<T> = Result<T, SandboxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_display() {
        let v = SandboxViolation::new(ViolationReason::PathEscapesWorkspace, "/etc/passwd");
        assert_eq!(v.to_string(), "Path escapes workspace: /etc/passwd");

        let v = SandboxViolation::new(ViolationReason::UncPathRejected, r"\\server\share");
        assert_eq!(v.to_string(), r"UNC/long paths are not allowed: \\server\share");

        let v = SandboxViolation::new(ViolationReason::CrossDriveRejected, r"Z:\tmp\file.txt");
        assert_eq!(
            v.to_string(),
            r"Cross-drive absolute paths are not allowed: Z:\tmp\file.txt"
        );
    }

    #[test]
    fn test_reason_classes() {
        assert!(ViolationReason::PathEscapesWorkspace.is_out_of_bounds());
        assert!(ViolationReason::UncPathRejected.is_out_of_bounds());
        assert!(!ViolationReason::InvalidPath.is_out_of_bounds());
        assert!(!ViolationReason::ResolutionError.is_out_of_bounds());

        assert!(ViolationReason::ResolutionError.is_environmental());
        assert!(!ViolationReason::CrossDriveRejected.is_environmental());
    }

    #[test]
    fn test_reason_serde_matches_code() {
        for reason in [
            ViolationReason::InvalidPath,
            ViolationReason::UncPathRejected,
            ViolationReason::LongPathRejected,
            ViolationReason::CrossDriveRejected,
            ViolationReason::PathEscapesWorkspace,
            ViolationReason::ResolutionError,
        ] {
            let json = serde_json::to_string(&reason).unwrap();
            assert_eq!(json, format!("\"{}\"", reason.as_str()));
        }
    }

    #[test]
    fn test_invalid_root_display() {
        let err = SandboxError::invalid_root("/nope", "does not exist");
        assert_eq!(
            err.to_string(),
            "Invalid workspace root \"/nope\": does not exist"
        );
    }
}
