//! Sandbox configuration types.

use serde::{Deserialize, Serialize};

/// How path components are compared against the workspace root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseSensitivity {
    /// Components must match byte for byte.
    Sensitive,
    /// Components match after simple per-character uppercase folding.
    Insensitive,
}

impl CaseSensitivity {
    /// The usual convention of the host filesystem: insensitive on Windows
    /// and macOS, sensitive elsewhere.
    #[must_use]
    pub fn host_default() -> Self {
        if cfg!(any(windows, target_os = "macos")) {
            Self::Insensitive
        } else {
            Self::Sensitive
        }
    }
}

impl Default for CaseSensitivity {
    fn default() -> Self {
        Self::host_default()
    }
}

/// How much path information violation messages carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationDetail {
    /// Report resolved paths (useful while debugging).
    #[default]
    Verbose,
    /// Report only the candidate string the caller supplied.
    Minimal,
}

/// Options for a [`WorkspaceSandbox`](crate::WorkspaceSandbox).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxOptions {
    /// Case policy for the boundary comparison.
    #[serde(default)]
    pub case_sensitivity: CaseSensitivity,
    /// Verbosity of violation details.
    #[serde(default)]
    pub violation_detail: ViolationDetail,
    /// Reject paths whose deepest existing ancestor lives on a different
    /// volume (mount) than the root.
    #[serde(default)]
    pub same_volume_only: bool,
}

impl SandboxOptions {
    /// Create options with host defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the case policy.
    #[must_use]
    pub fn with_case_sensitivity(mut self, case: CaseSensitivity) -> Self {
        self.case_sensitivity = case;
        self
    }

    /// Set the violation detail level.
    #[must_use]
    pub fn with_violation_detail(mut self, detail: ViolationDetail) -> Self {
        self.violation_detail = detail;
        self
    }

    /// Require resolved paths to stay on the root's volume.
    #[must_use]
    pub fn same_volume_only(mut self, enabled: bool) -> Self {
        self.same_volume_only = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = SandboxOptions::new()
            .with_case_sensitivity(CaseSensitivity::Insensitive)
            .with_violation_detail(ViolationDetail::Minimal)
            .same_volume_only(true);

        assert_eq!(options.case_sensitivity, CaseSensitivity::Insensitive);
        assert_eq!(options.violation_detail, ViolationDetail::Minimal);
        assert!(options.same_volume_only);
    }

    #[test]
    fn test_options_deserialize_partial() {
        let options: SandboxOptions =
            serde_json::from_str(r#"{"violation_detail":"minimal"}"#).unwrap();
        assert_eq!(options.violation_detail, ViolationDetail::Minimal);
        assert_eq!(options.case_sensitivity, CaseSensitivity::host_default());
        assert!(!options.same_volume_only);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_host_default_linux() {
        assert_eq!(CaseSensitivity::default(), CaseSensitivity::Sensitive);
    }
}
