//! Workspace boundary checking.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::config::CaseSensitivity;

/// The containment test against a canonical root.
///
/// Containment is decided component by component, so `/a/workspace2` is not
/// inside `/a/workspace` even though the strings share a prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceBoundary {
    root: PathBuf,
    case: CaseSensitivity,
}

impl WorkspaceBoundary {
    /// Create a boundary around an already canonical root.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, case: CaseSensitivity) -> Self {
        Self {
            root: root.into(),
            case,
        }
    }

    /// Get the workspace root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the case policy.
    #[must_use]
    pub fn case_sensitivity(&self) -> CaseSensitivity {
        self.case
    }

    /// Check if `path` is the root or a descendant of it.
    ///
    /// `path` must already be canonical; no filesystem access happens here.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        let mut candidate = path.components();
        self.root.components().all(|root_component| {
            candidate
                .next()
                .is_some_and(|c| component_eq(root_component, c, self.case))
        })
    }

    /// The part of `path` below the root, or `None` if `path` is outside.
    ///
    /// Returns an empty path for the root itself.
    #[must_use]
    pub fn relative(&self, path: &Path) -> Option<PathBuf> {
        if !self.contains(path) {
            return None;
        }
        Some(
            path.components()
                .skip(self.root.components().count())
                .collect(),
        )
    }
}

fn component_eq(a: Component<'_>, b: Component<'_>, case: CaseSensitivity) -> bool {
    match (a, b) {
        // Drive letters and share names are case-insensitive everywhere.
        (Component::Prefix(x), Component::Prefix(y)) => {
            os_eq(x.as_os_str(), y.as_os_str(), CaseSensitivity::Insensitive)
        },
        (Component::RootDir, Component::RootDir)
        | (Component::CurDir, Component::CurDir)
        | (Component::ParentDir, Component::ParentDir) => true,
        (Component::Normal(x), Component::Normal(y)) => os_eq(x, y, case),
        _ => false,
    }
}

fn os_eq(a: &OsStr, b: &OsStr, case: CaseSensitivity) -> bool {
    if a == b {
        return true;
    }
    match case {
        CaseSensitivity::Sensitive => false,
        // Non-UTF-8 names only match exactly; lossy conversion could fold
        // two distinct names together.
        CaseSensitivity::Insensitive => match (a.to_str(), b.to_str()) {
            (Some(a), Some(b)) => a.chars().map(upcase).eq(b.chars().map(upcase)),
            _ => false,
        },
    }
}

/// Simple one-to-one uppercase mapping, the way NTFS and APFS fold names.
///
/// Characters whose uppercase form is longer than one character (`ß`)
/// stay as they are; the host tables never expand a name.
fn upcase(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}
