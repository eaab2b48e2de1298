//! Ownership of the active workspace.
//!
//! There is no process-wide workspace root. Whatever owns the user's session
//! holds a [`WorkspaceSession`] and replaces its sandbox when the user picks a
//! different folder; file-operation code receives the sandbox explicitly.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::config::SandboxOptions;
use crate::error::{SandboxError, SandboxResult, SandboxViolation};
use crate::resolver::{OsResolver, PathResolver};
use crate::sandbox::{ResolvedPath, WorkspaceSandbox};

/// The sandbox for the currently selected workspace, if any.
#[derive(Debug, Clone)]
pub struct WorkspaceSession {
    options: SandboxOptions,
    resolver: Arc<dyn PathResolver>,
    current: Option<Arc<WorkspaceSandbox>>,
}

impl Default for WorkspaceSession {
    fn default() -> Self {
        Self::new(SandboxOptions::default())
    }
}

impl WorkspaceSession {
    /// Create a session on the host filesystem with no workspace selected.
    #[must_use]
    pub fn new(options: SandboxOptions) -> Self {
        Self::with_resolver(options, Arc::new(OsResolver))
    }

    /// Create a session with an explicit filesystem capability.
    #[must_use]
    pub fn with_resolver(options: SandboxOptions, resolver: Arc<dyn PathResolver>) -> Self {
        Self {
            options,
            resolver,
            current: None,
        }
    }

    /// Select a workspace folder, replacing any previous one.
    ///
    /// On failure the previous workspace stays selected.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::InvalidRoot`] if the folder cannot be used.
    pub fn select(&mut self, root: impl AsRef<Path>) -> SandboxResult<Arc<WorkspaceSandbox>> {
        let sandbox = Arc::new(WorkspaceSandbox::create_with(
            root,
            self.options.clone(),
            Arc::clone(&self.resolver),
        )?);
        if let Some(previous) = &self.current {
            info!(
                from = %previous.root().display(),
                to = %sandbox.root().display(),
                "Switching workspace"
            );
        }
        self.current = Some(Arc::clone(&sandbox));
        Ok(sandbox)
    }

    /// Deselect the workspace.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Get the active sandbox.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::NoWorkspaceSelected`] before the first
    /// successful [`select`](Self::select).
    pub fn sandbox(&self) -> SandboxResult<Arc<WorkspaceSandbox>> {
        self.current
            .as_ref()
            .map(Arc::clone)
            .ok_or(SandboxError::NoWorkspaceSelected)
    }

    /// Resolve a candidate against the active workspace.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::NoWorkspaceSelected`] if no workspace is
    /// selected; otherwise the inner result carries the sandbox's decision.
    pub fn resolve(
        &self,
        candidate: &str,
    ) -> SandboxResult<Result<ResolvedPath, SandboxViolation>> {
        Ok(self.sandbox()?.resolve(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_no_workspace_selected() {
        let session = WorkspaceSession::default();
        assert!(matches!(
            session.sandbox(),
            Err(SandboxError::NoWorkspaceSelected)
        ));
        assert!(session.resolve("file.txt").is_err());
    }

    #[test]
    fn test_switching_replaces_sandbox() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let mut session = WorkspaceSession::default();

        let a = session.select(first.path()).unwrap();
        let b = session.select(second.path()).unwrap();
        assert_ne!(a.root(), b.root());
        assert_eq!(session.sandbox().unwrap().root(), b.root());

        // Paths in the old workspace are now outside.
        let old = first.path().join("x.txt");
        let outcome = session.resolve(old.to_str().unwrap()).unwrap();
        assert!(outcome.is_err());

        // The old instance keeps working for whoever still holds it.
        assert!(a.resolve(old.to_str().unwrap()).is_ok());
    }

    #[test]
    fn test_failed_select_keeps_previous() {
        let first = TempDir::new().unwrap();
        let mut session = WorkspaceSession::default();
        session.select(first.path()).unwrap();

        assert!(session.select(first.path().join("missing")).is_err());
        assert_eq!(
            session.sandbox().unwrap().root(),
            first.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_clear() {
        let first = TempDir::new().unwrap();
        let mut session = WorkspaceSession::default();
        session.select(first.path()).unwrap();
        session.clear();
        assert!(session.sandbox().is_err());
    }
}
