//! Resolution off the async executor.
//!
//! Canonicalization is blocking I/O and can stall on network storage, so
//! async callers hand it to tokio's blocking pool. No timeout is applied.

use crate::error::{SandboxViolation, ViolationReason};
use crate::sandbox::{ResolvedPath, WorkspaceSandbox};

impl WorkspaceSandbox {
    /// Run [`resolve`](Self::resolve) on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// Returns the sandbox's violation, or a `ResolutionError` if the
    /// blocking task could not complete.
    pub async fn resolve_detached(
        &self,
        candidate: impl Into<String>,
    ) -> Result<ResolvedPath, SandboxViolation> {
        let sandbox = self.clone();
        let candidate = candidate.into();
        tokio::task::spawn_blocking(move || sandbox.resolve(&candidate))
            .await
            .unwrap_or_else(|e| {
                Err(SandboxViolation::new(
                    ViolationReason::ResolutionError,
                    format!("resolution task failed: {e}"),
                ))
            })
    }
}
