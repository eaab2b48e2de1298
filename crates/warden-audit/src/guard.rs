//! A sandbox that records every decision.

use std::sync::Arc;
use std::time::Instant;

use tracing::warn;
use warden_workspace::{ResolvedPath, SandboxViolation, ViolationDetail, WorkspaceSandbox};

use crate::entry::AuditEntry;
use crate::storage::AuditSink;

/// Wraps a [`WorkspaceSandbox`] so each `resolve` leaves an audit entry.
///
/// The sink never influences the decision: if recording fails the failure
/// is logged and the sandbox's result is returned unchanged.
#[derive(Debug, Clone)]
pub struct AuditedSandbox {
    sandbox: Arc<WorkspaceSandbox>,
    sink: Arc<dyn AuditSink>,
}

impl AuditedSandbox {
    /// Attach a sink to a sandbox.
    #[must_use]
    pub fn new(sandbox: Arc<WorkspaceSandbox>, sink: Arc<dyn AuditSink>) -> Self {
        Self { sandbox, sink }
    }

    /// The wrapped sandbox.
    #[must_use]
    pub fn sandbox(&self) -> &Arc<WorkspaceSandbox> {
        &self.sandbox
    }

    /// Resolve `candidate` for `action` and record the outcome.
    ///
    /// # Errors
    ///
    /// Returns the sandbox's violation.
    pub fn resolve(&self, action: &str, candidate: &str) -> Result<ResolvedPath, SandboxViolation> {
        let started = Instant::now();
        let outcome = self.sandbox.resolve(candidate);
        let mut entry =
            AuditEntry::from_outcome(action, candidate, &outcome).with_duration(started.elapsed());
        // Minimal detail keeps the root out of the trail as well.
        if self.sandbox.options().violation_detail == ViolationDetail::Verbose {
            entry = entry.with_detail("workspace", self.sandbox.root().display().to_string());
        }

        if let Err(e) = self.sink.record(&entry) {
            warn!(action, error = %e, "Failed to record audit entry");
        }
        outcome
    }

    /// Resolve several candidates for one action, recording each decision.
    ///
    /// # Errors
    ///
    /// Returns the first violation; later candidates are neither resolved
    /// nor recorded.
    pub fn resolve_all<'a>(
        &self,
        action: &str,
        candidates: impl IntoIterator<Item = &'a str>,
    ) -> Result<Vec<ResolvedPath>, SandboxViolation> {
        candidates
            .into_iter()
            .map(|c| self.resolve(action, c))
            .collect()
    }
}
