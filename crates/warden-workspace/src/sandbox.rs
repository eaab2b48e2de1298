//! The workspace sandbox.

use std::ffi::OsString;
use std::fmt;
use std::io;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::boundaries::WorkspaceBoundary;
use crate::config::{SandboxOptions, ViolationDetail};
use crate::error::{SandboxError, SandboxResult, SandboxViolation, ViolationReason};
use crate::path::{drive_letter, is_plain_name, normalize, volume_root};
use crate::resolver::{EntryKind, OsResolver, PathResolver};
use crate::syntax::{CandidateSyntax, classify, segments};

/// A canonical path verified to lie inside the workspace.
///
/// Only [`WorkspaceSandbox::resolve`] produces these. Callers must do their
/// I/O on this path, never on the original candidate string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedPath(PathBuf);

impl ResolvedPath {
    /// Borrow the path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Take ownership of the path.
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl Deref for ResolvedPath {
    type Target = Path;

    fn deref(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for ResolvedPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.display().fmt(f)
    }
}

/// Confines agent-supplied paths to one workspace directory.
///
/// The root is canonicalized once at creation and never changes. Each
/// [`resolve`](Self::resolve) call is independent: nothing is cached, since
/// link targets can change between calls. The sandbox holds no mutable
/// state, so it can be shared across threads freely.
#[derive(Debug, Clone)]
pub struct WorkspaceSandbox {
    boundary: WorkspaceBoundary,
    root_drive: Option<char>,
    root_volume: Option<u64>,
    options: SandboxOptions,
    resolver: Arc<dyn PathResolver>,
}

impl WorkspaceSandbox {
    /// Create a sandbox on the host filesystem with default options.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::InvalidRoot`] if `root` is empty, missing, not
    /// a directory, or cannot be canonicalized.
    pub fn create(root: impl AsRef<Path>) -> SandboxResult<Self> {
        Self::create_with(root, SandboxOptions::default(), Arc::new(OsResolver))
    }

    /// Create a sandbox with explicit options and filesystem capability.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::InvalidRoot`] if `root` is empty, missing, not
    /// a directory, or cannot be canonicalized.
    pub fn create_with(
        root: impl AsRef<Path>,
        options: SandboxOptions,
        resolver: Arc<dyn PathResolver>,
    ) -> SandboxResult<Self> {
        let given = root.as_ref();
        let shown = given.display().to_string();

        if shown.trim().is_empty() {
            return Err(SandboxError::invalid_root(shown, "path is empty"));
        }

        let canonical = resolver.real_path(given).map_err(|e| {
            let reason = if e.kind() == io::ErrorKind::NotFound {
                "does not exist"
            } else {
                "cannot be canonicalized"
            };
            SandboxError::root_io(shown.clone(), reason, e)
        })?;

        match resolver.entry_kind(&canonical) {
            Ok(Some(EntryKind::Directory)) => {},
            Ok(_) => return Err(SandboxError::invalid_root(shown, "not a directory")),
            Err(e) => return Err(SandboxError::root_io(shown, "cannot be inspected", e)),
        }

        let root_volume = if options.same_volume_only {
            resolver
                .volume_id(&canonical)
                .map_err(|e| SandboxError::root_io(shown.clone(), "volume cannot be read", e))?
        } else {
            None
        };

        info!(root = %canonical.display(), "Workspace sandbox created");

        Ok(Self {
            root_drive: drive_letter(&canonical),
            boundary: WorkspaceBoundary::new(canonical, options.case_sensitivity),
            root_volume,
            options,
            resolver,
        })
    }

    /// Get the canonical workspace root.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.boundary.root()
    }

    /// Get the sandbox options.
    #[must_use]
    pub fn options(&self) -> &SandboxOptions {
        &self.options
    }

    /// Check if an already canonical path lies inside the workspace.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.boundary.contains(path)
    }

    /// The part of a resolved path below the root (empty for the root).
    #[must_use]
    pub fn relative_path(&self, resolved: &ResolvedPath) -> PathBuf {
        self.boundary.relative(resolved).unwrap_or_default()
    }

    /// Resolve an untrusted candidate path.
    ///
    /// On success the result is the canonical path, equal to the root or a
    /// descendant of it. Every rejection is final; the caller must not touch
    /// the filesystem on behalf of a rejected candidate.
    ///
    /// # Errors
    ///
    /// Returns a [`SandboxViolation`] describing why the candidate was refused.
    pub fn resolve(&self, candidate: &str) -> Result<ResolvedPath, SandboxViolation> {
        let outcome = self.resolve_inner(candidate);
        match &outcome {
            Ok(path) => debug!(candidate, resolved = %path, "Path resolved inside workspace"),
            Err(v) => warn!(candidate, reason = %v.reason, "Rejected workspace path"),
        }
        outcome
    }

    /// Resolve several candidates for one operation (for example the source
    /// and destination of a copy).
    ///
    /// # Errors
    ///
    /// Returns the first violation; later candidates are not examined.
    pub fn resolve_all<'a>(
        &self,
        candidates: impl IntoIterator<Item = &'a str>,
    ) -> Result<Vec<ResolvedPath>, SandboxViolation> {
        candidates.into_iter().map(|c| self.resolve(c)).collect()
    }

    fn resolve_inner(&self, candidate: &str) -> Result<ResolvedPath, SandboxViolation> {
        if candidate.trim().is_empty() {
            return Err(SandboxViolation::invalid("path is empty"));
        }
        if candidate.contains('\0') {
            return Err(SandboxViolation::invalid(format!(
                "path contains a NUL byte: {}",
                candidate.escape_debug()
            )));
        }

        let syntax = classify(candidate);
        let (base, rest) = match syntax {
            CandidateSyntax::Verbatim => {
                return Err(SandboxViolation::new(
                    ViolationReason::LongPathRejected,
                    candidate,
                ));
            },
            CandidateSyntax::Unc => {
                return Err(SandboxViolation::new(
                    ViolationReason::UncPathRejected,
                    candidate,
                ));
            },
            CandidateSyntax::DriveRelative { .. } => {
                return Err(SandboxViolation::invalid(format!(
                    "drive-relative paths are not allowed: {candidate}"
                )));
            },
            CandidateSyntax::DriveAbsolute { drive, rest } => {
                if self.root_drive != Some(drive) {
                    return Err(SandboxViolation::new(
                        ViolationReason::CrossDriveRejected,
                        candidate,
                    ));
                }
                (volume_root(self.root()), rest)
            },
            CandidateSyntax::Rooted { rest } => (volume_root(self.root()), rest),
            CandidateSyntax::Relative { rest } => (self.root().to_path_buf(), rest),
        };

        let lexical = normalize(&base, segments(rest), cfg!(windows))
            .map_err(|e| SandboxViolation::invalid(format!("{e}: {candidate}")))?;

        // A relative candidate starts from the canonical root, so leaving it
        // lexically is already conclusive. Absolute candidates may spell the
        // root through an alias and must be canonicalized first.
        if !syntax.is_absolute() && !self.contains(&lexical) {
            return Err(self.escape(candidate, &lexical));
        }

        let (existing, pending) = self.deepest_existing(candidate, &lexical)?;

        // An absolute candidate naming another volume is a drive mismatch,
        // whether or not it also lies outside the root.
        if self.options.same_volume_only && syntax.is_absolute() {
            self.check_volume(candidate, &existing)?;
        }

        if !self.contains(&existing) {
            return Err(self.escape(candidate, &existing));
        }

        if self.options.same_volume_only && !syntax.is_absolute() {
            self.check_volume(candidate, &existing)?;
        }

        let mut resolved = existing;
        for name in pending.iter().rev() {
            if !is_plain_name(name) {
                return Err(SandboxViolation::invalid(format!(
                    "unexpected segment {name:?} in {candidate}"
                )));
            }
            resolved.push(name);
        }

        if !self.contains(&resolved) {
            return Err(self.escape(candidate, &resolved));
        }

        Ok(ResolvedPath(resolved))
    }

    /// Canonicalize the deepest existing ancestor of `lexical`.
    ///
    /// Returns the canonical ancestor and the names that do not exist yet,
    /// innermost first.
    fn deepest_existing(
        &self,
        candidate: &str,
        lexical: &Path,
    ) -> Result<(PathBuf, Vec<OsString>), SandboxViolation> {
        let mut probe = lexical.to_path_buf();
        let mut pending = Vec::new();

        loop {
            match self.resolver.real_path(&probe) {
                Ok(real) => return Ok((real, pending)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    // A link whose target is missing still exists; writing
                    // through it would create the target wherever it points.
                    match self.resolver.entry_kind(&probe) {
                        Ok(None) => {},
                        Err(e2) if e2.kind() == io::ErrorKind::NotFound => {},
                        Ok(Some(EntryKind::Link)) => {
                            return Err(SandboxViolation::new(
                                ViolationReason::ResolutionError,
                                format!("{} is a broken link", self.subject(candidate, &probe)),
                            ));
                        },
                        Ok(Some(_)) => {
                            return Err(SandboxViolation::resolution(
                                self.subject(candidate, &probe),
                                &e,
                            ));
                        },
                        Err(e2) => {
                            return Err(SandboxViolation::resolution(
                                self.subject(candidate, &probe),
                                &e2,
                            ));
                        },
                    }

                    let Some(name) = probe.file_name().map(ToOwned::to_owned) else {
                        return Err(SandboxViolation::resolution(
                            self.subject(candidate, &probe),
                            &e,
                        ));
                    };
                    pending.push(name);
                    if !probe.pop() {
                        return Err(SandboxViolation::resolution(
                            self.subject(candidate, &probe),
                            &e,
                        ));
                    }
                },
                Err(e) => {
                    return Err(SandboxViolation::resolution(
                        self.subject(candidate, &probe),
                        &e,
                    ));
                },
            }
        }
    }

    fn check_volume(&self, candidate: &str, existing: &Path) -> Result<(), SandboxViolation> {
        let volume = self
            .resolver
            .volume_id(existing)
            .map_err(|e| SandboxViolation::resolution(self.subject(candidate, existing), &e))?;
        if volume != self.root_volume {
            return Err(SandboxViolation::new(
                ViolationReason::CrossDriveRejected,
                self.subject(candidate, existing),
            ));
        }
        Ok(())
    }

    fn escape(&self, candidate: &str, resolved: &Path) -> SandboxViolation {
        SandboxViolation::new(
            ViolationReason::PathEscapesWorkspace,
            self.subject(candidate, resolved),
        )
    }

    /// What a violation message may mention, per the detail policy.
    fn subject(&self, candidate: &str, path: &Path) -> String {
        match self.options.violation_detail {
            ViolationDetail::Verbose => path.display().to_string(),
            ViolationDetail::Minimal => candidate.to_owned(),
        }
    }
}
