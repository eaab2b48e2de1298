//! Prelude module - commonly used types for convenient import.
//!
//! Use `use warden_workspace::prelude::*;` to import all essential types.

// Sandbox
pub use crate::{ResolvedPath, WorkspaceSandbox, WorkspaceSession};

// Configuration
pub use crate::{CaseSensitivity, SandboxOptions, ViolationDetail};

// Errors
pub use crate::{SandboxError, SandboxResult, SandboxViolation, ViolationReason};

// Filesystem capability
pub use crate::{EntryKind, OsResolver, PathResolver};
