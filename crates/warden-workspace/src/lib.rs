//! Warden Workspace - the path sandbox for agent file operations.
//!
//! Every read, write, list, or delete the agent asks for names a path. Before
//! the host performs any I/O it hands that path to a [`WorkspaceSandbox`],
//! which either returns the single canonical location inside the selected
//! workspace or a [`SandboxViolation`] explaining why the request was refused.
//!
//! # Key Concepts
//!
//! - **Workspace root**: the canonical (link-free) directory the user picked
//! - **Candidate**: an untrusted path string, relative or absolute, in either
//!   Unix or Windows spelling
//! - **Resolved path**: the fully dereferenced result, always the root itself
//!   or a component-wise descendant of it
//!
//! # Example
//!
//! ```rust,no_run
//! use warden_workspace::{ViolationReason, WorkspaceSandbox};
//!
//! # fn main() -> Result<(), warden_workspace::SandboxError> {
//! let sandbox = WorkspaceSandbox::create("/home/user/project")?;
//!
//! match sandbox.resolve("src/main.rs") {
//!     Ok(path) => println!("safe to open {path}"),
//!     Err(v) if v.reason == ViolationReason::PathEscapesWorkspace => {
//!         println!("that path is outside your workspace");
//!     },
//!     Err(v) => println!("refused: {v}"),
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod boundaries;
pub mod config;
pub mod error;
pub mod path;
pub mod resolver;
pub mod sandbox;
pub mod session;
pub mod syntax;

#[cfg(feature = "tokio")]
mod offload;

pub use config::{CaseSensitivity, SandboxOptions, ViolationDetail};
pub use error::{SandboxError, SandboxResult, SandboxViolation, ViolationReason};
pub use resolver::{EntryKind, OsResolver, PathResolver};
pub use sandbox::{ResolvedPath, WorkspaceSandbox};
pub use session::WorkspaceSession;
