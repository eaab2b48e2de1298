//! Warden Audit - an append-only trail of sandbox decisions.
//!
//! Every path the agent asks for is recorded with the action it was meant
//! for and the sandbox's answer, so a session can be reviewed afterwards.
//! Entries are written as JSON lines to `<dir>/audit.log.jsonl`.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use warden_audit::{AuditedSandbox, JsonlAuditLog};
//! use warden_workspace::WorkspaceSandbox;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sandbox = Arc::new(WorkspaceSandbox::create("/home/user/project")?);
//! let log = Arc::new(JsonlAuditLog::open("/home/user/.warden/audit")?);
//! let audited = AuditedSandbox::new(sandbox, log);
//!
//! let path = audited.resolve("read", "src/main.rs")?;
//! println!("{path}");
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

mod entry;
mod error;
mod guard;
mod storage;

pub use entry::{AuditEntry, AuditStatus};
pub use error::{AuditError, AuditResult};
pub use guard::AuditedSandbox;
pub use storage::{AuditSink, JsonlAuditLog, LOG_FILE_NAME, MemoryAuditLog, read_entries};
