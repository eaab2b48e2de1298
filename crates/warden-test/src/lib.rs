//! Warden Test - Shared test utilities for the workspace sandbox.
//!
//! This crate provides an in-memory [`PathResolver`](warden_workspace::PathResolver)
//! and temporary workspace fixtures that can be used across Warden crates as
//! a dev-dependency.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! warden-test.workspace = true
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use warden_test::MockFs;
//! use warden_workspace::{SandboxOptions, WorkspaceSandbox};
//!
//! let fs = MockFs::new()
//!     .dir("/ws")
//!     .dir("/secrets")
//!     .symlink("/ws/out", "/secrets");
//!
//! let sandbox =
//!     WorkspaceSandbox::create_with("/ws", SandboxOptions::default(), Arc::new(fs)).unwrap();
//! assert!(sandbox.resolve("out/key.pem").is_err());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
