//! CLI commands.

pub(crate) mod check_root;
pub(crate) mod config;
pub(crate) mod resolve;
pub(crate) mod verify;
