//! Warden CLI - resolve agent paths against a workspace sandbox.
//!
//! The binary is a thin shell over the library crates: it loads the layered
//! configuration, sets up logging, and runs one command.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use warden_config::{Config, ConfigError, ResolvedConfig};

mod commands;
mod config_bridge;
mod formatter;
mod theme;

use commands::{check_root, config, resolve, verify};
use formatter::OutputFormat;

/// Warden - workspace sandbox for agent file operations
#[derive(Parser)]
#[command(name = "warden")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a configuration file layered over the user config
    #[arg(short, long, global = true, env = "WARDEN_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format: pretty (default) or json
    #[arg(long, global = true, default_value = "pretty")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve candidate paths against a workspace root
    Resolve {
        /// Workspace root (defaults to `[workspace].root`)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Action recorded in the audit trail
        #[arg(short, long, default_value = "resolve")]
        action: String,

        /// Candidate paths, as the agent would supply them
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Check that a directory can serve as a workspace root
    CheckRoot {
        /// Directory to check
        root: PathBuf,
    },

    /// Run the standard escape scenarios against a scratch workspace
    Verify,

    /// View and check configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show resolved configuration with source annotations
    Show,
    /// Validate the current configuration
    Validate,
    /// Show config file paths and environment variables consulted
    Paths,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let loaded = Config::load(cli.config.as_deref());

    // Set up logging from config, with --verbose override.
    let log_config = match &loaded {
        Ok(resolved) => config_bridge::to_log_config(&resolved.config, cli.verbose),
        Err(_) => config_bridge::fallback_log_config(cli.verbose),
    };
    if let Err(e) = warden_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let format = OutputFormat::from_flag(&cli.format);

    match cli.command {
        Commands::Resolve {
            root,
            action,
            paths,
        } => {
            let resolved = require(loaded)?;
            resolve::run_resolve(&resolved.config, root.as_deref(), &action, &paths, format).await
        },
        Commands::CheckRoot { root } => {
            let resolved = require(loaded)?;
            check_root::run_check_root(&resolved.config, &root, format)
        },
        Commands::Verify => {
            let resolved = require(loaded)?;
            verify::run_verify(&resolved.config, format)
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show => config::show_config(&require(loaded)?, format),
            ConfigCommands::Validate => Ok(config::validate_config(&loaded)),
            ConfigCommands::Paths => Ok(config::show_paths(cli.config.as_deref())),
        },
    }
}

fn require(loaded: Result<ResolvedConfig, ConfigError>) -> Result<ResolvedConfig> {
    loaded.context("failed to load configuration")
}
