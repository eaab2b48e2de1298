//! Config command - show, validate, and locate configuration.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use warden_config::{ConfigError, ResolvedConfig, ShowFormat};

use crate::formatter::OutputFormat;
use crate::theme::Theme;

/// Print the resolved configuration with per-field sources.
pub(crate) fn show_config(resolved: &ResolvedConfig, format: OutputFormat) -> Result<ExitCode> {
    let show_format = match format {
        OutputFormat::Json => ShowFormat::Json,
        OutputFormat::Pretty => ShowFormat::Toml,
    };
    let rendered = resolved
        .show(show_format)
        .context("failed to render configuration")?;
    println!("{rendered}");
    Ok(ExitCode::SUCCESS)
}

/// Report whether the configuration loaded and validated.
pub(crate) fn validate_config(loaded: &Result<ResolvedConfig, ConfigError>) -> ExitCode {
    match loaded {
        Ok(resolved) => {
            println!("{}", Theme::success("Configuration is valid"));
            for path in &resolved.loaded_files {
                println!("  {}", Theme::dimmed(path));
            }
            ExitCode::SUCCESS
        },
        Err(e) => {
            println!("{}", Theme::error(&e.to_string()));
            ExitCode::FAILURE
        },
    }
}

/// List the files and environment variables the loader consults.
pub(crate) fn show_paths(explicit: Option<&Path>) -> ExitCode {
    println!("{}", Theme::header("Configuration files"));
    println!("{}", Theme::separator());

    match warden_config::loader::warden_home() {
        Ok(home) => print_file("user", &home.join("config.toml")),
        Err(e) => println!("{}", Theme::error(&format!("user: {e}"))),
    }
    if let Some(path) = explicit {
        print_file("explicit", path);
    }

    println!();
    println!("{}", Theme::header("Environment variables"));
    println!("{}", Theme::separator());
    for var in warden_config::env::known_vars() {
        let state = if std::env::var_os(var).is_some() {
            "set".green()
        } else {
            "unset".dimmed()
        };
        println!("  {var:<26} {state}");
    }

    ExitCode::SUCCESS
}

fn print_file(layer: &str, path: &Path) {
    let state = if path.is_file() {
        "found".green()
    } else {
        "missing".dimmed()
    };
    println!(
        "  {} {} {state}",
        format!("{layer:<9}").bold(),
        path.display()
    );
    if !path.is_file() && layer == "explicit" {
        println!("    {}", Theme::info("the explicit file must exist"));
    }
}
