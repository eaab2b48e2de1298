//! Check-root command - validate a directory as a workspace root.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use warden_config::Config;
use warden_workspace::{OsResolver, WorkspaceSandbox};

use crate::config_bridge;
use crate::formatter::OutputFormat;
use crate::theme::Theme;

/// Try to open `root` as a workspace and report the canonical root.
pub(crate) fn run_check_root(cfg: &Config, root: &Path, format: OutputFormat) -> Result<ExitCode> {
    let options = config_bridge::to_sandbox_options(cfg);
    let created = WorkspaceSandbox::create_with(root, options, Arc::new(OsResolver));

    match format {
        OutputFormat::Json => {
            let doc = match &created {
                Ok(sandbox) => serde_json::json!({
                    "root": root.display().to_string(),
                    "valid": true,
                    "canonical": sandbox.root().display().to_string(),
                    "options": sandbox.options(),
                }),
                Err(e) => serde_json::json!({
                    "root": root.display().to_string(),
                    "valid": false,
                    "error": e.to_string(),
                }),
            };
            println!("{}", serde_json::to_string_pretty(&doc)?);
        },
        OutputFormat::Pretty => match &created {
            Ok(sandbox) => {
                println!(
                    "{}",
                    Theme::success(&format!("Workspace root OK: {}", sandbox.root().display()))
                );
                let options = sandbox.options();
                println!(
                    "  {}",
                    Theme::dimmed(&format!(
                        "case: {:?}, detail: {:?}, same volume only: {}",
                        options.case_sensitivity,
                        options.violation_detail,
                        options.same_volume_only
                    ))
                );
            },
            Err(e) => println!("{}", Theme::error(&e.to_string())),
        },
    }

    Ok(if created.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
