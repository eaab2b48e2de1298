//! Resolve command - check candidate paths against a workspace.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::info;
use warden_audit::{AuditedSandbox, JsonlAuditLog};
use warden_config::Config;
use warden_workspace::{OsResolver, ResolvedPath, SandboxViolation, WorkspaceSandbox};

use crate::config_bridge;
use crate::formatter::{OutputFormat, outcome_json, outcome_line};
use crate::theme::Theme;

type Outcome = Result<ResolvedPath, SandboxViolation>;

/// Pick the workspace root: `--root` first, then `[workspace].root`.
pub(crate) fn workspace_root(cfg: &Config, flag: Option<&Path>) -> Result<PathBuf> {
    if let Some(root) = flag {
        return Ok(root.to_path_buf());
    }
    match &cfg.workspace.root {
        Some(root) => Ok(PathBuf::from(root)),
        None => bail!("no workspace root: pass --root or set [workspace].root"),
    }
}

/// Resolve every candidate and print one result per path.
///
/// Exits with status 1 if any candidate was refused.
pub(crate) async fn run_resolve(
    cfg: &Config,
    root: Option<&Path>,
    action: &str,
    paths: &[String],
    format: OutputFormat,
) -> Result<ExitCode> {
    let root = workspace_root(cfg, root)?;
    let sandbox = WorkspaceSandbox::create_with(
        &root,
        config_bridge::to_sandbox_options(cfg),
        Arc::new(OsResolver),
    )
    .with_context(|| format!("cannot open workspace {}", root.display()))?;

    let outcomes = match config_bridge::audit_dir(cfg)? {
        Some(dir) => {
            let log = JsonlAuditLog::open(&dir)
                .with_context(|| format!("cannot open audit log in {}", dir.display()))?;
            info!(path = %log.path().display(), "Recording decisions");
            let audited = AuditedSandbox::new(Arc::new(sandbox.clone()), Arc::new(log));
            let action = action.to_owned();
            let paths = paths.to_vec();
            tokio::task::spawn_blocking(move || {
                paths
                    .iter()
                    .map(|p| audited.resolve(&action, p))
                    .collect::<Vec<Outcome>>()
            })
            .await
            .context("resolution task failed")?
        },
        None => {
            let mut outcomes = Vec::with_capacity(paths.len());
            for path in paths {
                outcomes.push(sandbox.resolve_detached(path.as_str()).await);
            }
            outcomes
        },
    };

    print_outcomes(&sandbox, paths, &outcomes, format)?;

    if outcomes.iter().all(Result::is_ok) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn print_outcomes(
    sandbox: &WorkspaceSandbox,
    paths: &[String],
    outcomes: &[Outcome],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let results: Vec<_> = paths
                .iter()
                .zip(outcomes)
                .map(|(p, o)| outcome_json(p, o))
                .collect();
            let doc = serde_json::json!({
                "workspace": sandbox.root().display().to_string(),
                "results": results,
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        },
        OutputFormat::Pretty => {
            println!(
                "{}",
                Theme::header(&format!("Workspace {}", sandbox.root().display()))
            );
            println!("{}", Theme::separator());
            for (p, o) in paths.iter().zip(outcomes) {
                println!("{}", outcome_line(p, o));
            }
        },
    }
    Ok(())
}
