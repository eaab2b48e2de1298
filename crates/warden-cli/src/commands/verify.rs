//! Verify command - run the standard escape scenarios on this host.
//!
//! Builds a scratch layout in a temporary directory:
//!
//! ```text
//! <tmp>/outside.txt
//! <tmp>/workspace/dir/a.txt
//! <tmp>/workspace2/x.txt
//! ```
//!
//! and checks that each candidate is accepted or refused as expected.

use std::fs;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use tempfile::TempDir;
use warden_config::Config;
use warden_workspace::path::drive_letter;
use warden_workspace::{OsResolver, ViolationReason, WorkspaceSandbox};

use crate::config_bridge;
use crate::formatter::{OutputFormat, outcome_json, outcome_line};
use crate::theme::Theme;

/// What a scenario expects from `resolve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Expect {
    /// The candidate resolves inside the workspace.
    Allowed,
    /// The candidate is refused for this reason.
    Denied(ViolationReason),
}

/// One named candidate.
#[derive(Debug, Clone)]
pub(crate) struct Scenario {
    pub(crate) name: &'static str,
    pub(crate) candidate: String,
    pub(crate) expect: Expect,
}

/// Run every scenario; exits with status 1 on any mismatch.
pub(crate) fn run_verify(cfg: &Config, format: OutputFormat) -> Result<ExitCode> {
    let scratch = TempDir::new().context("cannot create scratch directory")?;
    build_layout(scratch.path())?;

    let sandbox = WorkspaceSandbox::create_with(
        scratch.path().join("workspace"),
        config_bridge::to_sandbox_options(cfg),
        Arc::new(OsResolver),
    )?;
    let scenarios = scenarios(&sandbox)?;

    let mut failed = 0_usize;
    let mut report = Vec::with_capacity(scenarios.len());

    if format == OutputFormat::Pretty {
        println!("{}", Theme::header("Escape scenarios"));
        println!("{}", Theme::separator());
    }

    for scenario in &scenarios {
        let outcome = sandbox.resolve(&scenario.candidate);
        let actual = match &outcome {
            Ok(_) => Expect::Allowed,
            Err(v) => Expect::Denied(v.reason),
        };
        let passed = actual == scenario.expect;
        if !passed {
            failed = failed.saturating_add(1);
        }

        match format {
            OutputFormat::Json => {
                let mut entry = outcome_json(&scenario.candidate, &outcome);
                entry["scenario"] = scenario.name.into();
                entry["passed"] = passed.into();
                report.push(entry);
            },
            OutputFormat::Pretty => {
                let mark = if passed {
                    Theme::success(scenario.name)
                } else {
                    Theme::error(scenario.name)
                };
                println!("{mark}");
                println!("    {}", outcome_line(&scenario.candidate, &outcome));
            },
        }
    }

    match format {
        OutputFormat::Json => {
            let doc = serde_json::json!({
                "scenarios": report,
                "failed": failed,
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        },
        OutputFormat::Pretty => {
            println!("{}", Theme::separator());
            if failed == 0 {
                println!("{}", Theme::success("All scenarios behaved as expected"));
            } else {
                println!("{}", Theme::error(&format!("{failed} scenario(s) failed")));
            }
        },
    }

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn build_layout(base: &Path) -> Result<()> {
    fs::create_dir_all(base.join("workspace").join("dir"))?;
    fs::create_dir_all(base.join("workspace2"))?;
    fs::write(base.join("workspace").join("dir").join("a.txt"), "inside")?;
    fs::write(base.join("workspace2").join("x.txt"), "sibling")?;
    fs::write(base.join("outside.txt"), "outside")?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::symlink;
        symlink(base, base.join("workspace").join("escape"))?;
        symlink(
            base.join("workspace").join("gone"),
            base.join("workspace").join("dangling"),
        )?;
    }
    Ok(())
}

/// The scenario table for a sandbox built by `build_layout`.
pub(crate) fn scenarios(sandbox: &WorkspaceSandbox) -> Result<Vec<Scenario>> {
    let root = sandbox.root();
    let base = root
        .parent()
        .context("scratch workspace has no parent directory")?;
    let text = |p: &Path| p.display().to_string();
    let other_drive = if drive_letter(root) == Some('Z') { 'Y' } else { 'Z' };

    let escapes = Expect::Denied(ViolationReason::PathEscapesWorkspace);
    let mut list = vec![
        Scenario {
            name: "ok_relative",
            candidate: "dir/a.txt".to_owned(),
            expect: Expect::Allowed,
        },
        Scenario {
            name: "ok_absolute",
            candidate: text(&root.join("dir").join("a.txt")),
            expect: Expect::Allowed,
        },
        Scenario {
            name: "ok_new_file",
            candidate: "dir/new/file.txt".to_owned(),
            expect: Expect::Allowed,
        },
        Scenario {
            name: "fail_traversal",
            candidate: r"..\outside.txt".to_owned(),
            expect: escapes,
        },
        Scenario {
            name: "fail_absolute_outside",
            candidate: text(&base.join("outside.txt")),
            expect: escapes,
        },
        Scenario {
            name: "fail_sibling",
            candidate: text(&base.join("workspace2").join("x.txt")),
            expect: escapes,
        },
        Scenario {
            name: "fail_unc",
            candidate: r"\\server\share\file.txt".to_owned(),
            expect: Expect::Denied(ViolationReason::UncPathRejected),
        },
        Scenario {
            name: "fail_long_path",
            candidate: r"\\?\C:\Windows\System32".to_owned(),
            expect: Expect::Denied(ViolationReason::LongPathRejected),
        },
        Scenario {
            name: "fail_other_drive",
            candidate: format!(r"{other_drive}:\tmp\file.txt"),
            expect: Expect::Denied(ViolationReason::CrossDriveRejected),
        },
    ];

    if cfg!(unix) {
        list.push(Scenario {
            name: "fail_symlink_escape",
            candidate: "escape/outside.txt".to_owned(),
            expect: escapes,
        });
        list.push(Scenario {
            name: "fail_dangling_link",
            candidate: "dangling/file.txt".to_owned(),
            expect: Expect::Denied(ViolationReason::ResolutionError),
        });
    }

    Ok(list)
}
