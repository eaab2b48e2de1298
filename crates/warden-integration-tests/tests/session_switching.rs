//! Integration tests for switching the active workspace.

use std::sync::Arc;

use warden_test::TempWorkspace;
use warden_workspace::{SandboxError, SandboxOptions, ViolationReason, WorkspaceSession};

#[test]
fn test_switching_moves_the_boundary() {
    let first = TempWorkspace::new();
    let second = TempWorkspace::new();
    let in_first = first.write("dir/report.txt", "q3");

    let mut session = WorkspaceSession::new(SandboxOptions::default());
    session.select(first.root()).unwrap();
    let resolved = session.resolve("dir/report.txt").unwrap().unwrap();
    assert!(resolved.as_path().ends_with("report.txt"));

    let second_sandbox = session.select(second.root()).unwrap();

    // The same relative candidate now lands in the new workspace.
    let moved = session.resolve("dir/report.txt").unwrap().unwrap();
    assert!(moved.as_path().starts_with(second_sandbox.root()));

    // And the old workspace is outside.
    let err = session
        .resolve(in_first.to_str().unwrap())
        .unwrap()
        .unwrap_err();
    assert_eq!(err.reason, ViolationReason::PathEscapesWorkspace);
}

#[test]
fn test_failed_switch_keeps_current_workspace() {
    let ws = TempWorkspace::new();
    let mut session = WorkspaceSession::default();
    let current = session.select(ws.root()).unwrap();

    let missing = ws.outside().join("does-not-exist");
    let err = session.select(&missing).unwrap_err();
    assert!(matches!(err, SandboxError::InvalidRoot { .. }));
    assert_eq!(session.sandbox().unwrap().root(), current.root());
}

#[test]
fn test_sandboxes_handed_out_stay_pinned() {
    let first = TempWorkspace::new();
    let second = TempWorkspace::new();
    let mut session = WorkspaceSession::default();

    // A file operation already in flight keeps the sandbox it started with.
    let in_flight = session.select(first.root()).unwrap();
    session.select(second.root()).unwrap();

    let resolved = in_flight.resolve("dir/a.txt").unwrap();
    assert!(resolved.as_path().starts_with(in_flight.root()));
    assert!(!in_flight.contains(session.sandbox().unwrap().root()));
}

#[test]
fn test_clear_requires_a_new_selection() {
    let ws = TempWorkspace::new();
    let mut session = WorkspaceSession::default();
    session.select(ws.root()).unwrap();
    session.clear();

    assert!(matches!(
        session.resolve("dir"),
        Err(SandboxError::NoWorkspaceSelected)
    ));
}

#[tokio::test]
async fn test_detached_resolution_from_many_tasks() {
    let ws = TempWorkspace::new();
    let sandbox = Arc::new(ws.sandbox());

    let mut handles = Vec::new();
    for i in 0..16 {
        let sandbox = Arc::clone(&sandbox);
        handles.push(tokio::spawn(async move {
            let candidate = if i % 2 == 0 {
                format!("dir/file{i}.txt")
            } else {
                format!("../outside/file{i}.txt")
            };
            (i, sandbox.resolve_detached(candidate).await)
        }));
    }

    for handle in handles {
        let (i, outcome) = handle.await.unwrap();
        if i % 2 == 0 {
            assert!(outcome.unwrap().as_path().starts_with(sandbox.root()));
        } else {
            assert_eq!(
                outcome.unwrap_err().reason,
                ViolationReason::PathEscapesWorkspace
            );
        }
    }
}
