//! CLI integration tests.
//!
//! These tests run the `devplan` binary against an isolated project root.

use std::process::{Command, Output};

use tempfile::TempDir;

fn devplan(root: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_devplan"))
        .arg("--root")
        .arg(root.path())
        .args(args)
        .output()
        .expect("Failed to run devplan")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "devplan failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Pull the first backticked id following `marker` out of a rendered plan.
fn id_after(plan: &str, marker: &str) -> String {
    let rest = &plan[plan.find(marker).expect("marker missing") + marker.len()..];
    let start = rest.find('`').expect("id missing") + 1;
    let end = start + rest[start..].find('`').expect("id unterminated");
    rest[start..end].to_string()
}

#[test]
fn plans_an_iteration_end_to_end() {
    let root = tempfile::tempdir().expect("Failed to create temp dir");

    stdout(&devplan(&root, &["start", "1.0.0", "--prd", "Build login"]));

    let added = stdout(&devplan(
        &root,
        &[
            "decompose",
            "auth",
            r#"[{"title": "Login form", "description": "Email and password"}]"#,
        ],
    ));
    assert!(added.contains("Added 1 requirements to goal auth"));

    let plan = stdout(&devplan(&root, &["plan"]));
    let requirement_id = id_after(&plan, "Login form");

    stdout(&devplan(
        &root,
        &[
            "generate",
            &requirement_id,
            r#"[{"title": "Build form", "description": "Fields", "complexity": "low"},
                {"title": "Wire backend", "description": "Session call", "complexity": "high"}]"#,
        ],
    ));

    let plan = stdout(&devplan(&root, &["plan"]));
    assert!(plan.contains("**Status**: in_progress"));
    assert!(plan.contains("🟢 **Build form**"));
    assert!(plan.contains("🔴 **Wire backend**"));

    let task_id = id_after(&plan, "**Build form**");
    let change = stdout(&devplan(&root, &["task", &task_id, "done"]));
    assert!(change.contains("\"new_status\": \"done\""));

    let plan = stdout(&devplan(&root, &["plan"]));
    assert!(plan.contains("- **Completion**: 50.0%"));
}

#[test]
fn rejects_malformed_task_lists() {
    let root = tempfile::tempdir().expect("Failed to create temp dir");
    stdout(&devplan(&root, &["start", "1.0.0", "--prd", "prd"]));

    let output = devplan(
        &root,
        &["generate", "r1", r#"[{"title": "x", "complexity": "huge"}]"#],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("tasks must be a JSON array"));
}
