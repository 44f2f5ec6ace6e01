//! Drives the `taskdeck` binary through piped stdin.

use std::io::Write;
use std::process::{Command, Stdio};

fn run_in(dir: &std::path::Path, script: &str) -> String {
    let mut child = Command::new(env!("CARGO_BIN_EXE_taskdeck"))
        .current_dir(dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to start taskdeck");

    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(script.as_bytes())
        .expect("failed to write script");

    let output = child.wait_with_output().expect("failed to wait for taskdeck");
    assert!(
        output.status.success(),
        "taskdeck exited with non-zero status: {:?}",
        output.status
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn add_persists_tasks_file_in_working_directory() {
    let dir = tempfile::tempdir().expect("temp dir");

    let stdout = run_in(dir.path(), "2\nBuy milk\n\n6\n");
    assert!(stdout.starts_with("Welcome!"));
    assert!(stdout.contains("Task \"Buy milk\" added."));
    assert!(stdout.trim_end().ends_with("Goodbye!"));

    let raw = std::fs::read_to_string(dir.path().join("tasks.json")).expect("tasks.json written");
    assert!(raw.contains("\"title\": \"Buy milk\""));
    assert!(dir.path().join("logs").is_dir());

    let stdout = run_in(dir.path(), "1\n6\n");
    assert!(stdout.contains("1.[ ] Buy milk"));
}

#[test]
fn closed_stdin_exits_cleanly() {
    let dir = tempfile::tempdir().expect("temp dir");

    let stdout = run_in(dir.path(), "");
    assert!(stdout.contains("Goodbye!"));
    assert!(!dir.path().join("tasks.json").exists());
}
