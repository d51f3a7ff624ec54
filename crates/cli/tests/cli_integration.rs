//! End-to-end checks of the `ticketmail` binary that need no network

use std::process::Command;

fn ticketmail() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_ticketmail"));
    command.env_remove("RUST_LOG");
    command
}

#[test]
fn no_flags_prints_help_and_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = ticketmail().current_dir(dir.path()).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--send-emails"));
    assert!(stdout.contains("--data-folder"));
}

#[test]
fn missing_config_exits_with_config_code() {
    let dir = tempfile::tempdir().unwrap();
    let output = ticketmail()
        .current_dir(dir.path())
        .args(["--config", "absent.toml", "--events"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: Configuration error: Config file not found"));
}

#[test]
fn conflicting_past_flags_are_rejected() {
    let output = ticketmail().args(["--events", "--past", "--auto-include-past"]).output().unwrap();
    assert!(!output.status.success());
}
