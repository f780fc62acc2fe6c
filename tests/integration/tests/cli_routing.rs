//! CLI binary integration tests.
//!
//! These tests exercise the compiled `sigvault` binary to verify that
//! command routing, output, and exit codes work as expected.

use std::process::{Command, Output};

use sigvault_integration_tests::{sigvault_bin, Sandbox, KNOWN_SIGNATURE};

fn run(mut cmd: Command) -> Output {
    cmd.output().expect("failed to run sigvault")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn write_foobar(sandbox: &Sandbox) {
    let mut cmd = sandbox.cmd();
    cmd.args(["write", "key_name", "secret_access_key=foobar"]);
    let output = run(cmd);
    assert!(
        output.status.success(),
        "write should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::new(sigvault_bin());
    cmd.arg("version");
    let output = run(cmd);
    assert!(output.status.success(), "version command should succeed");
    assert!(
        stdout(&output).starts_with("sigvault "),
        "version output should start with 'sigvault', got: {}",
        stdout(&output)
    );
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::new(sigvault_bin());
    cmd.arg("--help");
    let output = run(cmd);
    assert!(output.status.success(), "--help should succeed");
    let out = stdout(&output);
    for command in ["write", "read", "delete", "sign", "raw", "config"] {
        assert!(out.contains(command), "help should mention '{}': {}", command, out);
    }
}

#[test]
fn test_cli_unknown_command() {
    let mut cmd = Command::new(sigvault_bin());
    cmd.arg("nonexistent-command");
    assert!(!run(cmd).status.success());
}

#[test]
fn test_sign_known_vector() {
    let sandbox = Sandbox::new();
    write_foobar(&sandbox);

    let mut cmd = sandbox.cmd();
    cmd.args([
        "sign",
        "key_name",
        "--date",
        "20150831",
        "--region",
        "us-east-1",
        "--service",
        "ec2",
    ]);
    let output = run(cmd);
    assert!(output.status.success());
    assert_eq!(stdout(&output), KNOWN_SIGNATURE);
}

#[test]
fn test_read_derivation_path_prints_json() {
    let sandbox = Sandbox::new();
    write_foobar(&sandbox);

    let mut cmd = sandbox.cmd();
    cmd.args(["read", "key_name/20150831/ec2/us-east-1"]);
    let output = run(cmd);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value, serde_json::json!({ "signature": KNOWN_SIGNATURE }));
}

#[test]
fn test_raw_returns_stored_secret() {
    let sandbox = Sandbox::new();
    write_foobar(&sandbox);

    let mut cmd = sandbox.cmd();
    cmd.args(["raw", "key_name"]);
    let output = run(cmd);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "foobar");
}

#[test]
fn test_raw_path_via_read_is_denied() {
    let sandbox = Sandbox::new();
    write_foobar(&sandbox);

    let mut cmd = sandbox.cmd();
    cmd.args(["read", "raw/key_name"]);
    let output = run(cmd);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Permission denied"));
}

#[test]
fn test_delete_then_read_is_empty() {
    let sandbox = Sandbox::new();
    write_foobar(&sandbox);

    for _ in 0..2 {
        let mut cmd = sandbox.cmd();
        cmd.args(["delete", "key_name"]);
        assert!(run(cmd).status.success(), "delete should be idempotent");
    }

    let mut cmd = sandbox.cmd();
    cmd.args(["raw", "key_name"]);
    let output = run(cmd);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "No value found");
}

#[test]
fn test_invalid_path_fails() {
    let sandbox = Sandbox::new();

    let mut cmd = sandbox.cmd();
    cmd.args(["read", "key_name/20150831"]);
    let output = run(cmd);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid path"));

    // Nothing reached storage.
    let stored = std::fs::read_dir(sandbox.storage_dir())
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(stored, 0);
}

#[test]
fn test_config_path_honours_env() {
    let sandbox = Sandbox::new();

    let mut cmd = sandbox.cmd();
    cmd.args(["config", "path"]);
    let output = run(cmd);
    assert!(output.status.success());
    assert_eq!(stdout(&output), sandbox.config_path().display().to_string());
}

#[test]
fn test_long_key_id_round_trips_through_file_storage() {
    let sandbox = Sandbox::new();
    let key_id = "k".repeat(200);

    let mut cmd = sandbox.cmd();
    cmd.args(["write", key_id.as_str(), "secret_access_key=foobar"]);
    let output = run(cmd);
    assert!(
        output.status.success(),
        "write should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let mut cmd = sandbox.cmd();
    cmd.args([
        "sign",
        key_id.as_str(),
        "--date",
        "20150831",
        "--region",
        "us-east-1",
        "--service",
        "ec2",
    ]);
    let output = run(cmd);
    assert!(output.status.success());
    assert_eq!(stdout(&output), KNOWN_SIGNATURE);
}
