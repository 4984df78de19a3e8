#![cfg(all(unix, feature = "cli"))]

use std::process::{Command, Output};
use std::time::{Duration, Instant};

fn stdioframe(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stdioframe"))
        .env_remove("STDIOFRAME_EXE")
        .env_remove("STDIOFRAME_TIMEOUT")
        .arg("--log-level")
        .arg("error")
        .args(args)
        .output()
        .expect("stdioframe should run")
}

fn invoke_sh(script: &str, extra: &[&str]) -> Output {
    let mut args = vec![
        "invoke", "ping", "--exe", "/bin/sh", "--arg", "-c", "--arg", script,
    ];
    args.extend_from_slice(extra);
    stdioframe(&args)
}

#[test]
fn invoke_echo_collaborator_reports_exchange_as_json() {
    let output = invoke_sh("cat", &["--format", "json"]);

    assert!(output.status.success(), "{output:?}");
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("invoke should emit json");
    assert_eq!(payload.get("message").and_then(|v| v.as_str()), Some("ping"));
    assert_eq!(payload.get("reply").and_then(|v| v.as_str()), Some("ping"));
    assert_eq!(
        payload.get("request").and_then(|v| v.as_str()),
        Some("\\x04\\x00\\x00\\x00ping")
    );
    assert_eq!(payload.get("request_size").and_then(|v| v.as_u64()), Some(8));
    assert_eq!(payload.get("trailing_bytes").and_then(|v| v.as_u64()), Some(0));
}

#[test]
fn invoke_pretty_lists_each_step() {
    let output = invoke_sh("cat", &["--format", "pretty"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("message: ping"));
    assert!(stdout.contains("encoded message: \\x04\\x00\\x00\\x00ping"));
    assert!(stdout.contains("response: ping"));
}

#[test]
fn invoke_self_as_echo_collaborator() {
    let output = stdioframe(&[
        "invoke",
        "héllo wörld",
        "--exe",
        env!("CARGO_BIN_EXE_stdioframe"),
        "--arg",
        "echo",
        "--format",
        "raw",
    ]);

    assert!(output.status.success(), "{output:?}");
    assert_eq!(String::from_utf8_lossy(&output.stdout), "héllo wörld\n");
}

#[test]
fn invoke_nonzero_exit_returns_failure() {
    let output = invoke_sh("echo boom >&2; exit 1", &[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("execution failed"));
    assert!(stderr.contains("boom"));
}

#[test]
fn invoke_malformed_response_returns_60() {
    let output = invoke_sh("cat > /dev/null; printf ab", &[]);

    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("response decoding failed"));
}

#[test]
fn invoke_timeout_returns_124() {
    let started = Instant::now();
    let output = invoke_sh("exec sleep 30", &["--timeout", "200ms"]);

    assert_eq!(output.status.code(), Some(124));
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[test]
fn invoke_with_largest_timeout_succeeds() {
    let timeout = u64::MAX.to_string();
    let output = invoke_sh("cat", &["--timeout", &timeout, "--format", "raw"]);

    assert!(output.status.success(), "{output:?}");
    assert_eq!(String::from_utf8_lossy(&output.stdout), "ping\n");
}

#[test]
fn invoke_missing_working_directory_returns_126() {
    let dir = tempfile::tempdir().expect("temp dir should be creatable");
    let gone = dir.path().join("gone");

    let output = invoke_sh(
        "cat",
        &["--cwd", gone.to_str().expect("temp path should be utf-8")],
    );

    assert_eq!(output.status.code(), Some(126));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("spawning"));
    assert!(stderr.contains("stage: not-started"));
}

#[test]
fn invoke_missing_executable_returns_127() {
    let dir = tempfile::tempdir().expect("temp dir should be creatable");
    let missing = dir.path().join("no-such-host");

    let output = stdioframe(&[
        "invoke",
        "ping",
        "--exe",
        missing.to_str().expect("temp path should be utf-8"),
    ]);

    assert_eq!(output.status.code(), Some(127));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("collaborator not found"));
}

#[test]
fn invoke_reads_executable_from_env() {
    let output = Command::new(env!("CARGO_BIN_EXE_stdioframe"))
        .env("STDIOFRAME_EXE", env!("CARGO_BIN_EXE_stdioframe"))
        .args(["invoke", "from-env", "--arg", "echo", "--format", "raw"])
        .output()
        .expect("stdioframe should run");

    assert!(output.status.success(), "{output:?}");
    assert_eq!(String::from_utf8_lossy(&output.stdout), "from-env\n");
}
