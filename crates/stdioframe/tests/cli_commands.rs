#![cfg(all(unix, feature = "cli"))]

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn run_with_stdin(args: &[&str], input: &[u8]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_stdioframe"))
        .arg("--log-level")
        .arg("error")
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("stdioframe should start");

    let mut stdin = child.stdin.take().expect("stdin should be piped");
    stdin.write_all(input).expect("input should be writable");
    drop(stdin);

    child.wait_with_output().expect("stdioframe should finish")
}

#[test]
fn encode_writes_little_endian_frame() {
    let output = Command::new(env!("CARGO_BIN_EXE_stdioframe"))
        .args(["encode", "ping"])
        .output()
        .expect("encode should run");

    assert!(output.status.success());
    assert_eq!(output.stdout, b"\x04\x00\x00\x00ping");
}

#[test]
fn encode_empty_message_is_four_zero_bytes() {
    let output = Command::new(env!("CARGO_BIN_EXE_stdioframe"))
        .args(["encode", ""])
        .output()
        .expect("encode should run");

    assert!(output.status.success());
    assert_eq!(output.stdout, vec![0, 0, 0, 0]);
}

#[test]
fn decode_reports_trailing_bytes() {
    let output = run_with_stdin(
        &["decode", "--format", "json"],
        b"\x04\x00\x00\x00pingzz",
    );

    assert!(output.status.success(), "{output:?}");
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("decode should emit json");
    assert_eq!(payload.get("message").and_then(|v| v.as_str()), Some("ping"));
    assert_eq!(payload.get("trailing_bytes").and_then(|v| v.as_u64()), Some(2));
}

#[test]
fn decode_truncated_payload_returns_60() {
    let output = run_with_stdin(&["decode"], b"\x0a\x00\x00\x00abc");

    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("truncated frame payload"));
}

#[test]
fn echo_reflects_request_frame() {
    let request = b"\x05\x00\x00\x00hello";
    let output = run_with_stdin(&["echo"], request);

    assert!(output.status.success(), "{output:?}");
    assert_eq!(output.stdout, request);
}

#[test]
fn echo_rejects_truncated_request() {
    let output = run_with_stdin(&["echo"], b"\x05\x00");

    assert_eq!(output.status.code(), Some(60));
    assert!(output.stdout.is_empty());
}

#[test]
fn echo_enforces_max_payload() {
    let output = run_with_stdin(&["echo", "--max-payload", "2"], b"\x05\x00\x00\x00hello");

    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("payload too large"));
}

#[test]
fn version_reports_package_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_stdioframe"))
        .arg("version")
        .output()
        .expect("version should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        format!("stdioframe {}", env!("CARGO_PKG_VERSION"))
    );
}
