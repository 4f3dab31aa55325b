//! End-to-end checks of the demo binary's exit behaviour.

use anyhow::{Result, ensure};
use assert_cmd::Command;
use rstest::rstest;

fn run(args: &[&str]) -> Result<(Option<i32>, String, String)> {
    let output = Command::cargo_bin("hello_flags")?
        .env_remove("HELLO_GREETING")
        .env_remove("HELLO_USER")
        .args(args)
        .output()?;
    Ok((
        output.status.code(),
        String::from_utf8(output.stdout)?,
        String::from_utf8(output.stderr)?,
    ))
}

#[test]
fn greets_each_recipient_and_listener() -> Result<()> {
    let (code, stdout, _) = run(&[
        "-r",
        "Ada,Grace",
        "--shout",
        "--listener.web.port=8443",
        "--listener.web.tls",
    ])?;
    ensure!(code == Some(0), "unexpected exit code {code:?}");
    ensure!(stdout.contains("HELLO, ADA!"), "stdout: {stdout}");
    ensure!(stdout.contains("HELLO, GRACE!"), "stdout: {stdout}");
    ensure!(
        stdout.contains("listener web: https://127.0.0.1:8443 (idle timeout 30s)"),
        "stdout: {stdout}"
    );
    Ok(())
}

#[test]
fn json_lines_escape_user_text() -> Result<()> {
    let (code, stdout, stderr) = run(&["--json", "-g", "Say \"hi\"", "-r", "a\\b"])?;
    ensure!(code == Some(0), "unexpected exit code {code:?}: {stderr}");
    let line = stdout.lines().next().unwrap_or_default();
    let parsed: serde_json::Value = serde_json::from_str(line)?;
    ensure!(
        parsed == serde_json::json!({ "greeting": "Say \"hi\", a\\b!" }),
        "stdout: {stdout}"
    );
    Ok(())
}

#[rstest]
#[case(&["--bogus"], "Error: unknown flag: --bogus")]
#[case(&["--json", "--plain"], "Error: only one of [json, plain] may be set")]
#[case(&["--user", "ada"], "Error: flags [user] must be set together; missing [password]")]
#[case(&["--listener.web.tls"], "Error: missing required flag: --listener.web.port")]
#[case(&["-vvvv"], "Error: too many occurrences of flag -v: value 4 exceeds maximum of 3")]
fn usage_errors_exit_with_status_two(#[case] args: &[&str], #[case] message: &str) -> Result<()> {
    let (code, _, stderr) = run(args)?;
    ensure!(code == Some(2), "unexpected exit code {code:?}");
    ensure!(stderr.contains(message), "stderr: {stderr}");
    Ok(())
}

#[rstest]
#[case(&["--help"], "Usage: hello-flags [flags] [args...]")]
#[case(&["-h"], "--listener.<id>.port int")]
#[case(&["--version"], concat!("hello-flags ", env!("CARGO_PKG_VERSION")))]
fn display_requests_exit_cleanly(#[case] args: &[&str], #[case] expected: &str) -> Result<()> {
    let (code, _, stderr) = run(args)?;
    ensure!(code == Some(0), "unexpected exit code {code:?}");
    ensure!(stderr.contains(expected), "stderr: {stderr}");
    Ok(())
}
