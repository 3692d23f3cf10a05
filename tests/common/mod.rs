//! Shared integration-test harness for running the `enigma` binary.

#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

/// Helpers for spawning the built `enigma` binary.
pub struct EnigmaProcess;

impl EnigmaProcess {
    fn command(args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_enigma"));
        cmd.args(args)
            .env_remove("ENIGMA_LOG_LEVEL")
            .env_remove("ENIGMA_CONFIG")
            .env("NO_COLOR", "1");
        cmd
    }

    /// Runs `enigma` with `args` and no stdin, returning its output.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_command(args: &[&str]) -> Output {
        Self::command(args)
            .stdin(Stdio::null())
            .output()
            .expect("failed to run enigma")
    }

    /// Runs `enigma` with `args`, feeding `input` on stdin.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_with_stdin(args: &[&str], input: &str) -> Output {
        let mut child = Self::command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to spawn enigma");

        child
            .stdin
            .take()
            .expect("stdin not captured")
            .write_all(input.as_bytes())
            .expect("failed to write stdin");

        child.wait_with_output().expect("failed to wait for enigma")
    }

    /// Returns the path to a test fixture.
    #[must_use]
    pub fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    /// Returns a fixture path as a `String` for use in argument lists.
    #[must_use]
    pub fn fixture(name: &str) -> String {
        Self::fixture_path(name).to_string_lossy().into_owned()
    }
}

/// Asserts the process exited with `code`, showing stderr otherwise.
#[allow(clippy::missing_panics_doc)]
pub fn assert_exit(output: &Output, code: i32) {
    assert_eq!(
        output.status.code(),
        Some(code),
        "unexpected exit status; stderr:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
}
