//! Runs external tools (`lvm2`, `tgtadm`, `fdisk`, `dd`, `mount`) and captures
//! their output as text.
//!
//! There is no retry and no interpretation of exit codes beyond "did the
//! process start and exit cleanly". Callers are expected to match specific
//! substrings in the returned text to decide success (lvm2's textual
//! confirmations, tgtadm's silence-on-success convention) — see the crates
//! built on top of this one.

use std::collections::HashMap;

use tokio::process::Command;
use tracing::{debug, warn};

/// Executes argv vectors against the local host.
///
/// `overrides` maps a logical tool name (`"tgtadm"`, `"lvcreate"`, `"fdisk"`,
/// ...) to the binary actually invoked, so a test environment can point
/// these at fakes on `PATH` without touching any call site. An unmapped
/// name is run as-is, resolved by the process's own `PATH`.
#[derive(Debug, Clone, Default)]
pub struct CommandRunner {
    overrides: HashMap<String, String>,
}

impl CommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a runner that resolves `overrides` (tool name -> binary path)
    /// before falling back to the bare name, for testing against fakes on
    /// `PATH` (§10.3).
    pub fn with_overrides(overrides: HashMap<String, String>) -> Self {
        Self { overrides }
    }

    fn resolve<'a>(&'a self, program: &'a str) -> &'a str {
        self.overrides.get(program).map(String::as_str).unwrap_or(program)
    }

    /// Run `program args...` and return stdout decoded as UTF-8.
    ///
    /// Returns `None` if the process fails to start, exits non-zero, or its
    /// output is not valid UTF-8. Stderr is logged at `warn` but not
    /// returned — use [`CommandRunner::run_merged`] for tools (tgtadm) whose
    /// diagnostic text is emitted on stderr but still needs matching.
    pub async fn run(&self, program: &str, args: &[&str]) -> Option<String> {
        let resolved = self.resolve(program);
        debug!(command = program, resolved, args = ?args, "executing command");
        let output = Command::new(resolved).args(args).output().await.ok()?;

        if !output.status.success() {
            warn!(
                command = program,
                args = ?args,
                status = ?output.status.code(),
                stderr = %String::from_utf8_lossy(&output.stderr),
                "command exited non-zero"
            );
            return None;
        }

        match String::from_utf8(output.stdout) {
            Ok(text) => Some(text),
            Err(_) => {
                warn!(command = program, "command stdout was not valid UTF-8");
                None
            }
        }
    }

    /// Run `program args...` and return stdout+stderr merged, regardless of
    /// exit status.
    ///
    /// tgtadm prints "can't find the target" on stderr with a non-zero exit
    /// for a missing target, and prints nothing on stdout for a successful
    /// mutation — both need to reach the caller intact.
    pub async fn run_merged(&self, program: &str, args: &[&str]) -> Option<String> {
        let resolved = self.resolve(program);
        debug!(command = program, resolved, args = ?args, "executing command (merged output)");
        let output = Command::new(resolved).args(args).output().await.ok()?;

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);

        match String::from_utf8(combined) {
            Ok(text) => Some(text),
            Err(_) => {
                warn!(command = program, "command output was not valid UTF-8");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn run_captures_stdout() {
        let runner = CommandRunner::new();
        let out = runner.run("echo", &["hello"]).await.unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[tokio::test]
    async fn run_returns_none_on_nonzero_exit() {
        let runner = CommandRunner::new();
        let out = runner.run("false", &[]).await;
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn run_returns_none_for_missing_binary() {
        let runner = CommandRunner::new();
        let out = runner.run("diskctl-definitely-not-a-real-binary", &[]).await;
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn run_merged_includes_stderr() {
        let runner = CommandRunner::new();
        let out = runner
            .run_merged("sh", &["-c", "echo out; echo err 1>&2"])
            .await
            .unwrap();
        assert!(out.contains("out"));
        assert!(out.contains("err"));
    }

    #[tokio::test]
    async fn an_override_redirects_a_logical_tool_name_to_a_real_binary() {
        let runner = CommandRunner::with_overrides(HashMap::from([("lvcreate".to_string(), "echo".to_string())]));
        let out = runner.run("lvcreate", &["fake"]).await.unwrap();
        assert_eq!(out.trim(), "fake");
    }

    #[tokio::test]
    async fn an_unmapped_tool_name_falls_back_to_running_it_as_is() {
        let runner = CommandRunner::with_overrides(HashMap::from([("lvcreate".to_string(), "echo".to_string())]));
        let out = runner.run("echo", &["bare"]).await.unwrap();
        assert_eq!(out.trim(), "bare");
    }
}
