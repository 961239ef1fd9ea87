//! The process-runner capability: spawn the external tool and capture its
//! output to completion.
//!
//! There is no timeout here. The only work-avoidance mechanism is the
//! sibling-count guard applied before the process is spawned; an
//! in-flight invocation is superseded by the caller, not raced by us.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{Context, Result};

/// A fully-specified tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    program: String,
    args: Vec<String>,
    /// Working directory: the target file's real directory, on both the
    /// sandboxed and in-place paths.
    dir: PathBuf,
}

impl ToolInvocation {
    #[must_use]
    pub fn new(program: String, args: Vec<String>, dir: PathBuf) -> Self {
        Self { program, args, dir }
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Captured output of a completed tool process.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `None` when the process was killed by a signal.
    pub status: Option<i32>,
}

impl ToolOutput {
    /// The combined stdout/stderr stream handed to the report decoder. The
    /// tool splits its report and its own logging across both channels
    /// depending on version and flags, so the decoder gets everything.
    #[must_use]
    pub fn combined(&self) -> String {
        if self.stderr.trim().is_empty() {
            self.stdout.clone()
        } else if self.stdout.trim().is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// Capability to run the external tool.
///
/// Injected into the lint session so tests can substitute a stub instead of
/// spawning processes.
pub trait ToolRunner {
    /// Run the tool to completion, capturing stdout and stderr.
    fn run(
        &self,
        invocation: &ToolInvocation,
    ) -> impl std::future::Future<Output = Result<ToolOutput>> + Send;
}

/// Production runner: resolves the binary from `PATH` and blocks on the
/// subprocess until it exits.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput> {
        let resolved = which::which(invocation.program())
            .with_context(|| format!("{} not found in PATH", invocation.program()))?;

        let output = tokio::process::Command::new(&resolved)
            .args(invocation.args())
            .current_dir(invocation.dir())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("spawning {}", invocation.program()))?;

        Ok(ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            status: output.status.code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_prefers_single_channel() {
        let output = ToolOutput {
            stdout: "{\"Issues\":[]}".to_string(),
            stderr: String::new(),
            status: Some(0),
        };
        assert_eq!(output.combined(), "{\"Issues\":[]}");

        let output = ToolOutput {
            stdout: "  \n".to_string(),
            stderr: "level=error msg=\"boom\"".to_string(),
            status: Some(3),
        };
        assert_eq!(output.combined(), "level=error msg=\"boom\"");
    }

    #[test]
    fn test_combined_joins_both_channels() {
        let output = ToolOutput {
            stdout: "{\"Issues\":[]}".to_string(),
            stderr: "level=warning msg=\"slow linter\"".to_string(),
            status: Some(0),
        };
        assert_eq!(
            output.combined(),
            "{\"Issues\":[]}\nlevel=warning msg=\"slow linter\""
        );
    }

    #[tokio::test]
    async fn test_missing_binary_is_error() {
        let invocation = ToolInvocation::new(
            "glint-test-no-such-binary".to_string(),
            vec![],
            std::env::temp_dir(),
        );
        let err = ProcessRunner.run(&invocation).await.unwrap_err();
        assert!(err.to_string().contains("not found in PATH"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_captures_stdout_and_exit_code() {
        let invocation = ToolInvocation::new(
            "sh".to_string(),
            vec!["-c".to_string(), "echo hello; exit 1".to_string()],
            std::env::temp_dir(),
        );
        let output = ProcessRunner.run(&invocation).await.unwrap();
        assert_eq!(output.stdout.trim(), "hello");
        assert_eq!(output.status, Some(1));
    }
}
