//! Per-request orchestration: mode selection, sandbox lifetime, tool
//! invocation, report decoding.
//!
//! Every failure is resolved here into a skipped outcome with a logged
//! warning. The caller always receives a [`LintOutcome`], never an error —
//! a broken lint must not destabilize the editor session driving it.

use std::path::{Path, PathBuf};

use glint_types::{LintMode, LintOutcome, Settings, SkipReason};

use crate::command;
use crate::report;
use crate::runner::{ToolInvocation, ToolRunner};
use crate::sandbox::{Sandbox, SandboxError};

/// One lint request: the file being edited and its live buffer content.
///
/// Immutable; discarded after the invocation completes.
#[derive(Debug, Clone)]
pub struct LintRequest {
    target: PathBuf,
    buffer: Vec<u8>,
    mode: LintMode,
}

impl LintRequest {
    #[must_use]
    pub fn new(target: PathBuf, buffer: Vec<u8>, mode: LintMode) -> Self {
        Self {
            target,
            buffer,
            mode,
        }
    }

    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    #[must_use]
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    #[must_use]
    pub fn mode(&self) -> LintMode {
        self.mode
    }
}

/// Run one lint request to completion.
///
/// Strictly sequential: materialize the sandbox (background mode only),
/// block on the external tool, decode, filter. Cancellation and superseding
/// of in-flight requests are the caller's concern.
pub async fn lint<R: ToolRunner>(
    request: &LintRequest,
    settings: &Settings,
    runner: &R,
) -> LintOutcome {
    let Some(target_name) = request.target().file_name().and_then(|n| n.to_str()) else {
        return skip(request, SkipReason::UnsavedFile);
    };
    let Some(dir) = parent_dir(request.target()) else {
        return skip(request, SkipReason::UnsavedFile);
    };

    let sandbox = if request.mode().is_background() {
        match Sandbox::materialize(request.target(), request.buffer(), settings.lint()) {
            Ok(sandbox) => Some(sandbox),
            Err(err) => return skip(request, skip_reason_for(err)),
        }
    } else {
        None
    };

    let args = command::build_args(
        settings.tool(),
        settings.output().format(),
        sandbox.as_ref().map(Sandbox::path),
    );
    let invocation = ToolInvocation::new(
        settings.tool().command().to_string(),
        args,
        dir.to_path_buf(),
    );

    tracing::debug!(
        target = %request.target().display(),
        sandboxed = sandbox.is_some(),
        "Running lint"
    );
    let result = runner.run(&invocation).await;
    close_sandbox(sandbox);

    let output = match result {
        Ok(output) => output,
        Err(err) => return skip(request, SkipReason::ToolFailed(format!("{err:#}"))),
    };

    if let Some(code) = output.status
        && !matches!(code, 0 | 1)
    {
        // 1 just means issues were found; anything else is the tool
        // misbehaving, but it often writes a partial report first.
        tracing::warn!(code, "Tool exited abnormally; parsing output anyway");
    }

    let report = match report::decode(&output.combined(), settings.output().format()) {
        Ok(report) => report,
        Err(err) => return skip(request, SkipReason::UnreadableReport(err.to_string())),
    };

    LintOutcome::Completed(report::normalize(&report, target_name, settings.output()))
}

fn parent_dir(target: &Path) -> Option<&Path> {
    target.parent().filter(|dir| !dir.as_os_str().is_empty())
}

fn skip(request: &LintRequest, reason: SkipReason) -> LintOutcome {
    tracing::warn!(target = %request.target().display(), "Lint skipped: {reason}");
    LintOutcome::Skipped(reason)
}

fn skip_reason_for(err: SandboxError) -> SkipReason {
    match err {
        SandboxError::UnsavedFile => SkipReason::UnsavedFile,
        SandboxError::TooManyFiles { found, limit } => SkipReason::TooManyFiles { found, limit },
        SandboxError::Io(err) => SkipReason::SandboxFailed(err.to_string()),
    }
}

fn close_sandbox(sandbox: Option<Sandbox>) {
    if let Some(sandbox) = sandbox
        && let Err(err) = sandbox.close()
    {
        tracing::warn!("Failed to remove sandbox: {err}");
    }
}
