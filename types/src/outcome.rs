//! Caller-visible result of one lint invocation.
//!
//! "Passing lint with zero issues" and "lint did not run" both carry no
//! diagnostics; a caller that cannot tell them apart cannot tell a clean
//! file from a broken toolchain. [`LintOutcome`] keeps the two distinct.

use crate::diagnostic::Diagnostic;

/// Why a lint invocation was skipped instead of completing.
///
/// From the caller's perspective a skipped lint and a failed lint are the
/// same thing — no results — distinguished only by this message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("target file has no directory on disk (unsaved buffer without a path)")]
    UnsavedFile,
    #[error("too many sibling files ({found}, limit {limit}); skipping background lint")]
    TooManyFiles { found: usize, limit: usize },
    #[error("could not materialize sandbox: {0}")]
    SandboxFailed(String),
    #[error("could not run external tool: {0}")]
    ToolFailed(String),
    #[error("could not decode tool output: {0}")]
    UnreadableReport(String),
}

/// Result of one lint invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintOutcome {
    /// The tool ran and its report was decoded. The vector may be empty —
    /// that is a passing lint.
    Completed(Vec<Diagnostic>),
    /// The lint did not produce a usable report.
    Skipped(SkipReason),
}

impl LintOutcome {
    /// Diagnostics if the lint completed, `None` if it was skipped.
    #[must_use]
    pub fn diagnostics(&self) -> Option<&[Diagnostic]> {
        match self {
            Self::Completed(diags) => Some(diags),
            Self::Skipped(_) => None,
        }
    }

    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Severity;

    #[test]
    fn test_completed_empty_is_not_skipped() {
        let outcome = LintOutcome::Completed(vec![]);
        assert!(!outcome.is_skipped());
        assert_eq!(outcome.diagnostics(), Some(&[][..]));
    }

    #[test]
    fn test_skipped_has_no_diagnostics() {
        let outcome = LintOutcome::Skipped(SkipReason::UnsavedFile);
        assert!(outcome.is_skipped());
        assert!(outcome.diagnostics().is_none());
    }

    #[test]
    fn test_skip_reason_messages() {
        let reason = SkipReason::TooManyFiles {
            found: 150,
            limit: 100,
        };
        assert_eq!(
            reason.to_string(),
            "too many sibling files (150, limit 100); skipping background lint"
        );
        assert!(
            SkipReason::UnsavedFile
                .to_string()
                .contains("no directory on disk")
        );
    }

    #[test]
    fn test_completed_keeps_order() {
        let a = Diagnostic::new(
            "a.go".into(),
            4,
            0,
            Severity::Warning,
            "w1".into(),
            "govet".into(),
        );
        let b = Diagnostic::new(
            "a.go".into(),
            1,
            0,
            Severity::Error,
            "e1".into(),
            "typecheck".into(),
        );
        let outcome = LintOutcome::Completed(vec![a.clone(), b.clone()]);
        assert_eq!(outcome.diagnostics(), Some(&[a, b][..]));
    }
}
