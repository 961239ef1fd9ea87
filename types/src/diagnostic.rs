//! The normalized per-file issue record emitted by one lint invocation.
//!
//! Raw tool output is heterogeneous (structured issues, free-text compile
//! errors, version-dependent formats); everything converges on [`Diagnostic`]
//! before it leaves the adapter.

/// Origin identifier the external tool uses for issues that mean the code
/// does not compile. Everything reported under it escalates to
/// [`Severity::Error`]; ordinary lint findings stay warnings.
pub const TYPECHECK_LINTER: &str = "typecheck";

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    /// Classify by the reporting linter: the `typecheck` sentinel marks
    /// compile errors, every other linter is a style/lint warning.
    #[must_use]
    pub fn from_linter(linter: &str) -> Self {
        if linter == TYPECHECK_LINTER {
            Self::Error
        } else {
            Self::Warning
        }
    }

    #[must_use]
    pub fn is_error(self) -> bool {
        self == Self::Error
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// A single normalized issue belonging to the linted file.
///
/// Fields are private; construction goes through [`Diagnostic::new`] and
/// consumers read via accessors. Coordinates are 0-indexed internally and
/// rendered 1-indexed for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Basename of the file the issue belongs to. Invariant: equal to the
    /// basename of the lint request's target.
    file: String,
    /// 0-indexed line number.
    line: u32,
    /// 0-indexed column.
    col: u32,
    severity: Severity,
    message: String,
    /// Linter that produced the issue (e.g. "govet", "typecheck").
    linter: String,
}

impl Diagnostic {
    #[must_use]
    pub fn new(
        file: String,
        line: u32,
        col: u32,
        severity: Severity,
        message: String,
        linter: String,
    ) -> Self {
        Self {
            file,
            line,
            col,
            severity,
            message,
            linter,
        }
    }

    /// Basename of the file the issue belongs to.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// 0-indexed line number.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// 0-indexed column.
    #[must_use]
    pub fn col(&self) -> u32 {
        self.col
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Linter that produced the issue.
    #[must_use]
    pub fn linter(&self) -> &str {
        &self.linter
    }

    /// Format as `file:line:col: severity: [linter] message` (1-indexed).
    #[must_use]
    pub fn display_line(&self) -> String {
        format!(
            "{}:{}:{}: {}: [{}] {}",
            self.file,
            self.line + 1,
            self.col + 1,
            self.severity.label(),
            self.linter,
            self.message,
        )
    }
}
