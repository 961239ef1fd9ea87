//! Resolved configuration types shared across crates.
//!
//! These types represent fully-validated, resolved configuration state.
//! Raw deserialization structs (with `Option` fields) stay private in this
//! module; validation happens at the deserialization boundary via
//! `#[serde(try_from)]`, so a constructed value is proof of its validity.

use serde::Deserialize;

#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("tool command must not be empty")]
    EmptyCommand,
    #[error("unknown lint mode '{0}' (expected \"background\" or \"on-demand\")")]
    UnknownMode(String),
    #[error("unknown output format '{0}' (expected \"json\", \"tab\" or \"text\")")]
    UnknownFormat(String),
    #[error("source file extension must not be empty")]
    EmptyExtension,
}

/// When the editor triggers a lint.
///
/// `Background` means lint-on-idle while the buffer may be unsaved, which is
/// what requires the sandbox. `OnDemand` means the user explicitly asked (or
/// the file is known saved) and the tool can run against the real directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LintMode {
    #[default]
    Background,
    OnDemand,
}

impl LintMode {
    fn parse(raw: &str) -> Result<Self, SettingsError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "background" => Ok(Self::Background),
            "on-demand" | "on_demand" | "save" => Ok(Self::OnDemand),
            other => Err(SettingsError::UnknownMode(other.to_string())),
        }
    }

    #[must_use]
    pub fn is_background(self) -> bool {
        self == Self::Background
    }
}

/// Which report representation the external tool is asked for.
///
/// The tool's interface changed across its own versions; both the structured
/// JSON report and the line-oriented tab/text report must be supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

impl OutputFormat {
    fn parse(raw: &str) -> Result<Self, SettingsError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "tab" | "text" => Ok(Self::Text),
            other => Err(SettingsError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Deserialize)]
struct RawToolSettings {
    command: Option<String>,
    args: Option<String>,
    fast: Option<bool>,
    legacy_flags: Option<bool>,
}

/// Validated external-tool invocation settings.
///
/// Invariant: `command` is non-empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawToolSettings")]
pub struct ToolSettings {
    command: String,
    args: Vec<String>,
    fast: bool,
    legacy_flags: bool,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            command: "golangci-lint".to_string(),
            args: Vec::new(),
            fast: true,
            legacy_flags: false,
        }
    }
}

impl TryFrom<RawToolSettings> for ToolSettings {
    type Error = SettingsError;

    fn try_from(raw: RawToolSettings) -> Result<Self, Self::Error> {
        let defaults = Self::default();
        let command = match raw.command {
            Some(command) => {
                if command.trim().is_empty() {
                    return Err(SettingsError::EmptyCommand);
                }
                command
            }
            None => defaults.command,
        };
        // Whitespace split only; quoted arguments with embedded spaces are
        // not supported.
        let args = raw
            .args
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        Ok(Self {
            command,
            args,
            fast: raw.fast.unwrap_or(defaults.fast),
            legacy_flags: raw.legacy_flags.unwrap_or(defaults.legacy_flags),
        })
    }
}

impl ToolSettings {
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Extra user-supplied arguments, appended verbatim.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Restrict the tool to its fast rule subset.
    #[must_use]
    pub fn fast(&self) -> bool {
        self.fast
    }

    /// Use the older flag dialect of the tool.
    #[must_use]
    pub fn legacy_flags(&self) -> bool {
        self.legacy_flags
    }
}

#[derive(Deserialize)]
struct RawLintSettings {
    mode: Option<String>,
    delay_ms: Option<u32>,
    extension: Option<String>,
}

/// Validated lint-trigger settings.
///
/// Invariant: `extension` is non-empty and carries no leading dot.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawLintSettings")]
pub struct LintSettings {
    mode: LintMode,
    delay_ms: u32,
    extension: String,
}

impl Default for LintSettings {
    fn default() -> Self {
        Self {
            mode: LintMode::Background,
            delay_ms: 250,
            extension: "go".to_string(),
        }
    }
}

impl TryFrom<RawLintSettings> for LintSettings {
    type Error = SettingsError;

    fn try_from(raw: RawLintSettings) -> Result<Self, Self::Error> {
        let defaults = Self::default();
        let mode = match raw.mode {
            Some(mode) => LintMode::parse(&mode)?,
            None => defaults.mode,
        };
        let extension = match raw.extension {
            Some(extension) => {
                let trimmed = extension.trim().trim_start_matches('.');
                if trimmed.is_empty() {
                    return Err(SettingsError::EmptyExtension);
                }
                trimmed.to_string()
            }
            None => defaults.extension,
        };
        Ok(Self {
            mode,
            delay_ms: raw.delay_ms.unwrap_or(defaults.delay_ms),
            extension,
        })
    }
}

impl LintSettings {
    #[must_use]
    pub fn mode(&self) -> LintMode {
        self.mode
    }

    /// Background-poll delay in milliseconds.
    #[must_use]
    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    /// Source file extension this adapter applies to, without a dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Sibling-count guard for background linting. Derived from the poll
    /// delay: a directory that takes longer to mirror than the poll interval
    /// would make every keystroke pay that cost.
    #[must_use]
    pub fn max_sibling_files(&self) -> usize {
        self.delay_ms as usize
    }
}

#[derive(Deserialize)]
struct RawOutputSettings {
    format: Option<String>,
    line_base: Option<u32>,
    column_base: Option<u32>,
}

/// Validated report-output settings, including the coordinate base the tool
/// reports positions in (1-based line and column by default).
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawOutputSettings")]
pub struct OutputSettings {
    format: OutputFormat,
    line_base: u32,
    column_base: u32,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            line_base: 1,
            column_base: 1,
        }
    }
}

impl TryFrom<RawOutputSettings> for OutputSettings {
    type Error = SettingsError;

    fn try_from(raw: RawOutputSettings) -> Result<Self, Self::Error> {
        let defaults = Self::default();
        let format = match raw.format {
            Some(format) => OutputFormat::parse(&format)?,
            None => defaults.format,
        };
        Ok(Self {
            format,
            line_base: raw.line_base.unwrap_or(defaults.line_base),
            column_base: raw.column_base.unwrap_or(defaults.column_base),
        })
    }
}

impl OutputSettings {
    #[must_use]
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Rebase a tool-reported line to the 0-indexed internal convention.
    #[must_use]
    pub fn rebase_line(&self, line: u32) -> u32 {
        line.saturating_sub(self.line_base)
    }

    /// Rebase a tool-reported column to the 0-indexed internal convention.
    #[must_use]
    pub fn rebase_column(&self, col: u32) -> u32 {
        col.saturating_sub(self.column_base)
    }
}

/// Full resolved configuration for the adapter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    tool: ToolSettings,
    #[serde(default)]
    lint: LintSettings,
    #[serde(default)]
    output: OutputSettings,
}

impl Settings {
    #[must_use]
    pub fn tool(&self) -> &ToolSettings {
        &self.tool
    }

    #[must_use]
    pub fn lint(&self) -> &LintSettings {
        &self.lint
    }

    #[must_use]
    pub fn output(&self) -> &OutputSettings {
        &self.output
    }
}
