//! Core domain types for glint.
//!
//! This crate contains pure domain types with no IO, no async, and minimal
//! dependencies. Everything here can be used from any layer of the adapter.

mod diagnostic;
mod outcome;
mod settings;

pub use diagnostic::{Diagnostic, Severity, TYPECHECK_LINTER};
pub use outcome::{LintOutcome, SkipReason};
pub use settings::{
    LintMode, LintSettings, OutputFormat, OutputSettings, Settings, SettingsError, ToolSettings,
};
