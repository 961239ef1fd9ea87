//! Assembles the argv for one `golangci-lint run` invocation.
//!
//! The tool renamed its flags across major versions; the same four semantic
//! options (fast rule subset, output format, output destination, stats
//! suppression) map to either dialect depending on configuration.

use std::path::Path;

use glint_types::{OutputFormat, ToolSettings};

/// Build the arguments for `<command> run [flags] [path]`.
///
/// `sandbox` is the ephemeral directory to lint instead of the working
/// directory; when `None` the path argument is omitted and the tool lints
/// the directory it runs in.
#[must_use]
pub fn build_args(
    tool: &ToolSettings,
    format: OutputFormat,
    sandbox: Option<&Path>,
) -> Vec<String> {
    let mut args = vec!["run".to_string()];

    if tool.legacy_flags() {
        if tool.fast() {
            args.push("--fast".to_string());
        }
        args.push("--out-format".to_string());
        args.push(
            match format {
                OutputFormat::Json => "json",
                OutputFormat::Text => "tab",
            }
            .to_string(),
        );
        args.push("--print-issued-lines=false".to_string());
    } else {
        if tool.fast() {
            args.push("--fast-only".to_string());
        }
        args.push(
            match format {
                OutputFormat::Json => "--output.json.path",
                OutputFormat::Text => "--output.tab.path",
            }
            .to_string(),
        );
        args.push("stdout".to_string());
        args.push("--show-stats=false".to_string());
    }

    args.extend(tool.args().iter().cloned());

    if let Some(path) = sandbox {
        args.push(path.display().to_string());
    }

    args
}
