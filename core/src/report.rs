//! Report normalizer — decodes the external tool's combined stdout/stderr
//! output into per-file diagnostics.
//!
//! One normalizer, parameterized by [`OutputFormat`]: the tool's interface
//! changed across its own versions, so both the structured JSON report and
//! the line-oriented tab/text report are supported. Two known defects of
//! the tool are repaired here: compile-level failures that ride a free-text
//! side channel instead of the issue list, and the canonical-import false
//! positive triggered by linting a package from a mirrored directory.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use glint_types::{Diagnostic, OutputFormat, OutputSettings, Severity, TYPECHECK_LINTER};

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("tool produced no output")]
    Empty,
    #[error("no JSON object found in tool output")]
    MissingJson,
    #[error("malformed JSON report: {0}")]
    Json(#[from] serde_json::Error),
}

/// One issue as reported by the tool: tool-native coordinates, unfiltered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawIssue {
    pub linter: String,
    pub message: String,
    pub path: String,
    pub line: u32,
    pub column: u32,
}

/// Parsed tool output: ordered issues plus the optional free-text error
/// channel carrying compile-level failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawReport {
    pub issues: Vec<RawIssue>,
    pub error_channel: Option<String>,
}

// Wire shape of the tool's JSON report.

#[derive(Deserialize)]
struct JsonReport {
    #[serde(rename = "Issues", default)]
    issues: Option<Vec<JsonIssue>>,
    #[serde(rename = "Report", default)]
    report: Option<JsonMeta>,
}

#[derive(Deserialize)]
struct JsonIssue {
    #[serde(rename = "FromLinter", default)]
    from_linter: String,
    #[serde(rename = "Text", default)]
    text: String,
    #[serde(rename = "Pos", default)]
    pos: JsonPos,
}

#[derive(Deserialize, Default)]
struct JsonPos {
    #[serde(rename = "Filename", default)]
    filename: String,
    #[serde(rename = "Line", default)]
    line: u32,
    #[serde(rename = "Column", default)]
    column: u32,
}

#[derive(Deserialize)]
struct JsonMeta {
    #[serde(rename = "Error", default)]
    error: Option<String>,
}

/// Decode the raw combined output into a [`RawReport`].
pub fn decode(raw: &str, format: OutputFormat) -> Result<RawReport, DecodeError> {
    match format {
        OutputFormat::Json => decode_json(raw),
        OutputFormat::Text => decode_text(raw),
    }
}

/// The tool intermixes its own log lines with the report on the combined
/// stream, so the report is the outermost-braces slice rather than the
/// whole string.
fn decode_json(raw: &str) -> Result<RawReport, DecodeError> {
    let start = raw.find('{').ok_or(DecodeError::MissingJson)?;
    let end = raw.rfind('}').ok_or(DecodeError::MissingJson)?;
    if end < start {
        return Err(DecodeError::MissingJson);
    }
    let parsed: JsonReport = serde_json::from_str(&raw[start..=end])?;

    let issues = parsed
        .issues
        .unwrap_or_default()
        .into_iter()
        .map(|issue| RawIssue {
            linter: issue.from_linter,
            message: issue.text,
            path: issue.pos.filename,
            line: issue.pos.line,
            column: issue.pos.column,
        })
        .collect();
    let error_channel = parsed
        .report
        .and_then(|meta| meta.error)
        .filter(|error| !error.trim().is_empty());

    Ok(RawReport {
        issues,
        error_channel,
    })
}

/// `filename:line[:col]: message (linter)` — the line-oriented report.
/// Non-matching lines are tool chatter and skipped.
static TEXT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<file>[^\s:]+):(?P<line>\d+)(?::(?P<col>\d+))?:?\s+(?P<msg>.*\S)\s+\((?P<linter>[\w-]+)\)\s*$")
        .expect("hardcoded regex compiles")
});

fn decode_text(raw: &str) -> Result<RawReport, DecodeError> {
    if raw.trim().is_empty() {
        return Err(DecodeError::Empty);
    }
    let issues = raw.lines().filter_map(parse_text_line).collect();
    Ok(RawReport {
        issues,
        error_channel: None,
    })
}

fn parse_text_line(line: &str) -> Option<RawIssue> {
    let caps = TEXT_LINE.captures(line)?;
    Some(RawIssue {
        linter: caps["linter"].to_string(),
        message: caps["msg"].to_string(),
        path: caps["file"].to_string(),
        line: caps["line"].parse().ok()?,
        column: caps
            .name("col")
            .map_or(Some(0), |col| col.as_str().parse().ok())?,
    })
}

/// Normalize a decoded report down to the diagnostics belonging to
/// `target_name` (the basename of the file being linted).
///
/// `target_name` is threaded as a parameter on purpose: the normalizer
/// holds no state across calls, so concurrent invocations cannot
/// cross-talk. The canonical-import suppression flag below is a local of
/// this one call.
#[must_use]
pub fn normalize(
    report: &RawReport,
    target_name: &str,
    output: &OutputSettings,
) -> Vec<Diagnostic> {
    let mut issues: Vec<Cow<'_, RawIssue>> =
        report.issues.iter().map(Cow::Borrowed).collect();
    if let Some(channel) = &report.error_channel {
        issues.extend(parse_error_channel(channel).into_iter().map(Cow::Owned));
    }

    let mut diagnostics = Vec::new();
    let mut suppress_cascade = false;
    for issue in issues {
        if suppress_cascade && is_missing_package_cascade(&issue.message) {
            tracing::debug!(
                message = %issue.message,
                "Suppressing downstream canonical-import false positive"
            );
            continue;
        }
        let issue = if !suppress_cascade && is_canonical_import_mismatch(&issue.message) {
            suppress_cascade = true;
            Cow::Owned(canonical_import_issue(target_name))
        } else {
            issue
        };
        if short_filename(&issue.path) != target_name {
            continue;
        }
        diagnostics.push(Diagnostic::new(
            target_name.to_string(),
            output.rebase_line(issue.line),
            output.rebase_column(issue.column),
            Severity::from_linter(&issue.linter),
            issue.message.clone(),
            issue.linter.clone(),
        ));
    }
    diagnostics
}

/// Each channel line with at least `path:line:col:message` becomes a
/// compile error attributed to the typecheck sentinel. Lines with fewer
/// fields are expected noise.
fn parse_error_channel(channel: &str) -> Vec<RawIssue> {
    channel.lines().filter_map(parse_error_line).collect()
}

fn parse_error_line(line: &str) -> Option<RawIssue> {
    let mut parts = line.splitn(4, ':');
    let path = parts.next()?.trim();
    let line_no = parts.next()?.trim().parse().ok()?;
    let column = parts.next()?.trim().parse().ok()?;
    let message = parts.next()?.trim();
    if path.is_empty() || message.is_empty() {
        return None;
    }
    Some(RawIssue {
        linter: TYPECHECK_LINTER.to_string(),
        message: message.to_string(),
        path: path.to_string(),
        line: line_no,
        column,
    })
}

/// The tool resolves package paths against the directory it was pointed at,
/// so a package carrying a canonical import annotation misreports a
/// mismatch when analyzed from a mirrored directory. Detected by message
/// wording; if the tool ever rewords it, this repair silently stops firing.
fn is_canonical_import_mismatch(message: &str) -> bool {
    message.contains("code in directory") && message.contains("expects import")
}

fn is_missing_package_cascade(message: &str) -> bool {
    message.contains("could not import") && message.contains("missing package:")
}

/// The single explanatory issue surfaced instead of the mismatch cascade,
/// pinned to the start of the target file.
fn canonical_import_issue(target_name: &str) -> RawIssue {
    RawIssue {
        linter: TYPECHECK_LINTER.to_string(),
        message: "package declares a canonical import path and cannot be checked from a \
                  mirrored directory; compile-level analysis was skipped"
            .to_string(),
        path: target_name.to_string(),
        line: 1,
        column: 0,
    }
}

/// Final path segment, tolerant of either separator — the join key between
/// a reported issue and the file open for editing.
fn short_filename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(path: &str, linter: &str, message: &str, line: u32, column: u32) -> RawIssue {
        RawIssue {
            linter: linter.to_string(),
            message: message.to_string(),
            path: path.to_string(),
            line,
            column,
        }
    }

    fn default_output() -> OutputSettings {
        OutputSettings::default()
    }

    // ── decoding: JSON ─────────────────────────────────────────────────

    #[test]
    fn test_decode_json_report() {
        let raw = r#"{"Issues":[{"FromLinter":"govet","Text":"shadowed variable","Pos":{"Filename":"main.go","Line":12,"Column":5}}],"Report":{}}"#;
        let report = decode(raw, OutputFormat::Json).unwrap();
        assert_eq!(
            report.issues,
            vec![issue("main.go", "govet", "shadowed variable", 12, 5)]
        );
        assert!(report.error_channel.is_none());
    }

    #[test]
    fn test_decode_json_null_issues() {
        let raw = r#"{"Issues":null,"Report":{"Error":""}}"#;
        let report = decode(raw, OutputFormat::Json).unwrap();
        assert!(report.issues.is_empty());
        assert!(report.error_channel.is_none());
    }

    #[test]
    fn test_decode_json_skips_surrounding_log_noise() {
        let raw = "level=warning msg=\"some linter was disabled\"\n{\"Issues\":[]}\ntrailing chatter";
        let report = decode(raw, OutputFormat::Json).unwrap();
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_decode_json_carries_error_channel() {
        let raw = r#"{"Issues":[],"Report":{"Error":"typechecking error: foo.go:10:3: undefined: Bar"}}"#;
        let report = decode(raw, OutputFormat::Json).unwrap();
        assert_eq!(
            report.error_channel.as_deref(),
            Some("typechecking error: foo.go:10:3: undefined: Bar")
        );
    }

    #[test]
    fn test_decode_json_without_object_fails() {
        let err = decode("golangci-lint: command crashed", OutputFormat::Json).unwrap_err();
        assert!(matches!(err, DecodeError::MissingJson));
    }

    #[test]
    fn test_decode_json_malformed_object_fails() {
        let err = decode("{\"Issues\": [", OutputFormat::Json).unwrap_err();
        assert!(matches!(err, DecodeError::MissingJson | DecodeError::Json(_)));
    }

    // ── decoding: text ─────────────────────────────────────────────────

    #[test]
    fn test_decode_text_lines() {
        let raw = "main.go:10:2: shadowed variable (govet)\n\
                   main.go:3: missing return (typecheck)\n\
                   level=info msg=\"done\"\n";
        let report = decode(raw, OutputFormat::Text).unwrap();
        assert_eq!(
            report.issues,
            vec![
                issue("main.go", "govet", "shadowed variable", 10, 2),
                issue("main.go", "typecheck", "missing return", 3, 0),
            ]
        );
    }

    #[test]
    fn test_decode_text_empty_output_fails() {
        let err = decode("  \n ", OutputFormat::Text).unwrap_err();
        assert!(matches!(err, DecodeError::Empty));
    }

    #[test]
    fn test_decode_text_chatter_only_is_zero_issues() {
        let report = decode("Congrats! No issues were found.\n", OutputFormat::Text).unwrap();
        assert!(report.issues.is_empty());
    }

    // ── secondary channel ──────────────────────────────────────────────

    #[test]
    fn test_error_channel_line_synthesizes_typecheck_issue() {
        let parsed = parse_error_line("foo.go:10:3: undefined: Bar").unwrap();
        assert_eq!(parsed, issue("foo.go", "typecheck", "undefined: Bar", 10, 3));
    }

    #[test]
    fn test_error_channel_malformed_line_is_skipped() {
        assert!(parse_error_line("malformed").is_none());
        assert!(parse_error_line("foo.go:10").is_none());
        assert!(parse_error_line("foo.go:x:3: message").is_none());
        assert!(parse_error_line("foo.go:10:3:").is_none());
    }

    #[test]
    fn test_error_channel_multiline() {
        let report = RawReport {
            issues: vec![],
            error_channel: Some(
                "foo.go:10:3: undefined: Bar\nnoise without fields\nfoo.go:12:1: undefined: Baz"
                    .to_string(),
            ),
        };
        let diags = normalize(&report, "foo.go", &default_output());
        assert_eq!(diags.len(), 2);
        assert!(diags.iter().all(|d| d.severity() == Severity::Error));
        assert_eq!(diags[0].line(), 9);
        assert_eq!(diags[0].col(), 2);
        assert_eq!(diags[0].message(), "undefined: Bar");
    }

    // ── canonical-import repair ────────────────────────────────────────

    const MISMATCH: &str = "code in directory /tmp/x/pkg/foo matches code in directory: \
                            code in directory /tmp/x/pkg/foo expects import /x/y/foo";

    #[test]
    fn test_canonical_import_mismatch_is_replaced() {
        let report = RawReport {
            issues: vec![issue("other.go", "typecheck", MISMATCH, 4, 7)],
            error_channel: None,
        };
        let diags = normalize(&report, "main.go", &default_output());
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity(), Severity::Error);
        assert_eq!(diags[0].linter(), "typecheck");
        assert_eq!(diags[0].file(), "main.go");
        // pinned to the start of the target file, rebased
        assert_eq!(diags[0].line(), 0);
        assert_eq!(diags[0].col(), 0);
        assert!(diags[0].message().contains("canonical import path"));
    }

    #[test]
    fn test_canonical_import_suppresses_missing_package_cascade() {
        let report = RawReport {
            issues: vec![
                issue("main.go", "typecheck", MISMATCH, 1, 1),
                issue(
                    "main.go",
                    "typecheck",
                    "could not import example.com/x/y (missing package: example.com/x/y)",
                    3,
                    8,
                ),
                issue("main.go", "govet", "shadowed variable", 20, 2),
            ],
            error_channel: None,
        };
        let diags = normalize(&report, "main.go", &default_output());
        assert_eq!(diags.len(), 2);
        assert!(diags[0].message().contains("canonical import path"));
        assert_eq!(diags[1].message(), "shadowed variable");
    }

    #[test]
    fn test_missing_package_not_suppressed_without_trigger() {
        let report = RawReport {
            issues: vec![issue(
                "main.go",
                "typecheck",
                "could not import example.com/x/y (missing package: example.com/x/y)",
                3,
                8,
            )],
            error_channel: None,
        };
        let diags = normalize(&report, "main.go", &default_output());
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_suppression_resets_between_calls() {
        let trigger = RawReport {
            issues: vec![issue("main.go", "typecheck", MISMATCH, 1, 1)],
            error_channel: None,
        };
        let cascade_only = RawReport {
            issues: vec![issue(
                "main.go",
                "typecheck",
                "could not import a (missing package: a)",
                2,
                1,
            )],
            error_channel: None,
        };
        normalize(&trigger, "main.go", &default_output());
        // A fresh report must not inherit the suppression flag.
        let diags = normalize(&cascade_only, "main.go", &default_output());
        assert_eq!(diags.len(), 1);
    }

    // ── filtering and mapping ──────────────────────────────────────────

    #[test]
    fn test_filters_to_target_basename() {
        let report = RawReport {
            issues: vec![
                issue("pkg/main.go", "govet", "keep absolute", 1, 1),
                issue("main.go", "govet", "keep relative", 2, 1),
                issue("sibling.go", "govet", "drop sibling", 3, 1),
                issue("pkg\\main.go", "govet", "keep windows", 4, 1),
            ],
            error_channel: None,
        };
        let diags = normalize(&report, "main.go", &default_output());
        let messages: Vec<&str> = diags.iter().map(Diagnostic::message).collect();
        assert_eq!(messages, ["keep absolute", "keep relative", "keep windows"]);
        assert!(diags.iter().all(|d| d.file() == "main.go"));
    }

    #[test]
    fn test_severity_mapping() {
        let report = RawReport {
            issues: vec![
                issue("main.go", "typecheck", "undefined: Bar", 1, 1),
                issue("main.go", "errcheck", "unchecked error", 2, 1),
            ],
            error_channel: None,
        };
        let diags = normalize(&report, "main.go", &default_output());
        assert_eq!(diags[0].severity(), Severity::Error);
        assert_eq!(diags[1].severity(), Severity::Warning);
    }

    #[test]
    fn test_coordinate_rebase() {
        let report = RawReport {
            issues: vec![issue("main.go", "govet", "msg", 5, 2)],
            error_channel: None,
        };
        let diags = normalize(&report, "main.go", &default_output());
        assert_eq!(diags[0].line(), 4);
        assert_eq!(diags[0].col(), 1);
    }

    #[test]
    fn test_output_preserves_report_order() {
        let report = RawReport {
            issues: vec![
                issue("main.go", "govet", "later line first", 30, 1),
                issue("main.go", "govet", "earlier line second", 2, 1),
            ],
            error_channel: None,
        };
        let diags = normalize(&report, "main.go", &default_output());
        assert_eq!(diags[0].message(), "later line first");
        assert_eq!(diags[1].message(), "earlier line second");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let report = RawReport {
            issues: vec![
                issue("main.go", "typecheck", MISMATCH, 1, 1),
                issue("main.go", "govet", "shadowed variable", 20, 2),
            ],
            error_channel: Some("main.go:4:1: undefined: Bar".to_string()),
        };
        let first = normalize(&report, "main.go", &default_output());
        let second = normalize(&report, "main.go", &default_output());
        assert_eq!(first, second);
    }

    #[test]
    fn test_short_filename() {
        assert_eq!(short_filename("a/b/c.go"), "c.go");
        assert_eq!(short_filename("c.go"), "c.go");
        assert_eq!(short_filename(r"a\b\c.go"), "c.go");
        assert_eq!(short_filename(""), "");
    }
}
