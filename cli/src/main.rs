//! glint CLI — binary entry point, standing in for the host editor.
//!
//! Runs one lint request against a single file and prints the normalized
//! diagnostics, 1-indexed. The buffer comes from the file on disk or, with
//! `--stdin`, from standard input — the editor's unsaved-buffer case.
//!
//! Exit codes follow the ruff convention: 0 clean, 1 issues found, 2 the
//! lint was skipped or failed. A skipped lint and a clean lint both print
//! no diagnostics; the exit code is what tells them apart.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use glint_core::{LintRequest, ProcessRunner};
use glint_types::{LintMode, LintOutcome, Settings};

const EXIT_CLEAN: u8 = 0;
const EXIT_ISSUES: u8 = 1;
const EXIT_SKIPPED: u8 = 2;

#[derive(Parser)]
#[command(
    name = "glint",
    version,
    about = "Lint a single Go file with golangci-lint, including unsaved buffer content"
)]
struct Cli {
    /// File to lint.
    file: PathBuf,

    /// Read the buffer content from stdin instead of the file on disk.
    #[arg(long)]
    stdin: bool,

    /// Config file (default: $GLINT_CONFIG, then the user config dir, then
    /// ./glint.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured lint mode.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Background,
    OnDemand,
}

impl From<ModeArg> for LintMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Background => LintMode::Background,
            ModeArg::OnDemand => LintMode::OnDemand,
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("error"));

    // Diagnostics go to stdout; everything else stays on stderr.
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn load_settings(override_path: Option<&Path>) -> Result<Settings> {
    match override_path {
        Some(path) => glint_config::load_from(path),
        None => Ok(glint_config::load()?.unwrap_or_default()),
    }
}

fn read_buffer(cli: &Cli) -> Result<Vec<u8>> {
    if cli.stdin {
        let mut buffer = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buffer)
            .context("reading buffer from stdin")?;
        Ok(buffer)
    } else {
        std::fs::read(&cli.file).with_context(|| format!("reading {}", cli.file.display()))
    }
}

fn exit_code(outcome: &LintOutcome) -> u8 {
    match outcome {
        LintOutcome::Completed(diags) if diags.is_empty() => EXIT_CLEAN,
        LintOutcome::Completed(_) => EXIT_ISSUES,
        LintOutcome::Skipped(_) => EXIT_SKIPPED,
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let settings = load_settings(cli.config.as_deref())?;
    let buffer = read_buffer(&cli)?;

    // Resolve to an absolute path so the unsaved-file precondition reflects
    // the real directory rather than how the argument was spelled.
    let target = if cli.file.is_absolute() {
        cli.file.clone()
    } else {
        std::env::current_dir()
            .context("resolving current directory")?
            .join(&cli.file)
    };
    let mode = cli.mode.map_or(settings.lint().mode(), LintMode::from);
    tracing::debug!(target = %target.display(), ?mode, "Linting");

    let request = LintRequest::new(target, buffer, mode);
    let outcome = glint_core::lint(&request, &settings, &ProcessRunner).await;

    match &outcome {
        LintOutcome::Completed(diags) => {
            for diag in diags {
                println!("{}", diag.display_line());
            }
        }
        LintOutcome::Skipped(reason) => {
            eprintln!("glint: lint skipped: {reason}");
        }
    }

    Ok(ExitCode::from(exit_code(&outcome)))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("glint: {err:#}");
            ExitCode::from(EXIT_SKIPPED)
        }
    }
}
