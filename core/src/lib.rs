//! The unsaved-buffer linting protocol.
//!
//! Two components are composed linearly per lint request:
//!
//! - the **sandbox materializer** ([`sandbox`]) mirrors the target's
//!   directory into an ephemeral sibling directory with the live buffer
//!   substituted for the target file, so cross-file analysis sees the
//!   unsaved edits;
//! - the **report normalizer** ([`report`]) decodes the tool's combined
//!   stdout/stderr output, reconciles its free-text error channel, repairs
//!   the canonical-import false positive, and filters down to the target
//!   file.
//!
//! [`lint`] ties them together for one request. All failures are resolved
//! at that boundary into a skipped outcome; nothing propagates as an error
//! to the caller.

pub mod command;
pub mod report;
pub mod runner;
pub mod sandbox;

mod session;

pub use runner::{ProcessRunner, ToolInvocation, ToolOutput, ToolRunner};
pub use session::{LintRequest, lint};
