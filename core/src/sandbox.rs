//! Sandbox materializer — gives the external tool an on-disk view of "all
//! siblings as last saved, target as currently edited" without mutating the
//! real files.
//!
//! Siblings are hard-linked into an ephemeral directory (byte copy when
//! linking fails); the target file gets the live buffer bytes, the only
//! write of in-progress content to disk. The directory is removed when the
//! handle is closed or dropped, on every exit path of the invocation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use glint_types::LintSettings;

/// Name prefix marking the ephemeral directory as tool-owned. The leading
/// dot keeps it out of the external tool's own package discovery; extension
/// filtering keeps it out of our sibling listing.
pub const SANDBOX_PREFIX: &str = ".glint-";

#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    #[error("target file has no containing directory")]
    UnsavedFile,
    #[error("{found} sibling files exceed the limit of {limit}")]
    TooManyFiles { found: usize, limit: usize },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// RAII handle over a materialized sandbox directory.
///
/// Owned exclusively by one invocation; the unique directory name prevents
/// collision if two invocations somehow overlap.
#[derive(Debug)]
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    /// Mirror `target`'s directory into a fresh sandbox.
    ///
    /// Fails fast — before any filesystem write — when the target has no
    /// containing directory or the sibling count exceeds the configured
    /// limit.
    pub fn materialize(
        target: &Path,
        buffer: &[u8],
        settings: &LintSettings,
    ) -> Result<Self, SandboxError> {
        let parent = parent_dir(target).ok_or(SandboxError::UnsavedFile)?;
        let target_name = target.file_name().ok_or(SandboxError::UnsavedFile)?;

        let siblings = list_siblings(parent, settings.extension())?;
        let limit = settings.max_sibling_files();
        if siblings.len() > limit {
            return Err(SandboxError::TooManyFiles {
                found: siblings.len(),
                limit,
            });
        }

        let dir = tempfile::Builder::new()
            .prefix(SANDBOX_PREFIX)
            .tempdir_in(parent)?;

        for sibling in &siblings {
            let Some(name) = sibling.file_name() else {
                continue;
            };
            if name == target_name {
                continue;
            }
            link_or_copy(sibling, &dir.path().join(name))?;
        }

        // The target may not exist on disk yet (new buffer, saved siblings);
        // the sandbox copy is built from the buffer alone either way.
        fs::write(dir.path().join(target_name), buffer)?;

        Ok(Self { dir })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the sandbox and everything in it.
    ///
    /// Dropping the handle removes it too; `close` exists so the caller can
    /// log a removal failure instead of losing it.
    pub fn close(self) -> io::Result<()> {
        self.dir.close()
    }
}

fn parent_dir(target: &Path) -> Option<&Path> {
    target.parent().filter(|dir| !dir.as_os_str().is_empty())
}

/// Regular files in `dir` carrying `extension`, sorted by name.
fn list_siblings(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut siblings = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some(extension) {
            siblings.push(path);
        }
    }
    siblings.sort();
    Ok(siblings)
}

/// Hard link `src` at `dst`, copying instead when the filesystem refuses
/// (cross-device, no link support).
fn link_or_copy(src: &Path, dst: &Path) -> io::Result<()> {
    if let Err(link_err) = fs::hard_link(src, dst) {
        tracing::debug!(
            src = %src.display(),
            "Hard link failed ({link_err}); copying instead"
        );
        fs::copy(src, dst)?;
    }
    Ok(())
}
