//! Configuration discovery and loading.
//!
//! Raw TOML goes through the validated deserialization boundary in
//! `glint-types`; this crate only finds the file and reads it. A missing
//! config is not an error — the adapter runs fine on defaults — but a
//! malformed one is, so a typo never silently reverts the user to defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use glint_types::Settings;

/// Environment variable that overrides config discovery entirely.
pub const CONFIG_ENV: &str = "GLINT_CONFIG";

const CONFIG_FILE: &str = "glint.toml";

/// Canonical user config location (`~/.config/glint/glint.toml` or the
/// platform equivalent), whether or not the file exists. Used for hints in
/// error messages as well as discovery.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("glint").join(CONFIG_FILE))
}

/// Find the config file to load: `$GLINT_CONFIG` if set, then the user
/// config location, then `./glint.toml`.
///
/// An explicit `$GLINT_CONFIG` is returned even if the file is missing, so
/// the subsequent load fails loudly instead of ignoring the override.
#[must_use]
pub fn discover() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    if let Some(path) = config_path()
        && path.is_file()
    {
        return Some(path);
    }
    let local = PathBuf::from(CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }
    None
}

/// Load settings from a specific file.
pub fn load_from(path: &Path) -> Result<Settings> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

/// Load settings from the discovered config file, if any.
///
/// `Ok(None)` means no config file exists anywhere; the caller falls back to
/// [`Settings::default`].
pub fn load() -> Result<Option<Settings>> {
    match discover() {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading config");
            load_from(&path).map(Some)
        }
        None => Ok(None),
    }
}
