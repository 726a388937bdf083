//! Path helpers for command-line input and report output.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Expand a leading `~` and `$VAR` / `${VAR}` references the way a shell would.
/// `field` names the flag the value came from, for the error.
pub fn expand(field: &str, path: &str) -> Result<PathBuf> {
    shellexpand::full(path)
        .map(|expanded| PathBuf::from(expanded.into_owned()))
        .map_err(|e| Error::validation_invalid_argument(field, path, e.to_string()))
}

/// `path` relative to `base` when it lives under it, otherwise unchanged.
/// Separators are normalized to `/` so reports read the same on every platform.
pub fn display_relative(path: &Path, base: &Path) -> String {
    match path.strip_prefix(base) {
        Ok(relative) => relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.display().to_string(),
    }
}
