//! Candidate file discovery.
//!
//! Walks the scan root recursively and keeps files whose extension is
//! recognized. Directories that cannot be read are recorded and skipped; the
//! rest of the tree is still walked.

use glob_match::glob_match;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::utils::paths;

pub const DEFAULT_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// Directories to always skip at any depth (dependency/VCS directories).
const ALWAYS_SKIP_DIRS: &[&str] = &["node_modules", ".git", ".svn", ".hg"];

/// Directories to skip only directly under the root (build output).
const ROOT_ONLY_SKIP_DIRS: &[&str] = &["build", "dist"];

#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    extensions: Vec<String>,
    exclude: Vec<String>,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(), Vec::new())
    }
}

impl DiscoveryOptions {
    /// Extensions may be given with or without the leading dot.
    pub fn new(extensions: Vec<String>, exclude: Vec<String>) -> Self {
        let extensions = extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .collect();
        Self {
            extensions,
            exclude,
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    fn accepts_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|known| known == ext))
    }

    fn is_excluded(&self, relative: &str) -> bool {
        self.exclude
            .iter()
            .any(|pattern| glob_match(pattern, relative))
    }
}

/// A directory or entry the walk could not read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryIssue {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Sorted lexicographically by path.
    pub files: Vec<PathBuf>,
    pub issues: Vec<DiscoveryIssue>,
}

pub fn discover(root: &Path, options: &DiscoveryOptions) -> Discovery {
    let mut discovery = Discovery::default();
    walk_recursive(root, root, options, &mut discovery);
    discovery.files.sort();
    discovery
}

fn walk_recursive(dir: &Path, root: &Path, options: &DiscoveryOptions, out: &mut Discovery) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            record_issue(out, dir, root, e.to_string());
            return;
        }
    };

    let is_root = dir == root;

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                record_issue(out, dir, root, e.to_string());
                continue;
            }
        };

        let path = entry.path();
        let relative = paths::display_relative(&path, root);
        if options.is_excluded(&relative) {
            continue;
        }

        // Symlinks are not followed into directories; a symlinked file is
        // treated like any other candidate.
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

        if is_dir {
            let name = entry.file_name().to_string_lossy().to_string();
            if ALWAYS_SKIP_DIRS.contains(&name.as_str()) {
                continue;
            }
            if is_root && ROOT_ONLY_SKIP_DIRS.contains(&name.as_str()) {
                continue;
            }
            walk_recursive(&path, root, options, out);
        } else if options.accepts_extension(&path) {
            out.files.push(path);
        }
    }
}

fn record_issue(out: &mut Discovery, path: &Path, root: &Path, reason: String) {
    let shown = paths::display_relative(path, root);
    crate::log_status!("discover", "Skipping {}: {}", shown, reason);
    out.issues.push(DiscoveryIssue {
        path: shown,
        reason,
    });
}
