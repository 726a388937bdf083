//! Rules files.
//!
//! A rules file replaces the built-in presets with a custom ordered rule list.
//! JSON and TOML are both accepted, chosen by file extension:
//!
//! ```toml
//! name = "move-hooks"
//! extensions = ["ts", "tsx"]
//! exclude = ["legacy/**"]
//!
//! [[rules]]
//! pattern = 'from "\.\./hooks/(\w+)"'
//! replacement = 'from "{root}features/shared/hooks/{1}"'
//! description = "shared hooks"
//! ```
//!
//! `{root}` always means the root prefix, so a pattern may not define a
//! capture group named `root`; such a rule fails to load.

use serde::Deserialize;
use std::path::Path;

use crate::error::{Error, Result};
use crate::rewrite::{Registry, RuleSpec};
use crate::utils::io;

#[derive(Debug, Clone, Deserialize)]
pub struct RulesFile {
    #[serde(default)]
    pub name: Option<String>,
    /// Overrides the default extension set when present.
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
    #[serde(default)]
    pub exclude: Vec<String>,
    pub rules: Vec<RuleSpec>,
}

impl RulesFile {
    pub fn from_json(content: &str, origin: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::config_invalid_json(origin, e))
    }

    pub fn from_toml(content: &str, origin: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config_invalid_toml(origin, e))
    }

    /// Compile the rule list. The registry is named after the file unless the
    /// file names itself.
    pub fn registry(&self, origin: &str) -> Result<Registry> {
        let name = self.name.clone().unwrap_or_else(|| origin.to_string());
        Registry::from_specs(name, self.rules.clone())
    }
}

/// Read and decode a rules file.
pub fn load_rules_file(path: &Path) -> Result<RulesFile> {
    let origin = path.display().to_string();
    let content = io::read_file(path, &format!("read rules file {}", origin))?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => RulesFile::from_json(&content, &origin),
        Some("toml") => RulesFile::from_toml(&content, &origin),
        _ => Err(Error::config_unsupported_format(origin)),
    }
}
