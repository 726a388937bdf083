//! Rule application: one file's content through the whole registry.

use serde::Serialize;
use std::path::{Path, PathBuf};

use super::registry::Registry;
use crate::error::Result;
use crate::utils::io;

/// One rule's effect on one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEntry {
    pub rule_description: String,
    pub occurrence_count: usize,
}

/// Per-file values that templates can refer to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleContext {
    root_prefix: String,
}

impl Default for RuleContext {
    fn default() -> Self {
        Self::with_prefix("./")
    }
}

impl RuleContext {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            root_prefix: prefix.into(),
        }
    }

    /// `../` for every directory between `root` and the file, `./` for files
    /// directly under `root`.
    pub fn for_path(root: &Path, path: &Path) -> Self {
        let depth = path
            .strip_prefix(root)
            .ok()
            .and_then(Path::parent)
            .map(|dir| dir.components().count())
            .unwrap_or(0);

        if depth == 0 {
            Self::default()
        } else {
            Self::with_prefix("../".repeat(depth))
        }
    }

    pub fn root_prefix(&self) -> &str {
        &self.root_prefix
    }
}

/// Apply every rule in order. Each rule sees the output of the rules before it.
pub fn apply(content: &str, registry: &Registry) -> (String, Vec<ChangeEntry>) {
    apply_with(content, registry, &RuleContext::default())
}

pub fn apply_with(
    content: &str,
    registry: &Registry,
    ctx: &RuleContext,
) -> (String, Vec<ChangeEntry>) {
    let mut current = content.to_string();
    let mut changes = Vec::new();

    for rule in registry {
        let mut rewritten = String::with_capacity(current.len());
        let mut last = 0;
        let mut count = 0;

        for caps in rule.pattern().captures_iter(&current) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            rewritten.push_str(&current[last..whole.start()]);
            rule.replacement().expand(&caps, ctx, &mut rewritten);
            last = whole.end();
            count += 1;
        }

        if count == 0 {
            continue;
        }

        rewritten.push_str(&current[last..]);
        changes.push(ChangeEntry {
            rule_description: rule.description().to_string(),
            occurrence_count: count,
        });
        current = rewritten;
    }

    (current, changes)
}

/// A candidate file between read and write.
#[derive(Debug, Clone)]
pub struct FileUnit {
    pub path: PathBuf,
    pub original_content: String,
    pub current_content: String,
}

impl FileUnit {
    pub fn new(path: impl Into<PathBuf>, content: String) -> Self {
        Self {
            path: path.into(),
            current_content: content.clone(),
            original_content: content,
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = io::read_file(path, &format!("read {}", path.display()))?;
        Ok(Self::new(path, content))
    }

    /// Run the registry over the current content, replacing it with the result.
    pub fn transform(&mut self, registry: &Registry, ctx: &RuleContext) -> Vec<ChangeEntry> {
        let (content, changes) = apply_with(&self.current_content, registry, ctx);
        self.current_content = content;
        changes
    }

    pub fn is_modified(&self) -> bool {
        self.current_content != self.original_content
    }

    pub fn write(&self) -> Result<()> {
        io::write_file(
            &self.path,
            &self.current_content,
            &format!("write {}", self.path.display()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::{RuleDef, Template};

    fn registry(rules: &[(&str, &str, &str)]) -> Registry {
        let defs = rules
            .iter()
            .map(|(p, r, d)| RuleDef::new(*p, Template::literal(*r), *d))
            .collect();
        Registry::new("test", defs).unwrap()
    }

    #[test]
    fn rewrites_use_auth_import() {
        let registry = registry(&[(
            r#"from ['"]\.\./hooks/useAuth['"]"#,
            r#"from "../../../features/auth/hooks""#,
            "useAuth hook",
        )]);

        let (out, changes) = apply(r#"import { useAuth } from "../hooks/useAuth";"#, &registry);

        assert_eq!(out, r#"import { useAuth } from "../../../features/auth/hooks";"#);
        assert_eq!(
            changes,
            vec![ChangeEntry {
                rule_description: "useAuth hook".to_string(),
                occurrence_count: 1,
            }]
        );
    }

    #[test]
    fn repeated_matches_fold_into_one_entry() {
        let registry = registry(&[("old/path", "new/path", "move")]);
        let (out, changes) = apply("a old/path\nb old/path\n", &registry);

        assert_eq!(out, "a new/path\nb new/path\n");
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].occurrence_count, 2);
    }

    #[test]
    fn unmatched_rules_leave_content_alone() {
        let registry = registry(&[("nothing-here", "x", "absent")]);
        let (out, changes) = apply("import a from './a';\n", &registry);

        assert_eq!(out, "import a from './a';\n");
        assert!(changes.is_empty());
    }

    #[test]
    fn later_rules_see_earlier_output() {
        let a = ("/hooks/", "/features/auth/hooks/", "A");
        let b = ("/features/auth/hooks/useAuth", "/features/auth/hooks", "B");

        let (ab, changes_ab) = apply("from '../hooks/useAuth'", &registry(&[a, b]));
        assert_eq!(ab, "from '../features/auth/hooks'");
        assert_eq!(changes_ab.len(), 2);

        let (ba, changes_ba) = apply("from '../hooks/useAuth'", &registry(&[b, a]));
        assert_eq!(ba, "from '../features/auth/hooks/useAuth'");
        assert_eq!(changes_ba.len(), 1);
        assert_eq!(changes_ba[0].rule_description, "A");
    }

    #[test]
    fn captured_groups_are_carried_over() {
        let defs = vec![RuleDef::new(
            r#"import (.*) from ['"]\.\./components/planning/GeneratedPlanningTable['"]"#,
            Template::literal("import ")
                .group(1)
                .text(r#" from "../components/GeneratedPlanningTable""#),
            "GeneratedPlanningTable",
        )];
        let registry = Registry::new("caps", defs).unwrap();

        let (out, _) = apply(
            "import GeneratedPlanningTable from '../components/planning/GeneratedPlanningTable';",
            &registry,
        );
        assert_eq!(
            out,
            r#"import GeneratedPlanningTable from "../components/GeneratedPlanningTable";"#
        );
    }

    #[test]
    fn root_prefix_follows_file_depth() {
        let root = Path::new("src");
        assert_eq!(RuleContext::for_path(root, Path::new("src/a.ts")).root_prefix(), "./");
        assert_eq!(
            RuleContext::for_path(root, Path::new("src/pages/a.ts")).root_prefix(),
            "../"
        );
        assert_eq!(
            RuleContext::for_path(root, Path::new("src/features/auth/a.ts")).root_prefix(),
            "../../"
        );
    }

    #[test]
    fn file_unit_tracks_modification() {
        let registry = registry(&[("old", "new", "rename")]);
        let mut unit = FileUnit::new("a.ts", "import old".to_string());
        assert!(!unit.is_modified());

        let changes = unit.transform(&registry, &RuleContext::default());
        assert_eq!(changes.len(), 1);
        assert!(unit.is_modified());
        assert_eq!(unit.original_content, "import old");
        assert_eq!(unit.current_content, "import new");
    }
}
