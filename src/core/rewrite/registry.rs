//! Ordered rule registry.
//!
//! Rules run top to bottom against the evolving content of a file. A rule can
//! match text that an earlier rule just produced, and a rule whose pattern was
//! already consumed by an earlier, broader rule never fires at all. When two
//! rules can match the same text, the earlier one rewrites it first and the
//! later one only sees the result. Nothing here detects that; the order of a
//! registry is part of its contract.

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::template::Template;
use crate::error::{Error, Result};

/// Probe inputs used to find patterns that can produce empty matches.
const ZERO_WIDTH_PROBES: &[&str] = &[
    "",
    " ",
    "a",
    "\n",
    "_1-./'\"",
    "import { x } from \"../a\";\n",
];

/// An uncompiled rule, as written in a preset or decoded from a rules file.
#[derive(Debug, Clone)]
pub struct RuleDef {
    pub pattern: String,
    pub replacement: Template,
    pub description: String,
}

impl RuleDef {
    pub fn new(
        pattern: impl Into<String>,
        replacement: Template,
        description: impl Into<String>,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            replacement,
            description: description.into(),
        }
    }
}

/// Rule entry in a JSON or TOML rules file. The replacement uses the
/// placeholder syntax understood by [`Template::parse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSpec {
    pub pattern: String,
    pub replacement: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct RewriteRule {
    pattern: Regex,
    replacement: Template,
    description: String,
}

impl RewriteRule {
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn replacement(&self) -> &Template {
        &self.replacement
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Immutable, ordered sequence of validated rules.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    name: String,
    rules: Vec<RewriteRule>,
}

impl Registry {
    /// Compile and validate every rule. The first broken rule aborts the load.
    pub fn new(name: impl Into<String>, defs: Vec<RuleDef>) -> Result<Self> {
        let rules = defs
            .into_iter()
            .enumerate()
            .map(|(index, def)| compile(index, def))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: name.into(),
            rules,
        })
    }

    /// Build from rules-file entries, parsing each replacement template.
    pub fn from_specs(name: impl Into<String>, specs: Vec<RuleSpec>) -> Result<Self> {
        let defs = specs
            .into_iter()
            .enumerate()
            .map(|(index, spec)| -> Result<RuleDef> {
                let replacement = Template::parse(&spec.replacement).map_err(|problem| {
                    Error::rule_invalid_template(index, &spec.description, &spec.pattern, problem)
                })?;
                Ok(RuleDef::new(spec.pattern, replacement, spec.description))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(name, defs)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RewriteRule> {
        self.rules.iter()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a RewriteRule;
    type IntoIter = std::slice::Iter<'a, RewriteRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

fn compile(index: usize, def: RuleDef) -> Result<RewriteRule> {
    let pattern = Regex::new(&def.pattern).map_err(|e| {
        Error::rule_invalid_pattern(index, &def.description, &def.pattern, e.to_string())
    })?;

    if can_match_empty(&pattern) {
        return Err(Error::rule_zero_width(index, &def.description, &def.pattern));
    }

    def.replacement.check_against(&pattern).map_err(|problem| {
        Error::rule_invalid_template(index, &def.description, &def.pattern, problem)
    })?;

    Ok(RewriteRule {
        pattern,
        replacement: def.replacement,
        description: def.description,
    })
}

/// Probe-based: a pattern that yields an empty match on any probe input is
/// rejected. Anchors, `\b` and optional-only bodies all trip at least one probe.
fn can_match_empty(pattern: &Regex) -> bool {
    ZERO_WIDTH_PROBES
        .iter()
        .any(|probe| pattern.find_iter(probe).any(|m| m.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;

    fn def(pattern: &str, replacement: &str) -> RuleDef {
        RuleDef::new(pattern, Template::literal(replacement), "test rule")
    }

    #[test]
    fn keeps_declaration_order() {
        let registry = Registry::new(
            "ordered",
            vec![def("b", "c"), def("a", "b"), def("c", "d")],
        )
        .unwrap();

        let patterns: Vec<&str> = registry.iter().map(|r| r.pattern().as_str()).collect();
        assert_eq!(patterns, vec!["b", "a", "c"]);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.name(), "ordered");
    }

    #[test]
    fn rejects_malformed_pattern() {
        let err = Registry::new("bad", vec![def("ok", "x"), def("from (", "x")]).unwrap_err();
        assert_eq!(err.code, ErrorCode::RuleInvalidPattern);
        assert_eq!(err.details["index"], 1);
    }

    #[test]
    fn rejects_zero_width_patterns() {
        for pattern in ["x*", "^", r"\b", "(?m)$", "a?"] {
            let err = Registry::new("zw", vec![def(pattern, "y")]).unwrap_err();
            assert_eq!(err.code, ErrorCode::RuleZeroWidth, "pattern {:?}", pattern);
        }
    }

    #[test]
    fn accepts_consuming_patterns() {
        for pattern in [r"from '\.\./a'", r"x+", r"\bimport\b", r"(?m)^import"] {
            assert!(
                Registry::new("ok", vec![def(pattern, "y")]).is_ok(),
                "pattern {:?}",
                pattern
            );
        }
    }

    #[test]
    fn rejects_template_referencing_missing_group() {
        let rule = RuleDef::new("import (a)", Template::literal("x").group(2), "missing");
        let err = Registry::new("bad", vec![rule]).unwrap_err();
        assert_eq!(err.code, ErrorCode::RuleInvalidTemplate);
    }

    #[test]
    fn from_specs_parses_templates() {
        let specs = vec![RuleSpec {
            pattern: r"import (\w+) from '\./old'".to_string(),
            replacement: "import {1} from '{root}new'".to_string(),
            description: "old to new".to_string(),
        }];
        let registry = Registry::from_specs("file", specs).unwrap();
        assert_eq!(
            registry.rules()[0].replacement(),
            &Template::literal("import ").group(1).text(" from '").root_prefix().text("new'")
        );
    }

    #[test]
    fn from_specs_reports_bad_template() {
        let specs = vec![RuleSpec {
            pattern: "a".to_string(),
            replacement: "{oops".to_string(),
            description: "broken".to_string(),
        }];
        let err = Registry::from_specs("file", specs).unwrap_err();
        assert_eq!(err.code, ErrorCode::RuleInvalidTemplate);
        assert_eq!(err.details["description"], "broken");
    }

    #[test]
    fn from_specs_rejects_reserved_group_name() {
        let specs = vec![RuleSpec {
            pattern: r"from '(?P<root>(\.\./)+)hooks'".to_string(),
            replacement: "from '{root}features/hooks'".to_string(),
            description: "shadowed".to_string(),
        }];
        let err = Registry::from_specs("file", specs).unwrap_err();
        assert_eq!(err.code, ErrorCode::RuleInvalidTemplate);
        assert_eq!(err.details["index"], 0);
    }
}
