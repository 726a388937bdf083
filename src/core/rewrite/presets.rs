//! Built-in rule tables.
//!
//! - `feature-first`: moves shared hooks and the firebase config import into
//!   the feature-first layout. Written for files under `src/features/<name>/<dir>/`.
//! - `planning`: fix-ups for the planning pages after they moved under
//!   `src/features/planning/pages/`.
//! - `auth-hooks`: rewrites every `useAuth` import to the auth feature,
//!   relative to the scan root.
//!
//! None of these tables cascade: no replacement produces text that a later
//! rule in the same table matches, so each one reaches a fixed point after a
//! single run. More specific forms such as `import { useAuth } from "../useAuth"`
//! are deliberately absent from `feature-first`: the broader `from` rules above
//! them already rewrite that text, so a specific rule placed after them would
//! never fire.
//!
//! Two kinds of rule are not carried over from the hand-run migration scripts:
//!
//! - Identity rules that replace a path with exactly the same text. They match
//!   on every run, so a table containing one never settles.
//! - The context-level `import { db } from '../../../lib/firebase/config'`
//!   rewrite. Its replacement dropped the import clause, leaving a bare
//!   `from "..."`, and its output matched the features-level rule again.

use super::registry::{Registry, RuleDef};
use super::template::Template;
use crate::error::{Error, Result};

pub const DEFAULT_PRESET: &str = "feature-first";

const PRESETS: &[&str] = &["feature-first", "planning", "auth-hooks"];

pub fn names() -> &'static [&'static str] {
    PRESETS
}

/// Compile the named preset.
pub fn load(name: &str) -> Result<Registry> {
    let defs = match name {
        "feature-first" => feature_first(),
        "planning" => planning(),
        "auth-hooks" => auth_hooks(),
        _ => {
            return Err(Error::preset_not_found(
                name,
                PRESETS.iter().map(|p| p.to_string()).collect(),
            ))
        }
    };
    Registry::new(name, defs)
}

/// `from '<old>'` or `from "<old>"` becomes `from "<new>"`.
fn relocate(old: &str, new: &str, description: &str) -> RuleDef {
    RuleDef::new(
        format!(r#"from ['"]{}['"]"#, regex::escape(old)),
        Template::literal(format!(r#"from "{}""#, new)),
        description,
    )
}

/// Same path, single quotes normalized to double quotes. Only the single-quoted
/// form matches, so already-normalized imports are left alone.
fn requote(path: &str, description: &str) -> RuleDef {
    RuleDef::new(
        format!("from '{}'", regex::escape(path)),
        Template::literal(format!(r#"from "{}""#, path)),
        description,
    )
}

fn feature_first() -> Vec<RuleDef> {
    let mut rules = vec![
        relocate(
            "../lib/firebase/config",
            "../../../lib/firebase/config",
            "Firebase config (features)",
        ),
        requote("../../lib/firebase/config", "Firebase config (context)"),
    ];

    for old in ["../hooks/useAuth", "../../hooks/useAuth", "../useAuth", "./useAuth"] {
        rules.push(relocate(old, "../../../features/auth/hooks", "useAuth hook"));
    }

    for hook in ["useDesiderata", "useDesiderataState"] {
        let target = format!("../../../features/planning/hooks/{}", hook);
        let description = format!("{} hook", hook);
        for old in [
            format!("../hooks/{}", hook),
            format!("../../hooks/{}", hook),
            format!("../{}", hook),
            format!("./{}", hook),
        ] {
            rules.push(relocate(&old, &target, &description));
        }
    }

    for (hook, feature) in [
        ("usePlanningPeriod", "planning"),
        ("useShiftAssignments", "planning"),
        ("useUserAssignments", "users"),
        ("useCachedUserData", "users"),
    ] {
        rules.push(relocate(
            &format!("../hooks/{}", hook),
            &format!("../../../features/{}/hooks/{}", feature, hook),
            &format!("{} hook", hook),
        ));
    }

    rules
}

fn planning() -> Vec<RuleDef> {
    vec![
        relocate(
            "../context/shiftExchange",
            "../../../context/shiftExchange",
            "shiftExchange context",
        ),
        relocate(
            "../context/planning/PlanningContext",
            "../../../context/planning/PlanningContext",
            "PlanningContext",
        ),
        requote("../components/common/Switch", "Switch component"),
        requote("../components/common/LoadingSpinner", "LoadingSpinner component"),
        relocate(
            "../components/planning/PlanningTutorial",
            "../components/PlanningTutorial",
            "PlanningTutorial component",
        ),
        relocate("../components/Toast", "../../../components/Toast", "Toast component"),
        RuleDef::new(
            r#"import (.*) from ['"]\.\./components/planning/GeneratedPlanningTable['"]"#,
            Template::literal("import ")
                .group(1)
                .text(r#" from "../components/GeneratedPlanningTable""#),
            "GeneratedPlanningTable component",
        ),
        relocate("../types/planning", "../types", "planning types"),
        requote("../utils/timeUtils", "timeUtils"),
        requote("../utils/lazyExporters", "lazyExporters"),
        relocate(
            "../lib/firebase/desiderata",
            "../../../lib/firebase/desiderata",
            "Firebase desiderata",
        ),
    ]
}

fn auth_hooks() -> Vec<RuleDef> {
    vec![RuleDef::new(
        r#"import\s*\{\s*useAuth\s*\}\s*from\s*['"][^'"]*/hooks/useAuth['"]"#,
        Template::literal("import { useAuth } from '")
            .root_prefix()
            .text("features/auth/hooks'"),
        "useAuth import (root-relative)",
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::{apply, apply_with, RuleContext};
    use crate::ErrorCode;

    #[test]
    fn every_preset_compiles() {
        for name in names() {
            let registry = load(name).unwrap();
            assert!(!registry.is_empty(), "preset {} is empty", name);
            assert_eq!(registry.name(), *name);
        }
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let err = load("legacy").unwrap_err();
        assert_eq!(err.code, ErrorCode::PresetNotFound);
    }

    #[test]
    fn feature_first_moves_use_auth() {
        let registry = load("feature-first").unwrap();
        let (out, changes) = apply(r#"import { useAuth } from "../hooks/useAuth";"#, &registry);

        assert_eq!(out, r#"import { useAuth } from "../../../features/auth/hooks";"#);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].rule_description, "useAuth hook");
        assert_eq!(changes[0].occurrence_count, 1);
    }

    #[test]
    fn feature_first_keeps_state_hook_separate() {
        let registry = load("feature-first").unwrap();
        let input = "import a from '../hooks/useDesiderata';\nimport b from './useDesiderataState';\n";
        let (out, changes) = apply(input, &registry);

        assert_eq!(
            out,
            "import a from \"../../../features/planning/hooks/useDesiderata\";\n\
             import b from \"../../../features/planning/hooks/useDesiderataState\";\n"
        );
        let descriptions: Vec<&str> = changes.iter().map(|c| c.rule_description.as_str()).collect();
        assert_eq!(descriptions, vec!["useDesiderata hook", "useDesiderataState hook"]);
    }

    #[test]
    fn feature_first_requotes_context_firebase_config() {
        let registry = load("feature-first").unwrap();
        let (out, changes) = apply(
            "import { db } from '../../lib/firebase/config';\nimport { db as d } from \"../../lib/firebase/config\";\n",
            &registry,
        );

        assert_eq!(
            out,
            "import { db } from \"../../lib/firebase/config\";\nimport { db as d } from \"../../lib/firebase/config\";\n"
        );
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].rule_description, "Firebase config (context)");
        assert_eq!(changes[0].occurrence_count, 1);
    }

    #[test]
    fn presets_reach_a_fixed_point() {
        let input = "import { db } from '../lib/firebase/config';\n\
                     import { auth } from '../../lib/firebase/config';\n\
                     import { useAuth } from './useAuth';\n\
                     import Toast from '../components/Toast';\n\
                     import Switch from '../components/common/Switch';\n\
                     import { usePlanningPeriod } from '../hooks/usePlanningPeriod';\n";

        for name in names() {
            let registry = load(name).unwrap();
            let (once, _) = apply(input, &registry);
            let (twice, changes) = apply(&once, &registry);
            assert_eq!(once, twice, "preset {}", name);
            assert!(changes.is_empty(), "preset {} changed on second run", name);
        }
    }

    #[test]
    fn planning_normalizes_quotes_only_once() {
        let registry = load("planning").unwrap();
        let (out, changes) = apply(
            "import Switch from '../components/common/Switch';\nimport S2 from \"../components/common/Switch\";\n",
            &registry,
        );
        assert_eq!(
            out,
            "import Switch from \"../components/common/Switch\";\nimport S2 from \"../components/common/Switch\";\n"
        );
        assert_eq!(changes[0].occurrence_count, 1);
    }

    #[test]
    fn auth_hooks_uses_file_depth() {
        let registry = load("auth-hooks").unwrap();
        let input = "import { useAuth } from '../../hooks/useAuth';";

        let (out, _) = apply_with(input, &registry, &RuleContext::with_prefix("../../"));
        assert_eq!(out, "import { useAuth } from '../../features/auth/hooks';");

        let (out, _) = apply_with(input, &registry, &RuleContext::default());
        assert_eq!(out, "import { useAuth } from './features/auth/hooks';");
    }
}
