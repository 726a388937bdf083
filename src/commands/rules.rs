use serde::Serialize;

use super::{load_rules, CmdResult, RuleArgs};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesOutput {
    pub registry: String,
    pub extensions: Vec<String>,
    pub rules: Vec<RuleSummary>,
}

#[derive(Debug, Serialize)]
pub struct RuleSummary {
    /// One-based, in application order.
    pub position: usize,
    pub description: String,
    pub pattern: String,
    pub replacement: String,
}

impl RulesOutput {
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{} ({} rule(s), extensions: {})\n",
            self.registry,
            self.rules.len(),
            self.extensions.join(", ")
        ));
        for rule in &self.rules {
            out.push_str(&format!("{:>3}. {}\n", rule.position, rule.description));
            out.push_str(&format!("     {}\n", rule.pattern));
            out.push_str(&format!("  -> {}\n", rule.replacement));
        }
        out
    }
}

/// List the active registry in application order.
pub fn run(args: &RuleArgs) -> CmdResult<RulesOutput> {
    let loaded = load_rules(args)?;

    let rules = loaded
        .registry
        .iter()
        .enumerate()
        .map(|(index, rule)| RuleSummary {
            position: index + 1,
            description: rule.description().to_string(),
            pattern: rule.pattern().as_str().to_string(),
            replacement: rule.replacement().to_string(),
        })
        .collect();

    Ok((
        RulesOutput {
            registry: loaded.registry.name().to_string(),
            extensions: loaded.discovery.extensions().to_vec(),
            rules,
        },
        0,
    ))
}
