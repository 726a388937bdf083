//! Structured replacement templates.
//!
//! A template is an ordered list of segments. Capture references are explicit
//! segments instead of `$1` / `\1` syntax embedded in a string, so the engine
//! never depends on one regex flavor's back-reference rules.

use regex::{Captures, Regex};

use super::apply::RuleContext;

const ROOT_PLACEHOLDER: &str = "root";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Copied verbatim.
    Literal(String),
    /// Numbered capture group. Group 0 is the whole match.
    Group(usize),
    /// Named capture group.
    Named(String),
    /// Relative prefix from the file's directory back to the scan root.
    RootPrefix,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    /// A template made of a single literal segment.
    pub fn literal(text: impl Into<String>) -> Self {
        Self::new().text(text)
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return self;
        }
        // Adjacent literals are merged so parsed and built templates compare equal.
        if let Some(Segment::Literal(last)) = self.segments.last_mut() {
            last.push_str(&text);
        } else {
            self.segments.push(Segment::Literal(text));
        }
        self
    }

    pub fn group(mut self, index: usize) -> Self {
        self.segments.push(Segment::Group(index));
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.segments.push(Segment::Named(name.into()));
        self
    }

    pub fn root_prefix(mut self) -> Self {
        self.segments.push(Segment::RootPrefix);
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Parse the rule-file form: `{1}`, `{name}`, `{root}`, with `{{` and `}}`
    /// as literal braces. Any other use of a brace is an error.
    pub fn parse(source: &str) -> Result<Self, String> {
        let mut template = Template::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if chars.peek().map(|&(_, n)| n) == Some('{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek().map(|&(_, n)| n) == Some('}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, n) in chars.by_ref() {
                        if n == '}' {
                            closed = true;
                            break;
                        }
                        name.push(n);
                    }
                    if !closed {
                        return Err(format!("unclosed '{{' at offset {}", pos));
                    }

                    template = template.text(std::mem::take(&mut literal));
                    template = match name.as_str() {
                        "" => return Err(format!("empty placeholder at offset {}", pos)),
                        ROOT_PLACEHOLDER => template.root_prefix(),
                        _ if name.chars().all(|ch| ch.is_ascii_digit()) => {
                            let index = name
                                .parse()
                                .map_err(|_| format!("group index '{}' is out of range", name))?;
                            template.group(index)
                        }
                        _ if name.chars().all(|ch| ch.is_alphanumeric() || ch == '_') => {
                            template.named(name.clone())
                        }
                        _ => return Err(format!("invalid placeholder '{{{}}}'", name)),
                    };
                }
                '}' => return Err(format!("unmatched '}}' at offset {}", pos)),
                _ => literal.push(c),
            }
        }

        Ok(template.text(literal))
    }

    /// Check every capture reference against the groups `pattern` defines.
    /// `root` is reserved for the root prefix and cannot name a group.
    pub fn check_against(&self, pattern: &Regex) -> Result<(), String> {
        if pattern.capture_names().flatten().any(|n| n == ROOT_PLACEHOLDER) {
            return Err(format!(
                "group name '{}' is reserved for the root prefix",
                ROOT_PLACEHOLDER
            ));
        }
        for segment in &self.segments {
            match segment {
                Segment::Group(index) if *index >= pattern.captures_len() => {
                    return Err(format!(
                        "references group {} but the pattern has {} group(s)",
                        index,
                        pattern.captures_len() - 1
                    ));
                }
                Segment::Named(name) if !pattern.capture_names().flatten().any(|n| n == name.as_str()) => {
                    return Err(format!("references unknown group '{}'", name));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Append the expansion for one match to `out`. Groups that did not
    /// participate in the match expand to nothing.
    pub fn expand(&self, caps: &Captures<'_>, ctx: &RuleContext, out: &mut String) {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Group(index) => {
                    if let Some(m) = caps.get(*index) {
                        out.push_str(m.as_str());
                    }
                }
                Segment::Named(name) => {
                    if let Some(m) = caps.name(name) {
                        out.push_str(m.as_str());
                    }
                }
                Segment::RootPrefix => out.push_str(ctx.root_prefix()),
            }
        }
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => write!(f, "{}", text.replace('{', "{{").replace('}', "}}"))?,
                Segment::Group(index) => write!(f, "{{{}}}", index)?,
                Segment::Named(name) => write!(f, "{{{}}}", name)?,
                Segment::RootPrefix => write!(f, "{{{}}}", ROOT_PLACEHOLDER)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mixed_segments() {
        let template = Template::parse("import {1} from \"{root}features/{kind}\"").unwrap();
        assert_eq!(
            template.segments(),
            &[
                Segment::Literal("import ".to_string()),
                Segment::Group(1),
                Segment::Literal(" from \"".to_string()),
                Segment::RootPrefix,
                Segment::Literal("features/".to_string()),
                Segment::Named("kind".to_string()),
                Segment::Literal("\"".to_string()),
            ]
        );
    }

    #[test]
    fn parse_matches_builder() {
        let parsed = Template::parse("import {1} from \"../x\"").unwrap();
        let built = Template::literal("import ").group(1).text(" from \"../x\"");
        assert_eq!(parsed, built);
    }

    #[test]
    fn escaped_braces_are_literal() {
        let template = Template::parse("import {{ db }} from \"x\"").unwrap();
        assert_eq!(
            template.segments(),
            &[Segment::Literal("import { db } from \"x\"".to_string())]
        );
        assert_eq!(template.to_string(), "import {{ db }} from \"x\"");
    }

    #[test]
    fn parse_rejects_malformed_placeholders() {
        assert!(Template::parse("from {1").is_err());
        assert!(Template::parse("from }").is_err());
        assert!(Template::parse("from {}").is_err());
        assert!(Template::parse("from {a-b}").is_err());
    }

    #[test]
    fn check_against_rejects_missing_groups() {
        let pattern = Regex::new(r"import (?P<what>\w+)").unwrap();
        assert!(Template::literal("x").group(1).check_against(&pattern).is_ok());
        assert!(Template::literal("x").named("what").check_against(&pattern).is_ok());
        assert!(Template::literal("x").group(2).check_against(&pattern).is_err());
        assert!(Template::literal("x").named("other").check_against(&pattern).is_err());
    }

    #[test]
    fn check_against_rejects_group_named_root() {
        let pattern = Regex::new(r"from '(?P<root>\.\./)+hooks'").unwrap();
        let err = Template::parse("from '{root}hooks'")
            .unwrap()
            .check_against(&pattern)
            .unwrap_err();
        assert!(err.contains("reserved"));
    }

    #[test]
    fn expand_substitutes_groups_and_root() {
        let pattern = Regex::new(r"import (\w+)(;)?").unwrap();
        let caps = pattern.captures("import Table").unwrap();
        let ctx = RuleContext::with_prefix("../../");
        let template = Template::literal("use ").group(1).group(2).text(" @ ").root_prefix();

        let mut out = String::new();
        template.expand(&caps, &ctx, &mut out);
        assert_eq!(out, "use Table @ ../../");
    }
}
