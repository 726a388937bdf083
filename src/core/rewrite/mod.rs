//! Rule-based import rewriting.
//!
//! A [`Registry`] holds validated rules in order. [`apply`] runs them one after
//! another over a file's content, each rule reading what the previous rules
//! wrote, and reports one [`ChangeEntry`] per rule that matched.

mod apply;
pub mod presets;
mod registry;
mod template;

pub use apply::{apply, apply_with, ChangeEntry, FileUnit, RuleContext};
pub use registry::{Registry, RewriteRule, RuleDef, RuleSpec};
pub use template::{Segment, Template};
