//! Run reporting.
//!
//! The [`Reporter`] collects per-file outcomes while the run is in progress;
//! [`Reporter::finish`] hands back an immutable [`RunReport`] that can be
//! rendered for a terminal or serialized as JSON.

use console::Style;
use serde::Serialize;
use std::sync::LazyLock;

use crate::discover::DiscoveryIssue;
use crate::rewrite::ChangeEntry;

const RULE_WIDTH: usize = 80;

struct Palette {
    header: Style,
    file: Style,
    summary: Style,
    warning: Style,
    dim: Style,
}

static PALETTE: LazyLock<Palette> = LazyLock::new(|| Palette {
    header: Style::new().magenta().bold(),
    file: Style::new().blue(),
    summary: Style::new().green().bold(),
    warning: Style::new().yellow(),
    dim: Style::new().dim(),
});

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub path: String,
    pub changes: Vec<ChangeEntry>,
    /// Whether the content differs from what was read (or would, in a dry run).
    pub modified: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub root: String,
    pub registry: String,
    pub rule_count: usize,
    pub dry_run: bool,
    pub files_scanned: usize,
    pub files_modified: usize,
    pub files_skipped: usize,
    pub total_changes: usize,
    /// Files with at least one change entry, ordered by path.
    pub per_file: Vec<FileReport>,
    pub skipped: Vec<SkippedFile>,
    pub discovery_issues: Vec<DiscoveryIssue>,
}

impl RunReport {
    pub fn any_modified(&self) -> bool {
        self.files_modified > 0
    }

    /// Human-readable report: header, per-file changes, summary block, and the
    /// apply hint for dry runs that found something to change.
    pub fn render(&self) -> String {
        let palette = &*PALETTE;
        let mut out = String::new();
        let rule = "-".repeat(RULE_WIDTH);

        out.push_str(&format!("{}\n", palette.header.apply_to("importshift: import migration")));
        out.push_str(&format!(
            "Mode: {}\n",
            if self.dry_run { "dry run" } else { "apply" }
        ));
        out.push_str(&format!("Directory: {}\n", self.root));
        out.push_str(&format!("Rules: {} ({} rule(s))\n", self.registry, self.rule_count));
        out.push_str(&format!("{}\n", rule));
        out.push_str(&format!("Files found: {}\n", self.files_scanned));

        for issue in &self.discovery_issues {
            out.push_str(&format!(
                "{}\n",
                palette
                    .warning
                    .apply_to(format!("unreadable directory {}: {}", issue.path, issue.reason))
            ));
        }

        let verb = if self.dry_run { "Would modify" } else { "Modified" };
        for file in &self.per_file {
            let label = if file.modified { verb } else { "Matched (unchanged)" };
            out.push('\n');
            out.push_str(&format!(
                "{}\n",
                palette.file.apply_to(format!("{}: {}", label, file.path))
            ));
            for change in &file.changes {
                out.push_str(&format!(
                    "  - {}: {} occurrence(s)\n",
                    change.rule_description, change.occurrence_count
                ));
            }
        }

        if !self.skipped.is_empty() {
            out.push('\n');
            for skipped in &self.skipped {
                out.push_str(&format!(
                    "{}\n",
                    palette
                        .warning
                        .apply_to(format!("{}: skipped: {}", skipped.path, skipped.reason))
                ));
            }
        }

        out.push('\n');
        out.push_str(&format!("{}\n", rule));
        out.push_str(&format!("{}\n", palette.summary.apply_to("Summary:")));
        out.push_str(&format!("Files scanned: {}\n", self.files_scanned));
        out.push_str(&format!("Files modified: {}\n", self.files_modified));
        if self.files_skipped > 0 {
            out.push_str(&format!("Files skipped: {}\n", self.files_skipped));
        }
        out.push_str(&format!("Total changes: {}\n", self.total_changes));

        if self.dry_run && self.any_modified() {
            out.push('\n');
            out.push_str(&format!(
                "{}\n",
                palette
                    .warning
                    .apply_to("To apply these changes, run again without --dry-run")
            ));
        } else if !self.any_modified() {
            out.push_str(&format!("{}\n", palette.dim.apply_to("Nothing to change.")));
        }

        out
    }
}

pub struct Reporter {
    report: RunReport,
}

impl Reporter {
    pub fn new(
        root: impl Into<String>,
        registry: impl Into<String>,
        rule_count: usize,
        dry_run: bool,
    ) -> Self {
        Self {
            report: RunReport {
                root: root.into(),
                registry: registry.into(),
                rule_count,
                dry_run,
                files_scanned: 0,
                files_modified: 0,
                files_skipped: 0,
                total_changes: 0,
                per_file: Vec::new(),
                skipped: Vec::new(),
                discovery_issues: Vec::new(),
            },
        }
    }

    pub fn record_discovery_issues(&mut self, issues: Vec<DiscoveryIssue>) {
        self.report.discovery_issues.extend(issues);
    }

    /// Record a file that was read and transformed.
    pub fn record(&mut self, path: impl Into<String>, changes: Vec<ChangeEntry>, modified: bool) {
        self.report.files_scanned += 1;
        if modified {
            self.report.files_modified += 1;
        }
        if changes.is_empty() {
            return;
        }

        self.report.total_changes += changes.iter().map(|c| c.occurrence_count).sum::<usize>();
        self.report.per_file.push(FileReport {
            path: path.into(),
            changes,
            modified,
        });
    }

    /// Record a file whose read or write failed. It still counts as scanned.
    pub fn record_skipped(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        self.report.files_scanned += 1;
        self.report.files_skipped += 1;
        self.report.skipped.push(SkippedFile {
            path: path.into(),
            reason: reason.into(),
        });
    }

    pub fn finish(mut self) -> RunReport {
        self.report.per_file.sort_by(|a, b| a.path.cmp(&b.path));
        self.report.skipped.sort_by(|a, b| a.path.cmp(&b.path));
        self.report
    }
}
