//! Migration run: discover, read, transform, optionally write, report.
//!
//! Every file is an independent unit of work. A read or write failure skips
//! that file and the run carries on; files already written stay written.

use std::path::{Path, PathBuf};

use crate::discover::{self, DiscoveryOptions};
use crate::error::{Error, Result};
use crate::report::{Reporter, RunReport};
use crate::rewrite::{FileUnit, Registry, RuleContext};
use crate::utils::paths;

/// Where a run is. Runs move strictly forward through these phases; the
/// per-file phases repeat once per discovered file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Discovering,
    Reading,
    Transforming,
    DryReport,
    Writing,
    Report,
    Summarizing,
    Done,
}

#[derive(Debug, Clone)]
pub struct MigrateOptions {
    pub root: PathBuf,
    pub dry_run: bool,
    pub discovery: DiscoveryOptions,
}

impl MigrateOptions {
    pub fn new(root: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            root: root.into(),
            dry_run,
            discovery: DiscoveryOptions::default(),
        }
    }

    pub fn with_discovery(mut self, discovery: DiscoveryOptions) -> Self {
        self.discovery = discovery;
        self
    }
}

pub fn run(registry: &Registry, options: &MigrateOptions) -> Result<RunReport> {
    run_observed(registry, options, |_, _| {})
}

/// Like [`run`], calling `observe` on every phase change. The path is set for
/// the per-file phases.
pub fn run_observed<F>(registry: &Registry, options: &MigrateOptions, mut observe: F) -> Result<RunReport>
where
    F: FnMut(Phase, Option<&Path>),
{
    observe(Phase::Idle, None);

    let root = &options.root;
    if !root.is_dir() {
        return Err(Error::discovery_root_not_found(root.display().to_string()));
    }

    observe(Phase::Discovering, None);
    let discovery = discover::discover(root, &options.discovery);
    crate::log_status!(
        "migrate",
        "{} candidate file(s) under {}",
        discovery.files.len(),
        root.display()
    );

    let mut reporter = Reporter::new(
        root.display().to_string(),
        registry.name(),
        registry.len(),
        options.dry_run,
    );
    reporter.record_discovery_issues(discovery.issues);

    for path in &discovery.files {
        let shown = paths::display_relative(path, root);

        observe(Phase::Reading, Some(path));
        let mut unit = match FileUnit::read(path) {
            Ok(unit) => unit,
            Err(err) => {
                crate::log_status!("migrate", "Skipping {}: {}", shown, err.reason());
                reporter.record_skipped(shown, err.reason());
                continue;
            }
        };

        observe(Phase::Transforming, Some(path));
        let ctx = RuleContext::for_path(root, path);
        let changes = unit.transform(registry, &ctx);
        let modified = unit.is_modified();

        if options.dry_run {
            observe(Phase::DryReport, Some(path));
        } else {
            if modified {
                observe(Phase::Writing, Some(path));
                if let Err(err) = unit.write() {
                    crate::log_status!("migrate", "Skipping {}: {}", shown, err.reason());
                    reporter.record_skipped(shown, err.reason());
                    continue;
                }
                crate::log_status!("migrate", "Wrote {}", shown);
            }
            observe(Phase::Report, Some(path));
        }

        reporter.record(shown, changes, modified);
    }

    observe(Phase::Summarizing, None);
    let report = reporter.finish();
    observe(Phase::Done, None);

    Ok(report)
}
