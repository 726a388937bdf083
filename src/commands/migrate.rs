use importshift::migrate::{self, MigrateOptions};
use importshift::report::RunReport;
use importshift::utils::paths;

use super::{load_rules, CmdResult, RuleArgs};

/// Load rules, then run the migration over `--dir`.
///
/// Exit code is 0 whether or not anything changed; only load failures, a bad
/// `--dir` value and a missing root directory surface as errors.
pub fn run(args: &RuleArgs) -> CmdResult<RunReport> {
    let loaded = load_rules(args)?;
    let root = paths::expand("dir", &args.dir)?;
    let options = MigrateOptions::new(root, args.dry_run).with_discovery(loaded.discovery);

    let report = migrate::run(&loaded.registry, &options)?;
    Ok((report, 0))
}
