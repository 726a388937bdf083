use clap::Args;

use importshift::config;
use importshift::discover::{DiscoveryOptions, DEFAULT_EXTENSIONS};
use importshift::rewrite::{presets, Registry};
use importshift::utils::paths;

pub type CmdResult<T> = importshift::Result<(T, i32)>;

/// Rule and file selection shared by every command.
#[derive(Args, Debug, Clone)]
pub struct RuleArgs {
    /// Compute and report changes without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Root directory to scan
    #[arg(long, default_value = "src")]
    pub dir: String,

    /// Built-in rule table to apply (feature-first, planning, auth-hooks)
    #[arg(long, value_name = "NAME", conflicts_with = "rules")]
    pub preset: Option<String>,

    /// JSON or TOML file with an ordered rule list (replaces the preset)
    #[arg(long, value_name = "FILE")]
    pub rules: Option<String>,

    /// File extension to scan; repeat or comma-separate (default: ts,tsx,js,jsx)
    #[arg(long = "ext", value_name = "EXT", value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Glob (relative to --dir) of paths to leave alone; repeatable
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,
}

/// A validated registry plus the file selection that goes with it.
pub struct LoadedRules {
    pub registry: Registry,
    pub discovery: DiscoveryOptions,
}

/// Load the registry once, before any file is touched. Command-line
/// extensions win over a rules file's, which win over the defaults;
/// exclude globs from both sources apply.
pub fn load_rules(args: &RuleArgs) -> importshift::Result<LoadedRules> {
    let (registry, file_extensions, mut exclude) = match &args.rules {
        Some(path) => {
            let path = paths::expand("rules", path)?;
            let file = config::load_rules_file(&path)?;
            let registry = file.registry(&path.display().to_string())?;
            (registry, file.extensions, file.exclude)
        }
        None => {
            let name = args.preset.as_deref().unwrap_or(presets::DEFAULT_PRESET);
            (presets::load(name)?, None, Vec::new())
        }
    };

    importshift::log_status!(
        "rules",
        "Loaded {} rule(s) from {}",
        registry.len(),
        registry.name()
    );

    let extensions = if !args.extensions.is_empty() {
        args.extensions.clone()
    } else {
        file_extensions.unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect())
    };
    exclude.extend(args.exclude.iter().cloned());

    Ok(LoadedRules {
        registry,
        discovery: DiscoveryOptions::new(extensions, exclude),
    })
}

pub mod migrate;
pub mod rules;
