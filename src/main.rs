use clap::Parser;

mod commands;
mod output;

use commands::{migrate, rules, RuleArgs};
use output::OutputMode;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "importshift")]
#[command(version = VERSION)]
#[command(about = "Rewrite import paths to match a relocated module layout")]
struct Cli {
    #[command(flatten)]
    rules: RuleArgs,

    /// Print the active rules in application order and exit
    #[arg(long)]
    list_rules: bool,

    /// Print a JSON envelope instead of the colored report
    #[arg(long)]
    json: bool,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let exit_code = if cli.list_rules {
        output::emit(mode, rules::run(&cli.rules), rules::RulesOutput::render)
    } else {
        output::emit(mode, migrate::run(&cli.rules), |report| report.render())
    };

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
