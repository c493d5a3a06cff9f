//! CLI command implementations

mod completion;
mod run;
mod validate;

use crate::cli::logging::LogLevel;
use crate::cli::{Cli, Command};

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    let log_level = LogLevel::from_flags(cli.quiet, cli.verbose);

    match cli.command {
        Command::Run(args) => run::run_run(args, log_level),
        Command::Validate(args) => validate::run_validate(args, log_level),
        Command::Completion(args) => completion::run_completion(args, log_level),
    }
}
