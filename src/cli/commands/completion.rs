//! Completion command implementation

use clap::CommandFactory;
use clap_complete::generate;

use crate::cli::logging::{log, LogLevel};
use crate::cli::{Cli, CompletionArgs};

pub fn run_completion(args: CompletionArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Verbose,
        &format!("Generating completions for: {}", args.shell),
    );

    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "promover", &mut std::io::stdout());
    Ok(())
}
