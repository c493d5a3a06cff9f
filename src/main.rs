//! Promover CLI
//!
//! Train a classifier, register the artifact, and promote the new version.
//!
//! # Usage
//!
//! ```bash
//! # Run the workflow with defaults
//! promover run
//!
//! # Run from a config file with overrides
//! promover run --config workflow.yaml --stage Production
//!
//! # Validate a config
//! promover validate workflow.yaml
//! ```

use clap::Parser;
use promover::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
