//! CLI module for promover
//!
//! Argument definitions, command handlers, and output utilities.

mod commands;
mod logging;

pub use commands::run_command;
pub use logging::{log, LogLevel};

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::WorkflowConfig;
use crate::registry::ModelStage;

/// Promover: model training, registration, and stage promotion
#[derive(Parser, Debug, Clone)]
#[command(name = "promover")]
#[command(version)]
#[command(about = "Train a classifier, register it, and promote it through lifecycle stages")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Execute the train-register-promote workflow
    Run(RunArgs),

    /// Validate a configuration file without running
    Validate(ValidateArgs),

    /// Generate shell completions
    Completion(CompletionArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to a YAML configuration file; defaults apply when omitted
    #[arg(short, long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the registry model name
    #[arg(long)]
    pub model_name: Option<String>,

    /// Override the experiment name
    #[arg(long)]
    pub experiment: Option<String>,

    /// Override the target stage for the new version
    #[arg(long)]
    pub stage: Option<ModelStage>,

    /// Override the dataset seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the polling attempt budget
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Validate the configuration and report the plan without running
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone)]
pub struct ValidateArgs {
    /// Path to a YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Show the resolved configuration
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for the completion command
#[derive(Parser, Debug, Clone)]
pub struct CompletionArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Apply command-line overrides to a workflow configuration
pub fn apply_overrides(config: &mut WorkflowConfig, args: &RunArgs) {
    if let Some(model_name) = &args.model_name {
        config.experiment.model_name = model_name.clone();
    }
    if let Some(experiment) = &args.experiment {
        config.experiment.name = experiment.clone();
    }
    if let Some(stage) = args.stage {
        config.wait.target_stage = stage;
    }
    if let Some(seed) = args.seed {
        config.data.seed = seed;
    }
    if let Some(max_attempts) = args.max_attempts {
        config.wait.max_attempts = max_attempts;
    }
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_defaults() {
        let cli = parse_args(["promover", "run"]).unwrap();
        assert!(!cli.verbose);
        assert!(!cli.quiet);
        match cli.command {
            Command::Run(args) => {
                assert!(args.config.is_none());
                assert!(!args.dry_run);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_parse_run_with_overrides() {
        let cli = parse_args([
            "promover",
            "run",
            "--model-name",
            "churn-clf",
            "--stage",
            "Production",
            "--max-attempts",
            "3",
        ])
        .unwrap();

        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.model_name.as_deref(), Some("churn-clf"));
                assert_eq!(args.stage, Some(ModelStage::Production));
                assert_eq!(args.max_attempts, Some(3));
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_stage() {
        let result = parse_args(["promover", "run", "--stage", "Shadow"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_validate() {
        let cli = parse_args(["promover", "validate", "workflow.yaml", "--detailed"]).unwrap();
        match cli.command {
            Command::Validate(args) => {
                assert_eq!(args.config.to_str(), Some("workflow.yaml"));
                assert!(args.detailed);
            }
            _ => panic!("expected validate command"),
        }
    }

    #[test]
    fn test_apply_overrides() {
        let cli = parse_args([
            "promover",
            "run",
            "--experiment",
            "churn",
            "--seed",
            "7",
            "--stage",
            "Archived",
        ])
        .unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run command");
        };

        let mut config = WorkflowConfig::default();
        apply_overrides(&mut config, &args);

        assert_eq!(config.experiment.name, "churn");
        assert_eq!(config.data.seed, 7);
        assert_eq!(config.wait.target_stage, ModelStage::Archived);
        // Untouched fields keep their values.
        assert_eq!(config.experiment.model_name, "clf-model");
    }

    #[test]
    fn test_global_flags() {
        let cli = parse_args(["promover", "run", "--verbose"]).unwrap();
        assert!(cli.verbose);

        let cli = parse_args(["promover", "validate", "x.yaml", "--quiet"]).unwrap();
        assert!(cli.quiet);
    }
}
