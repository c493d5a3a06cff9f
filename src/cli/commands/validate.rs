//! Validate command implementation

use crate::cli::logging::{log, LogLevel};
use crate::cli::ValidateArgs;
use crate::config::WorkflowConfig;

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    let config = WorkflowConfig::from_yaml_file(&args.config)
        .map_err(|e| format!("Failed to load {}: {e}", args.config.display()))?;

    config
        .validate()
        .map_err(|e| format!("Invalid configuration: {e}"))?;

    log(
        level,
        LogLevel::Normal,
        &format!("{} is valid", args.config.display()),
    );

    if args.detailed {
        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| format!("Failed to render configuration: {e}"))?;
        log(level, LogLevel::Normal, &yaml);
    }

    Ok(())
}
