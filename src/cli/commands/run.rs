//! Run command implementation

use crate::cli::logging::{log, LogLevel};
use crate::cli::{apply_overrides, RunArgs};
use crate::config::WorkflowConfig;
use crate::promote::PromotionOutcome;
use crate::registry::InMemoryRegistry;
use crate::tracking::storage::JsonFileBackend;
use crate::tracking::ExperimentTracker;
use crate::workflow::run_workflow;

pub fn run_run(args: RunArgs, level: LogLevel) -> Result<(), String> {
    let mut config = match &args.config {
        Some(path) => WorkflowConfig::from_yaml_file(path)
            .map_err(|e| format!("Failed to load {}: {e}", path.display()))?,
        None => WorkflowConfig::default(),
    };
    apply_overrides(&mut config, &args);
    config
        .validate()
        .map_err(|e| format!("Invalid configuration: {e}"))?;

    if args.dry_run {
        log(
            level,
            LogLevel::Normal,
            &format!(
                "Dry run: would train {} samples x {} features and register '{}' targeting {}",
                config.data.n_samples,
                config.data.n_features,
                config.experiment.model_name,
                config.wait.target_stage,
            ),
        );
        return Ok(());
    }

    let mut registry = InMemoryRegistry::new();
    let mut tracker = ExperimentTracker::new(
        config.experiment.name.as_str(),
        JsonFileBackend::new(&config.experiment.tracking_dir),
    );
    tracker.add_tag("env", "stg");
    tracker.add_tag("state", "pre-publish");
    if let Some(user) = &config.experiment.user {
        tracker.add_tag("user", user.as_str());
    }

    let report = run_workflow(&config, &mut registry, &mut tracker)
        .map_err(|e| format!("Workflow failed: {e}"))?;

    log(
        level,
        LogLevel::Normal,
        &format!(
            "Run {}: accuracy_train={:.4} accuracy_test={:.4}",
            report.run_id, report.accuracy_train, report.accuracy_test
        ),
    );
    match report.current_outcome {
        PromotionOutcome::Promoted { attempts } => log(
            level,
            LogLevel::Normal,
            &format!(
                "Version {} promoted to {} after {} attempt(s)",
                report.version, config.wait.target_stage, attempts
            ),
        ),
        PromotionOutcome::Exhausted { attempts } => log(
            level,
            LogLevel::Normal,
            &format!(
                "Version {} not promoted: {} attempt(s) exhausted",
                report.version, attempts
            ),
        ),
    }

    if level == LogLevel::Verbose {
        for t in registry.transition_history(&config.experiment.model_name) {
            log(
                level,
                LogLevel::Verbose,
                &format!(
                    "  v{}: {} -> {} at {}",
                    t.version,
                    t.from_stage,
                    t.to_stage,
                    t.timestamp.format("%Y-%m-%d %H:%M:%S"),
                ),
            );
        }
    }

    Ok(())
}
