//! Train, Register & Promote Workflow
//!
//! End-to-end orchestration: synthesize the dataset, fit the pipeline,
//! record the run, register the artifact, then promote the new version
//! once the registry reports it ready.
//!
//! Failures split into two tiers. Anything on the training/registration
//! path is fatal and propagates as [`WorkflowError`]. The readiness poll
//! for the *previous* version is best-effort: on a first-ever registration
//! there is no previous version and the lookup fails, which is logged and
//! suppressed so the poll for the just-created version still runs.
//!
//! # Example
//!
//! ```
//! use promover::config::WorkflowConfig;
//! use promover::registry::InMemoryRegistry;
//! use promover::tracking::storage::InMemoryBackend;
//! use promover::tracking::ExperimentTracker;
//! use promover::workflow::run_workflow;
//!
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let dir = tempfile::tempdir()?;
//! let mut config = WorkflowConfig::default();
//! config.data.n_samples = 60;
//! config.data.n_features = 4;
//! config.model.epochs = 10;
//! config.wait.interval_ms = 1;
//! config.experiment.artifact_dir = dir.path().join("artifacts");
//! config.data.holdout_csv = dir.path().join("test.csv");
//!
//! let mut registry = InMemoryRegistry::new();
//! let mut tracker = ExperimentTracker::new("my-experiment", InMemoryBackend::new());
//!
//! let report = run_workflow(&config, &mut registry, &mut tracker)?;
//! assert_eq!(report.version, 1);
//! assert!(report.current_outcome.is_promoted());
//! # Ok(())
//! # }
//! ```

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::Utc;
use thiserror::Error;

use crate::config::WorkflowConfig;
use crate::data::{train_test_split, write_features_csv, DataError, Dataset};
use crate::pipeline::{save_pipeline, Pipeline, PipelineError};
use crate::promote::{wait_and_transition, PromotionOutcome};
use crate::registry::{RegistryClient, RegistryError};
use crate::tracking::{ExperimentTracker, RunStatus, TrackingError};
use crate::tracking::storage::TrackingBackend;

/// Errors from the training/registration path. All fatal.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Tracking error: {0}")]
    Tracking(#[from] TrackingError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot resolve the home directory for the artifact root")]
    MissingHomeDir,
}

/// Result alias for workflow operations
pub type Result<T> = std::result::Result<T, WorkflowError>;

/// What one workflow execution did.
#[derive(Debug, Clone)]
pub struct WorkflowReport {
    /// Tracking run id
    pub run_id: String,
    /// Newly registered version
    pub version: u32,
    /// Accuracy on the training partition
    pub accuracy_train: f32,
    /// Accuracy on the test partition
    pub accuracy_test: f32,
    /// Path the fitted pipeline was written to
    pub artifact_path: PathBuf,
    /// Outcome of parking the previous version; `None` when its
    /// readiness poll failed (first-ever registration)
    pub previous_outcome: Option<PromotionOutcome>,
    /// Outcome of promoting the new version
    pub current_outcome: PromotionOutcome,
}

/// Execute the full train-register-promote workflow.
pub fn run_workflow<C, B>(
    config: &WorkflowConfig,
    client: &mut C,
    tracker: &mut ExperimentTracker<B>,
) -> Result<WorkflowReport>
where
    C: RegistryClient,
    B: TrackingBackend,
{
    let artifact_root = resolve_artifact_root(config)?;
    std::fs::create_dir_all(&artifact_root)?;

    let experiment = get_or_create_experiment(config, client, &artifact_root)?;
    println!(
        "Experiment {} ({}) is ready to use",
        experiment.name, experiment.id
    );

    // Hold out rows for later inference; their features go to a side CSV
    // without the target column.
    let dataset = Dataset::synthetic(config.data.n_samples, config.data.n_features, config.data.seed);
    let (working, holdout) =
        train_test_split(&dataset, config.data.holdout_fraction, config.data.seed)?;
    write_features_csv(&holdout, &config.data.holdout_csv)?;

    let (train, test) = train_test_split(
        &working,
        config.data.test_fraction,
        config.data.seed.wrapping_add(1),
    )?;

    let mut pipeline = Pipeline::new(
        config.model.learning_rate,
        config.model.epochs,
        config.data.seed,
    );
    pipeline.fit(train.features(), train.targets())?;

    let accuracy_train = pipeline.score(train.features(), train.targets())?;
    let accuracy_test = pipeline.score(test.features(), test.targets())?;

    let run_name = config
        .experiment
        .run_name
        .clone()
        .unwrap_or_else(|| format!("run-{}", Utc::now().timestamp()));

    let mut run = tracker.start_run(Some(&run_name));
    run.log_param("learning_rate", &config.model.learning_rate.to_string());
    run.log_param("epochs", &config.model.epochs.to_string());
    run.log_metric("accuracy_train", f64::from(accuracy_train));
    run.log_metric("accuracy_test", f64::from(accuracy_test));

    let artifact_path = artifact_root.join("pipeline.json");
    save_pipeline(&pipeline, &artifact_path)?;
    run.log_artifact(&artifact_path)?;

    let run_id = run.end(RunStatus::Completed)?;

    // The registry model name and the artifact path are distinct
    // identifiers; registration links them.
    let version = client.register_model(
        &artifact_path.display().to_string(),
        &config.experiment.model_name,
    )?;
    println!(
        "Registered {} version {} from run {}",
        config.experiment.model_name, version, run_id
    );

    client.update_description(
        &config.experiment.model_name,
        version,
        &config.experiment.description,
    )?;

    let mut metrics = HashMap::new();
    metrics.insert("accuracy_train".to_string(), f64::from(accuracy_train));
    metrics.insert("accuracy_test".to_string(), f64::from(accuracy_test));
    client.log_metrics(&config.experiment.model_name, version, metrics)?;

    let policy = config.wait.policy();

    // Park the previous version. On the first-ever registration there is
    // no previous version and the status lookup fails; that must not keep
    // the new version from being promoted.
    let previous_outcome = match wait_and_transition(
        client,
        &config.experiment.model_name,
        version.wrapping_sub(1),
        config.wait.previous_stage,
        &policy,
    ) {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            eprintln!("Previous version poll failed: {e}");
            None
        }
    };

    let current_outcome = wait_and_transition(
        client,
        &config.experiment.model_name,
        version,
        config.wait.target_stage,
        &policy,
    )?;

    if let PromotionOutcome::Exhausted { attempts } = current_outcome {
        eprintln!(
            "Version {} of {} was not ready after {} attempts; stage unchanged",
            version, config.experiment.model_name, attempts
        );
    }

    Ok(WorkflowReport {
        run_id,
        version,
        accuracy_train,
        accuracy_test,
        artifact_path,
        previous_outcome,
        current_outcome,
    })
}

/// Resolve the artifact root, anchoring relative paths under `$HOME`.
fn resolve_artifact_root(config: &WorkflowConfig) -> Result<PathBuf> {
    let dir = &config.experiment.artifact_dir;
    if dir.is_absolute() {
        return Ok(dir.clone());
    }
    let home = dirs::home_dir().ok_or(WorkflowError::MissingHomeDir)?;
    Ok(home.join(dir).join(&config.experiment.model_name))
}

/// Look up the experiment by name, creating it first when absent.
fn get_or_create_experiment<C: RegistryClient>(
    config: &WorkflowConfig,
    client: &mut C,
    artifact_root: &std::path::Path,
) -> Result<crate::registry::Experiment> {
    let name = &config.experiment.name;
    if let Some(experiment) = client.get_experiment_by_name(name)? {
        return Ok(experiment);
    }

    let location = artifact_root.join(name).display().to_string();
    client.create_experiment(name, &location)?;
    client
        .get_experiment_by_name(name)?
        .ok_or_else(|| RegistryError::ExperimentNotFound(name.clone()).into())
}
