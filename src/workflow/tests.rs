//! Tests for the end-to-end workflow

use std::path::Path;

use super::*;
use crate::registry::{InMemoryRegistry, ModelStage, VersionStatus};
use crate::tracking::storage::InMemoryBackend;

fn test_config(dir: &Path) -> WorkflowConfig {
    let mut config = WorkflowConfig::default();
    config.data.n_samples = 80;
    config.data.n_features = 4;
    config.model.epochs = 20;
    config.wait.interval_ms = 1;
    config.experiment.artifact_dir = dir.join("artifacts");
    config.data.holdout_csv = dir.join("test.csv");
    config
}

fn test_tracker() -> ExperimentTracker<InMemoryBackend> {
    ExperimentTracker::new("my-experiment", InMemoryBackend::new())
}

// ---------------------------------------------------------------------------
// First-ever registration
// ---------------------------------------------------------------------------

#[test]
fn test_first_run_promotes_and_swallows_previous_poll() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let mut registry = InMemoryRegistry::new();
    let mut tracker = test_tracker();

    let report = run_workflow(&config, &mut registry, &mut tracker).unwrap();

    assert_eq!(report.version, 1);
    // Version 0 does not exist; the failed lookup must not abort the run.
    assert!(report.previous_outcome.is_none());
    assert!(report.current_outcome.is_promoted());

    let versions = registry.search_versions("clf-model").unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].stage, ModelStage::Staging);
}

#[test]
fn test_first_run_registers_description_and_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let mut registry = InMemoryRegistry::new();
    let mut tracker = test_tracker();

    run_workflow(&config, &mut registry, &mut tracker).unwrap();

    let versions = registry.search_versions("clf-model").unwrap();
    assert_eq!(
        versions[0].description.as_deref(),
        Some("Logistic regression pipeline with standard scaling.")
    );
    assert!(versions[0].metrics.contains_key("accuracy_train"));
    assert!(versions[0].metrics.contains_key("accuracy_test"));
}

#[test]
fn test_run_is_tracked_with_metrics_and_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let mut registry = InMemoryRegistry::new();
    let mut tracker = test_tracker();

    let report = run_workflow(&config, &mut registry, &mut tracker).unwrap();

    let run = tracker.get_run(&report.run_id).unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    assert!(run.metrics.contains_key("accuracy_train"));
    assert!(run.metrics.contains_key("accuracy_test"));
    assert_eq!(run.artifacts.len(), 1);
    assert!(run.artifacts[0].checksum.starts_with("sha256-"));
    assert!(report.artifact_path.exists());
}

#[test]
fn test_holdout_csv_written_without_target() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let mut registry = InMemoryRegistry::new();
    let mut tracker = test_tracker();

    run_workflow(&config, &mut registry, &mut tracker).unwrap();

    let content = std::fs::read_to_string(dir.path().join("test.csv")).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    // 20% of 80 samples, stratified: 8 per class, plus the header.
    assert_eq!(lines.len(), 17);
    assert!(!lines[0].contains("target"));
}

#[test]
fn test_experiment_created_when_absent() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let mut registry = InMemoryRegistry::new();
    let mut tracker = test_tracker();

    assert!(registry
        .get_experiment_by_name("my-experiment")
        .unwrap()
        .is_none());

    run_workflow(&config, &mut registry, &mut tracker).unwrap();

    let experiment = registry
        .get_experiment_by_name("my-experiment")
        .unwrap()
        .expect("experiment should exist after the run");
    assert!(experiment.artifact_location.contains("my-experiment"));
}

#[test]
fn test_training_is_reproducible() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();

    let report_a = run_workflow(
        &test_config(dir_a.path()),
        &mut InMemoryRegistry::new(),
        &mut test_tracker(),
    )
    .unwrap();
    let report_b = run_workflow(
        &test_config(dir_b.path()),
        &mut InMemoryRegistry::new(),
        &mut test_tracker(),
    )
    .unwrap();

    assert_eq!(report_a.accuracy_train, report_b.accuracy_train);
    assert_eq!(report_a.accuracy_test, report_b.accuracy_test);
}

// ---------------------------------------------------------------------------
// Subsequent registrations
// ---------------------------------------------------------------------------

#[test]
fn test_second_run_parks_previous_version() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let mut registry = InMemoryRegistry::new();
    let mut tracker = test_tracker();

    run_workflow(&config, &mut registry, &mut tracker).unwrap();
    let report = run_workflow(&config, &mut registry, &mut tracker).unwrap();

    assert_eq!(report.version, 2);
    assert_eq!(report.previous_outcome, Some(PromotionOutcome::Promoted { attempts: 1 }));
    assert!(report.current_outcome.is_promoted());

    let versions = registry.search_versions("clf-model").unwrap();
    assert_eq!(versions[0].stage, ModelStage::None);
    assert_eq!(versions[1].stage, ModelStage::Staging);
}

#[test]
fn test_second_run_reuses_experiment() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let mut registry = InMemoryRegistry::new();
    let mut tracker = test_tracker();

    run_workflow(&config, &mut registry, &mut tracker).unwrap();
    let first = registry
        .get_experiment_by_name("my-experiment")
        .unwrap()
        .unwrap();

    run_workflow(&config, &mut registry, &mut tracker).unwrap();
    let second = registry
        .get_experiment_by_name("my-experiment")
        .unwrap()
        .unwrap();

    assert_eq!(first.id, second.id);
}

// ---------------------------------------------------------------------------
// Delayed readiness and exhaustion
// ---------------------------------------------------------------------------

#[test]
fn test_delayed_readiness_polls_until_ready() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let mut registry = InMemoryRegistry::new().ready_after(2);
    let mut tracker = test_tracker();

    let report = run_workflow(&config, &mut registry, &mut tracker).unwrap();

    assert_eq!(
        report.current_outcome,
        PromotionOutcome::Promoted { attempts: 3 }
    );
    let versions = registry.search_versions("clf-model").unwrap();
    assert_eq!(versions[0].stage, ModelStage::Staging);
}

#[test]
fn test_exhaustion_leaves_stage_unchanged_without_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    // Readiness arrives only after more polls than the budget allows.
    let mut registry = InMemoryRegistry::new().ready_after(30);
    let mut tracker = test_tracker();

    let report = run_workflow(&config, &mut registry, &mut tracker).unwrap();

    assert_eq!(
        report.current_outcome,
        PromotionOutcome::Exhausted { attempts: 10 }
    );
    let versions = registry.search_versions("clf-model").unwrap();
    assert_eq!(versions[0].stage, ModelStage::None);
    assert!(registry.transition_history("clf-model").is_empty());
}

#[test]
fn test_failed_registration_exhausts_without_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let mut registry = InMemoryRegistry::new().fail_registrations();
    let mut tracker = test_tracker();

    let report = run_workflow(&config, &mut registry, &mut tracker).unwrap();

    assert!(!report.current_outcome.is_promoted());
    let versions = registry.search_versions("clf-model").unwrap();
    assert_eq!(versions[0].status, VersionStatus::FailedRegistration);
    assert_eq!(versions[0].stage, ModelStage::None);
}

// ---------------------------------------------------------------------------
// Fatal path
// ---------------------------------------------------------------------------

#[test]
fn test_unwritable_holdout_path_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.data.holdout_csv = dir.path().join("missing-dir").join("test.csv");
    let mut registry = InMemoryRegistry::new();
    let mut tracker = test_tracker();

    let err = run_workflow(&config, &mut registry, &mut tracker).unwrap_err();
    assert!(matches!(err, WorkflowError::Data(_)));
}
