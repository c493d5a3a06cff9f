//! Experiment Tracking
//!
//! Records one [`Run`] per training execution: metrics, parameters, and
//! artifact references with content checksums. Backed by pluggable storage
//! via the [`TrackingBackend`](storage::TrackingBackend) trait.
//!
//! A run is opened with [`ExperimentTracker::start_run`], which returns a
//! scoped [`RunHandle`]. The handle finalizes the run exactly once: either
//! explicitly through [`RunHandle::end`], or as `Completed` when it goes
//! out of scope.
//!
//! # Example
//!
//! ```
//! use promover::tracking::{ExperimentTracker, RunStatus};
//! use promover::tracking::storage::InMemoryBackend;
//!
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let mut tracker = ExperimentTracker::new("my-experiment", InMemoryBackend::new());
//! tracker.add_tag("env", "stg");
//!
//! let mut run = tracker.start_run(Some("baseline-v1"));
//! run.log_param("lr", "0.1");
//! run.log_metric("accuracy_test", 0.94);
//! let run_id = run.end(RunStatus::Completed)?;
//!
//! let run = tracker.get_run(&run_id)?;
//! assert_eq!(run.metrics.get("accuracy_test"), Some(&0.94));
//! # Ok(())
//! # }
//! ```

pub mod storage;


use std::collections::HashMap;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use storage::{TrackingBackend, TrackingStorageError};

/// Status of a tracking run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Run is actively recording
    Active,
    /// Run completed successfully
    Completed,
    /// Run failed
    Failed,
}

/// Reference to an artifact logged under a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    /// Path the artifact was written to
    pub path: String,
    /// Content checksum, `sha256-<hex>`
    pub checksum: String,
}

/// A single experiment run
///
/// Holds named floating-point metrics (last write per key wins),
/// string-encoded parameters, artifact references, and tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    /// Unique identifier for the run
    pub run_id: String,
    /// Optional human-readable name
    pub run_name: Option<String>,
    /// Parent experiment name
    pub experiment_name: String,
    /// Current status
    pub status: RunStatus,
    /// Hyperparameters: key -> value (string-encoded)
    pub params: HashMap<String, String>,
    /// Metrics: key -> value
    pub metrics: HashMap<String, f64>,
    /// Logged artifacts
    pub artifacts: Vec<ArtifactRecord>,
    /// Tags: key -> value
    pub tags: HashMap<String, String>,
    /// Unix timestamp (ms) when the run started
    pub start_time_ms: Option<u64>,
    /// Unix timestamp (ms) when the run ended
    pub end_time_ms: Option<u64>,
}

impl Run {
    fn new(run_id: String, run_name: Option<String>, experiment_name: String) -> Self {
        Self {
            run_id,
            run_name,
            experiment_name,
            status: RunStatus::Active,
            params: HashMap::new(),
            metrics: HashMap::new(),
            artifacts: Vec::new(),
            tags: HashMap::new(),
            start_time_ms: Some(now_ms()),
            end_time_ms: None,
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Errors from experiment tracking operations
#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Artifact unreadable: {path}: {source}")]
    ArtifactUnreadable {
        path: String,
        source: std::io::Error,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] TrackingStorageError),
}

/// Result alias for tracking operations
pub type Result<T> = std::result::Result<T, TrackingError>;

/// Experiment tracker
///
/// Opens runs under a single experiment name and persists finalized runs
/// through a pluggable [`TrackingBackend`].
#[derive(Debug)]
pub struct ExperimentTracker<B: TrackingBackend> {
    experiment_name: String,
    tags: HashMap<String, String>,
    backend: B,
    next_run_id: u64,
}

impl<B: TrackingBackend> ExperimentTracker<B> {
    /// Create a new tracker for the given experiment name
    pub fn new(experiment_name: impl Into<String>, backend: B) -> Self {
        Self {
            experiment_name: experiment_name.into(),
            tags: HashMap::new(),
            backend,
            next_run_id: 1,
        }
    }

    /// Add an experiment-level tag, inherited by every subsequent run
    pub fn add_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(key.into(), value.into());
    }

    /// Get the experiment name
    #[must_use]
    pub fn experiment_name(&self) -> &str {
        &self.experiment_name
    }

    /// Start a new run, optionally with a human-readable name.
    ///
    /// The returned handle borrows the tracker; the run is persisted when
    /// the handle is ended or dropped.
    pub fn start_run(&mut self, run_name: Option<&str>) -> RunHandle<'_, B> {
        let run_id = format!("run-{}", self.next_run_id);
        self.next_run_id += 1;

        let mut run = Run::new(
            run_id,
            run_name.map(String::from),
            self.experiment_name.clone(),
        );
        for (k, v) in &self.tags {
            run.tags.insert(k.clone(), v.clone());
        }

        RunHandle {
            tracker: self,
            run: Some(run),
        }
    }

    /// Retrieve a finalized run by ID
    pub fn get_run(&self, run_id: &str) -> Result<Run> {
        self.backend
            .load_run(run_id)
            .map_err(|e| TrackingError::RunNotFound(format!("{run_id}: {e}")))
    }

    /// List all finalized runs
    pub fn list_runs(&self) -> Result<Vec<Run>> {
        Ok(self.backend.list_runs()?)
    }

    fn finalize(&mut self, mut run: Run, status: RunStatus) -> Result<()> {
        run.status = status;
        run.end_time_ms = Some(now_ms());
        self.backend.save_run(&run)?;
        Ok(())
    }
}

/// Scoped handle to an active run.
///
/// Dropping the handle finalizes the run as `Completed`; [`RunHandle::end`]
/// finalizes with an explicit status and surfaces storage errors.
#[derive(Debug)]
pub struct RunHandle<'a, B: TrackingBackend> {
    tracker: &'a mut ExperimentTracker<B>,
    run: Option<Run>,
}

impl<B: TrackingBackend> RunHandle<'_, B> {
    /// The run's identifier
    #[must_use]
    pub fn run_id(&self) -> &str {
        // Present until finalization, which consumes the handle.
        self.run.as_ref().map_or("", |r| r.run_id.as_str())
    }

    /// Log a single parameter (hyperparameter)
    pub fn log_param(&mut self, key: &str, value: &str) {
        if let Some(run) = self.run.as_mut() {
            run.params.insert(key.to_string(), value.to_string());
        }
    }

    /// Log a metric value. Logging the same key again overwrites it.
    pub fn log_metric(&mut self, key: &str, value: f64) {
        if let Some(run) = self.run.as_mut() {
            run.metrics.insert(key.to_string(), value);
        }
    }

    /// Log an artifact by path, recording a sha256 checksum of its content.
    pub fn log_artifact(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| TrackingError::ArtifactUnreadable {
            path: path.display().to_string(),
            source,
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&data);
        let checksum = format!("sha256-{:x}", hasher.finalize());

        if let Some(run) = self.run.as_mut() {
            run.artifacts.push(ArtifactRecord {
                path: path.display().to_string(),
                checksum,
            });
        }
        Ok(())
    }

    /// Finalize the run with an explicit status, returning its ID.
    pub fn end(mut self, status: RunStatus) -> Result<String> {
        let Some(run) = self.run.take() else {
            return Err(TrackingError::RunNotFound("already finalized".to_string()));
        };
        let run_id = run.run_id.clone();
        self.tracker.finalize(run, status)?;
        Ok(run_id)
    }
}

impl<B: TrackingBackend> Drop for RunHandle<'_, B> {
    fn drop(&mut self) {
        if let Some(run) = self.run.take() {
            // Persistence failures cannot surface from a destructor.
            let _ = self.tracker.finalize(run, RunStatus::Completed);
        }
    }
}
