//! Workflow Configuration
//!
//! Declarative YAML configuration for the train-register-promote workflow,
//! with serde defaults so an empty document yields a runnable setup.
//!
//! # Example
//!
//! ```
//! use promover::config::WorkflowConfig;
//!
//! let config = WorkflowConfig::default();
//! assert_eq!(config.experiment.name, "my-experiment");
//! assert_eq!(config.wait.max_attempts, 10);
//! assert!(config.validate().is_ok());
//! ```


use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::promote::WaitPolicy;
use crate::registry::ModelStage;

/// Errors from configuration loading and validation
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Complete workflow configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkflowConfig {
    /// Experiment and registry naming
    #[serde(default)]
    pub experiment: ExperimentConfig,

    /// Dataset synthesis and splitting
    #[serde(default)]
    pub data: DataConfig,

    /// Classifier hyperparameters
    #[serde(default)]
    pub model: ModelConfig,

    /// Readiness polling and target stages
    #[serde(default)]
    pub wait: WaitConfig,
}

/// Experiment and registry naming
///
/// The registry model name and the artifact directory are distinct
/// identifiers; neither is derived from the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperimentConfig {
    /// Experiment name in the registry
    #[serde(default = "default_experiment_name")]
    pub name: String,

    /// Registry model name the artifact is registered under
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Optional run name; generated from the start timestamp when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_name: Option<String>,

    /// User recorded in run tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Version description pushed to the registry
    #[serde(default = "default_description")]
    pub description: String,

    /// Artifact root; relative paths resolve under the home directory
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: PathBuf,

    /// Directory for finalized run records
    #[serde(default = "default_tracking_dir")]
    pub tracking_dir: PathBuf,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            name: default_experiment_name(),
            model_name: default_model_name(),
            run_name: None,
            user: None,
            description: default_description(),
            artifact_dir: default_artifact_dir(),
            tracking_dir: default_tracking_dir(),
        }
    }
}

/// Dataset synthesis and splitting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    /// Number of samples to synthesize
    #[serde(default = "default_n_samples")]
    pub n_samples: usize,

    /// Number of feature columns
    #[serde(default = "default_n_features")]
    pub n_features: usize,

    /// Fraction written to the held-out inference CSV
    #[serde(default = "default_fraction")]
    pub holdout_fraction: f32,

    /// Fraction of the remainder used for test accuracy
    #[serde(default = "default_fraction")]
    pub test_fraction: f32,

    /// Seed for synthesis, splits, and weight init
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Path of the held-out features CSV
    #[serde(default = "default_holdout_csv")]
    pub holdout_csv: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            n_samples: default_n_samples(),
            n_features: default_n_features(),
            holdout_fraction: default_fraction(),
            test_fraction: default_fraction(),
            seed: default_seed(),
            holdout_csv: default_holdout_csv(),
        }
    }
}

/// Classifier hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// SGD learning rate
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f32,

    /// Training epochs
    #[serde(default = "default_epochs")]
    pub epochs: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            learning_rate: default_learning_rate(),
            epochs: default_epochs(),
        }
    }
}

/// Readiness polling and target stages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaitConfig {
    /// Maximum status fetches per version
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Milliseconds between consecutive fetches
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Stage requested for the new version
    #[serde(default = "default_target_stage")]
    pub target_stage: ModelStage,

    /// Stage the predecessor version is parked at
    #[serde(default = "default_previous_stage")]
    pub previous_stage: ModelStage,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_ms: default_interval_ms(),
            target_stage: default_target_stage(),
            previous_stage: default_previous_stage(),
        }
    }
}

impl WaitConfig {
    /// Convert to the poller's policy type.
    #[must_use]
    pub fn policy(&self) -> WaitPolicy {
        WaitPolicy::new(self.max_attempts, Duration::from_millis(self.interval_ms))
    }
}

impl WorkflowConfig {
    /// Load a configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_yaml::from_str(&text)?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.experiment.name.is_empty() {
            return Err(ConfigError::Invalid("experiment.name is empty".to_string()));
        }
        if self.experiment.model_name.is_empty() {
            return Err(ConfigError::Invalid(
                "experiment.model_name is empty".to_string(),
            ));
        }
        if self.data.n_samples < 10 {
            return Err(ConfigError::Invalid(format!(
                "data.n_samples must be at least 10, got {}",
                self.data.n_samples
            )));
        }
        if self.data.n_features == 0 {
            return Err(ConfigError::Invalid("data.n_features is zero".to_string()));
        }
        for (field, value) in [
            ("data.holdout_fraction", self.data.holdout_fraction),
            ("data.test_fraction", self.data.test_fraction),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(ConfigError::Invalid(format!(
                    "{field} must be inside (0, 1), got {value}"
                )));
            }
        }
        if self.model.epochs == 0 {
            return Err(ConfigError::Invalid("model.epochs is zero".to_string()));
        }
        if self.wait.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "wait.max_attempts is zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_experiment_name() -> String {
    "my-experiment".to_string()
}

fn default_model_name() -> String {
    "clf-model".to_string()
}

fn default_description() -> String {
    "Logistic regression pipeline with standard scaling.".to_string()
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from("promover_artifacts")
}

fn default_tracking_dir() -> PathBuf {
    PathBuf::from("promover_runs")
}

fn default_n_samples() -> usize {
    569
}

fn default_n_features() -> usize {
    30
}

fn default_fraction() -> f32 {
    0.2
}

fn default_seed() -> u64 {
    123
}

fn default_holdout_csv() -> PathBuf {
    PathBuf::from("test.csv")
}

fn default_learning_rate() -> f32 {
    0.1
}

fn default_epochs() -> usize {
    100
}

fn default_max_attempts() -> u32 {
    10
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_target_stage() -> ModelStage {
    ModelStage::Staging
}

fn default_previous_stage() -> ModelStage {
    ModelStage::None
}
