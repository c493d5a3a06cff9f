//! Classifier Pipeline
//!
//! Two-stage pipeline: a feature scaler followed by a logistic-regression
//! classifier, fit and invoked as a single unit. The fitted pipeline
//! serializes to JSON for artifact logging and later inference.
//!
//! Probability post-processing is an explicit adapter type
//! ([`ProbabilityAdapter`]) composing predict-probability with rounding,
//! not a mutation of the fitted model's behavior.
//!
//! # Example
//!
//! ```
//! use promover::data::Dataset;
//! use promover::pipeline::Pipeline;
//!
//! # fn main() -> std::result::Result<(), promover::pipeline::PipelineError> {
//! let dataset = Dataset::synthetic(200, 4, 42);
//! let mut pipeline = Pipeline::new(0.1, 50, 42);
//! pipeline.fit(dataset.features(), dataset.targets())?;
//!
//! let accuracy = pipeline.score(dataset.features(), dataset.targets())?;
//! assert!(accuracy > 0.8);
//! # Ok(())
//! # }
//! ```


use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from pipeline fitting and inference
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Pipeline is not fitted")]
    NotFitted,

    #[error("Input is empty")]
    EmptyInput,

    #[error("Input has {got} features, expected {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Labels length {labels} does not match {rows} rows")]
    LabelMismatch { labels: usize, rows: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Per-column standardization: `(x - mean) / std`.
///
/// Columns with (near-)zero variance pass through unscaled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f32>,
    stds: Vec<f32>,
}

impl StandardScaler {
    /// Create an unfitted scaler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn per-column mean and standard deviation.
    pub fn fit(&mut self, x: &[Vec<f32>]) -> Result<()> {
        let n_rows = x.len();
        if n_rows == 0 {
            return Err(PipelineError::EmptyInput);
        }
        let n_cols = x[0].len();
        check_width(x, n_cols)?;

        let mut means = vec![0.0f32; n_cols];
        for row in x {
            for (m, v) in means.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in &mut means {
            *m /= n_rows as f32;
        }

        let mut stds = vec![0.0f32; n_cols];
        for row in x {
            for ((s, v), m) in stds.iter_mut().zip(row).zip(&means) {
                let d = v - m;
                *s += d * d;
            }
        }
        for s in &mut stds {
            *s = (*s / n_rows as f32).sqrt();
            if *s < f32::EPSILON {
                *s = 1.0;
            }
        }

        self.means = means;
        self.stds = stds;
        Ok(())
    }

    /// Standardize rows with the learned statistics.
    pub fn transform(&self, x: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
        if self.means.is_empty() {
            return Err(PipelineError::NotFitted);
        }
        check_width(x, self.means.len())?;

        Ok(x.iter()
            .map(|row| {
                row.iter()
                    .zip(&self.means)
                    .zip(&self.stds)
                    .map(|((v, m), s)| (v - m) / s)
                    .collect()
            })
            .collect())
    }
}

/// Binary logistic regression trained with seeded SGD.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    weights: Vec<f32>,
    bias: f32,
    learning_rate: f32,
    epochs: usize,
    seed: u64,
}

impl LogisticRegression {
    /// Create an unfitted classifier.
    pub fn new(learning_rate: f32, epochs: usize, seed: u64) -> Self {
        Self {
            weights: Vec::new(),
            bias: 0.0,
            learning_rate,
            epochs,
            seed,
        }
    }

    /// Fit weights with per-sample gradient descent.
    pub fn fit(&mut self, x: &[Vec<f32>], y: &[u8]) -> Result<()> {
        if x.is_empty() {
            return Err(PipelineError::EmptyInput);
        }
        if y.len() != x.len() {
            return Err(PipelineError::LabelMismatch {
                labels: y.len(),
                rows: x.len(),
            });
        }
        let n_cols = x[0].len();
        check_width(x, n_cols)?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        self.weights = (0..n_cols)
            .map(|_| (rng.random::<f32>() - 0.5) * 0.01)
            .collect();
        self.bias = 0.0;

        for _ in 0..self.epochs {
            for (row, &target) in x.iter().zip(y) {
                let p = sigmoid(self.decision(row));
                let grad = p - f32::from(target);
                for (w, v) in self.weights.iter_mut().zip(row) {
                    *w -= self.learning_rate * grad * v;
                }
                self.bias -= self.learning_rate * grad;
            }
        }

        Ok(())
    }

    /// Positive-class probability per row.
    pub fn predict_proba(&self, x: &[Vec<f32>]) -> Result<Vec<f32>> {
        if self.weights.is_empty() {
            return Err(PipelineError::NotFitted);
        }
        check_width(x, self.weights.len())?;

        Ok(x.iter().map(|row| sigmoid(self.decision(row))).collect())
    }

    fn decision(&self, row: &[f32]) -> f32 {
        self.weights
            .iter()
            .zip(row)
            .map(|(w, v)| w * v)
            .sum::<f32>()
            + self.bias
    }
}

fn sigmoid(z: f32) -> f32 {
    1.0 / (1.0 + (-z.clamp(-30.0, 30.0)).exp())
}

fn check_width(x: &[Vec<f32>], expected: usize) -> Result<()> {
    for row in x {
        if row.len() != expected {
            return Err(PipelineError::DimensionMismatch {
                expected,
                got: row.len(),
            });
        }
    }
    Ok(())
}

/// Scaler + classifier, fit and invoked as a single unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    scaler: StandardScaler,
    classifier: LogisticRegression,
    fitted: bool,
}

impl Pipeline {
    /// Create an unfitted pipeline with classifier hyperparameters.
    pub fn new(learning_rate: f32, epochs: usize, seed: u64) -> Self {
        Self {
            scaler: StandardScaler::new(),
            classifier: LogisticRegression::new(learning_rate, epochs, seed),
            fitted: false,
        }
    }

    /// Fit the scaler on `x`, then the classifier on scaled `x`.
    pub fn fit(&mut self, x: &[Vec<f32>], y: &[u8]) -> Result<()> {
        self.scaler.fit(x)?;
        let scaled = self.scaler.transform(x)?;
        self.classifier.fit(&scaled, y)?;
        self.fitted = true;
        Ok(())
    }

    /// True once `fit` has succeeded.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    /// Positive-class probability per row.
    pub fn predict_proba(&self, x: &[Vec<f32>]) -> Result<Vec<f32>> {
        if !self.fitted {
            return Err(PipelineError::NotFitted);
        }
        let scaled = self.scaler.transform(x)?;
        self.classifier.predict_proba(&scaled)
    }

    /// Hard labels at a 0.5 threshold.
    pub fn predict(&self, x: &[Vec<f32>]) -> Result<Vec<u8>> {
        Ok(self
            .predict_proba(x)?
            .into_iter()
            .map(|p| u8::from(p >= 0.5))
            .collect())
    }

    /// Accuracy of hard predictions against `y`.
    pub fn score(&self, x: &[Vec<f32>], y: &[u8]) -> Result<f32> {
        if y.len() != x.len() {
            return Err(PipelineError::LabelMismatch {
                labels: y.len(),
                rows: x.len(),
            });
        }
        if y.is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let predictions = self.predict(x)?;
        let correct = predictions
            .iter()
            .zip(y)
            .filter(|(pred, target)| pred == target)
            .count();

        Ok(correct as f32 / y.len() as f32)
    }
}

/// Rounded positive-class probabilities from a fitted pipeline.
///
/// The inference surface wants probabilities, not hard labels, rounded to
/// four decimals. This wraps the pipeline instead of overwriting its
/// prediction method.
#[derive(Debug)]
pub struct ProbabilityAdapter<'a> {
    pipeline: &'a Pipeline,
}

impl<'a> ProbabilityAdapter<'a> {
    /// Wrap a fitted pipeline.
    pub fn new(pipeline: &'a Pipeline) -> Self {
        Self { pipeline }
    }

    /// Positive-class probabilities rounded to 4 decimal places.
    pub fn predict(&self, x: &[Vec<f32>]) -> Result<Vec<f32>> {
        Ok(self
            .pipeline
            .predict_proba(x)?
            .into_iter()
            .map(|p| (p * 10_000.0).round() / 10_000.0)
            .collect())
    }
}

/// Save a fitted pipeline as pretty-printed JSON.
pub fn save_pipeline(pipeline: &Pipeline, path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(pipeline)?;
    std::fs::write(path.as_ref(), json)?;
    Ok(())
}

/// Load a pipeline previously written by [`save_pipeline`].
pub fn load_pipeline(path: impl AsRef<Path>) -> Result<Pipeline> {
    let json = std::fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&json)?)
}
