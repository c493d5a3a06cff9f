//! Labeled Tabular Dataset
//!
//! A fixed, deterministic binary-classification dataset plus the split and
//! export helpers the training workflow needs: stratified train/test
//! splitting and CSV export of held-out feature rows for later inference.
//!
//! # Example
//!
//! ```
//! use promover::data::{train_test_split, Dataset};
//!
//! # fn main() -> std::result::Result<(), promover::data::DataError> {
//! let dataset = Dataset::synthetic(200, 8, 42);
//! let (train, test) = train_test_split(&dataset, 0.2, 42)?;
//! assert_eq!(train.len() + test.len(), dataset.len());
//! # Ok(())
//! # }
//! ```


use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Errors from dataset construction and manipulation
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Dataset is empty")]
    Empty,

    #[error("Row {row} has {got} features, expected {expected}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("Feature count mismatch: {names} names for {width} columns")]
    HeaderMismatch { names: usize, width: usize },

    #[error("Targets length {targets} does not match {rows} rows")]
    TargetMismatch { targets: usize, rows: usize },

    #[error("Test fraction {0} outside (0, 1)")]
    InvalidFraction(f32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for dataset operations
pub type Result<T> = std::result::Result<T, DataError>;

/// In-memory labeled tabular dataset with binary targets.
#[derive(Debug, Clone)]
pub struct Dataset {
    feature_names: Vec<String>,
    features: Vec<Vec<f32>>,
    targets: Vec<u8>,
}

impl Dataset {
    /// Build a dataset from rows, validating shape consistency.
    pub fn new(
        feature_names: Vec<String>,
        features: Vec<Vec<f32>>,
        targets: Vec<u8>,
    ) -> Result<Self> {
        if features.is_empty() {
            return Err(DataError::Empty);
        }
        let width = feature_names.len();
        for (row, values) in features.iter().enumerate() {
            if values.len() != width {
                return Err(DataError::DimensionMismatch {
                    row,
                    expected: width,
                    got: values.len(),
                });
            }
        }
        if targets.len() != features.len() {
            return Err(DataError::TargetMismatch {
                targets: targets.len(),
                rows: features.len(),
            });
        }
        Ok(Self {
            feature_names,
            features,
            targets,
        })
    }

    /// Deterministic two-cluster classification dataset.
    ///
    /// Samples alternate between class 0 and class 1; features are drawn
    /// from per-class Gaussians (mean 0 and 2, unit variance) so the
    /// classes are linearly separable to a useful degree. The same seed
    /// always produces the same dataset.
    pub fn synthetic(n_samples: usize, n_features: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let feature_names = (0..n_features).map(|i| format!("feature_{i}")).collect();
        let mut features = Vec::with_capacity(n_samples);
        let mut targets = Vec::with_capacity(n_samples);

        for i in 0..n_samples {
            let class = (i % 2) as u8;
            let mean = f64::from(class) * 2.0;
            let row = (0..n_features)
                .map(|_| (mean + gaussian(&mut rng)) as f32)
                .collect();
            features.push(row);
            targets.push(class);
        }

        Self {
            feature_names,
            features,
            targets,
        }
    }

    /// Number of samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True if the dataset has no samples
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Number of feature columns
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Feature column names
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Feature rows
    #[must_use]
    pub fn features(&self) -> &[Vec<f32>] {
        &self.features
    }

    /// Binary targets, aligned with `features()`
    #[must_use]
    pub fn targets(&self) -> &[u8] {
        &self.targets
    }

    fn subset(&self, indices: &[usize]) -> Self {
        Self {
            feature_names: self.feature_names.clone(),
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            targets: indices.iter().map(|&i| self.targets[i]).collect(),
        }
    }
}

/// Standard normal draw via Box-Muller.
fn gaussian<R: Rng>(rng: &mut R) -> f64 {
    let u1: f64 = rng.random::<f64>().max(1e-10);
    let u2: f64 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Split into train and test partitions, stratified by class.
///
/// Each class contributes `test_fraction` of its samples (rounded down) to
/// the test partition, so class balance is preserved on both sides. The
/// shuffle is seeded and reproducible.
pub fn train_test_split(dataset: &Dataset, test_fraction: f32, seed: u64) -> Result<(Dataset, Dataset)> {
    if dataset.is_empty() {
        return Err(DataError::Empty);
    }
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(DataError::InvalidFraction(test_fraction));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train_indices = Vec::new();
    let mut test_indices = Vec::new();

    for class in [0u8, 1] {
        let mut indices: Vec<usize> = (0..dataset.len())
            .filter(|&i| dataset.targets[i] == class)
            .collect();
        indices.shuffle(&mut rng);

        let n_test = (indices.len() as f32 * test_fraction).floor() as usize;
        test_indices.extend_from_slice(&indices[..n_test]);
        train_indices.extend_from_slice(&indices[n_test..]);
    }

    train_indices.sort_unstable();
    test_indices.sort_unstable();

    Ok((dataset.subset(&train_indices), dataset.subset(&test_indices)))
}

/// Write feature rows (header + values, no target column) as CSV.
pub fn write_features_csv(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", dataset.feature_names.join(","))?;
    for row in &dataset.features {
        let line: Vec<String> = row.iter().map(ToString::to_string).collect();
        writeln!(writer, "{}", line.join(","))?;
    }

    writer.flush()?;
    Ok(())
}
