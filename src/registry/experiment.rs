//! Experiment metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named experiment grouping training runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experiment {
    /// Registry-assigned identifier
    pub id: String,
    /// Human-readable name (unique per registry)
    pub name: String,
    /// Root location for run artifacts
    pub artifact_location: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Experiment {
    /// Create experiment metadata with the given id.
    pub fn new(id: &str, name: &str, artifact_location: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            artifact_location: artifact_location.to_string(),
            created_at: Utc::now(),
        }
    }
}
