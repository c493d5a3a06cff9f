//! Model version metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::stage::ModelStage;
use super::status::VersionStatus;

/// Model version metadata
///
/// Identified by (registry name, version number). Created by a registration
/// call, mutated by stage transitions, metric logging, and description
/// updates. Never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelVersion {
    /// Model name
    pub name: String,
    /// Version number (monotonically increasing)
    pub version: u32,
    /// Current stage
    pub stage: ModelStage,
    /// Artifact readiness
    pub status: VersionStatus,
    /// URI to model artifacts
    pub artifact_uri: String,
    /// Performance metrics
    pub metrics: HashMap<String, f64>,
    /// Description
    pub description: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last promotion timestamp
    pub promoted_at: Option<DateTime<Utc>>,
}

impl ModelVersion {
    /// Create a new model version, pending registration.
    pub fn new(name: &str, version: u32, artifact_uri: &str) -> Self {
        Self {
            name: name.to_string(),
            version,
            stage: ModelStage::None,
            status: VersionStatus::PendingRegistration,
            artifact_uri: artifact_uri.to_string(),
            metrics: HashMap::new(),
            description: None,
            created_at: Utc::now(),
            promoted_at: None,
        }
    }

    /// Add a metric
    pub fn with_metric(mut self, name: &str, value: f64) -> Self {
        self.metrics.insert(name.to_string(), value);
        self
    }

    /// Set description
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Set status
    pub fn with_status(mut self, status: VersionStatus) -> Self {
        self.status = status;
        self
    }
}
