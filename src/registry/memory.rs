//! In-memory model registry implementation

use chrono::Utc;
use std::collections::HashMap;

use super::client::RegistryClient;
use super::error::{RegistryError, Result};
use super::experiment::Experiment;
use super::stage::ModelStage;
use super::status::VersionStatus;
use super::transition::StageTransition;
use super::version::ModelVersion;

/// Process-local registry used by tests and the CLI.
///
/// Registration latency is configurable: with [`ready_after`], the first
/// `n` status fetches for a fresh version report `PENDING_REGISTRATION`
/// before the version flips to `READY`, mirroring a registry that
/// materializes artifacts asynchronously.
///
/// [`ready_after`]: InMemoryRegistry::ready_after
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    /// Models by name -> version -> ModelVersion
    models: HashMap<String, HashMap<u32, ModelVersion>>,
    /// Experiments by name
    experiments: HashMap<String, Experiment>,
    /// Stage transition history
    transitions: Vec<StageTransition>,
    /// Pending status polls remaining per (name, version)
    pending_polls: HashMap<(String, u32), u32>,
    /// Pending polls assigned to each new registration
    registration_delay: u32,
    /// Force new registrations to fail permanently
    fail_registrations: bool,
    next_experiment_id: u64,
}

impl InMemoryRegistry {
    /// Create a new in-memory registry. Versions are ready immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `PENDING_REGISTRATION` for the first `polls` status fetches
    /// of every subsequently registered version.
    #[must_use]
    pub fn ready_after(mut self, polls: u32) -> Self {
        self.registration_delay = polls;
        self
    }

    /// Mark every subsequently registered version `FAILED_REGISTRATION`.
    #[must_use]
    pub fn fail_registrations(mut self) -> Self {
        self.fail_registrations = true;
        self
    }

    /// Transition history for a model, oldest first.
    pub fn transition_history(&self, name: &str) -> Vec<&StageTransition> {
        self.transitions
            .iter()
            .filter(|t| t.model_name == name)
            .collect()
    }

    /// Get next version number for a model
    fn next_version(&self, name: &str) -> u32 {
        self.models.get(name).map_or(1, |versions| {
            versions.keys().max().copied().unwrap_or(0) + 1
        })
    }

    fn version_mut(&mut self, name: &str, version: u32) -> Result<&mut ModelVersion> {
        self.models
            .get_mut(name)
            .and_then(|versions| versions.get_mut(&version))
            .ok_or_else(|| RegistryError::VersionNotFound(name.to_string(), version))
    }
}

impl RegistryClient for InMemoryRegistry {
    fn get_version_status(&mut self, name: &str, version: u32) -> Result<VersionStatus> {
        let key = (name.to_string(), version);
        if let Some(remaining) = self.pending_polls.get_mut(&key) {
            if *remaining > 0 {
                *remaining -= 1;
                return Ok(VersionStatus::PendingRegistration);
            }
            self.pending_polls.remove(&key);
        }

        let model = self.version_mut(name, version)?;
        if model.status == VersionStatus::PendingRegistration {
            model.status = VersionStatus::Ready;
        }
        Ok(model.status)
    }

    fn transition_stage(&mut self, name: &str, version: u32, stage: ModelStage) -> Result<()> {
        let model = self.version_mut(name, version)?;

        // Transitions require a materialized artifact.
        if !model.status.is_ready() {
            return Err(RegistryError::NotReady(name.to_string(), version));
        }

        let from_stage = model.stage;
        model.stage = stage;
        model.promoted_at = Some(Utc::now());

        self.transitions.push(StageTransition {
            model_name: name.to_string(),
            version,
            from_stage,
            to_stage: stage,
            timestamp: Utc::now(),
        });

        Ok(())
    }

    fn register_model(&mut self, artifact_uri: &str, name: &str) -> Result<u32> {
        let version = self.next_version(name);
        let mut model = ModelVersion::new(name, version, artifact_uri);

        if self.fail_registrations {
            model.status = VersionStatus::FailedRegistration;
        } else if self.registration_delay == 0 {
            model.status = VersionStatus::Ready;
        } else {
            self.pending_polls
                .insert((name.to_string(), version), self.registration_delay);
        }

        self.models
            .entry(name.to_string())
            .or_default()
            .insert(version, model);

        Ok(version)
    }

    fn update_description(&mut self, name: &str, version: u32, text: &str) -> Result<()> {
        let model = self.version_mut(name, version)?;
        model.description = Some(text.to_string());
        Ok(())
    }

    fn search_versions(&mut self, name: &str) -> Result<Vec<ModelVersion>> {
        self.models
            .get(name)
            .map(|versions| {
                let mut v: Vec<_> = versions.values().cloned().collect();
                v.sort_by_key(|m| m.version);
                v
            })
            .ok_or_else(|| RegistryError::ModelNotFound(name.to_string()))
    }

    fn log_metrics(
        &mut self,
        name: &str,
        version: u32,
        metrics: HashMap<String, f64>,
    ) -> Result<()> {
        let model = self.version_mut(name, version)?;
        model.metrics.extend(metrics);
        Ok(())
    }

    fn create_experiment(&mut self, name: &str, artifact_location: &str) -> Result<String> {
        if self.experiments.contains_key(name) {
            return Err(RegistryError::ExperimentExists(name.to_string()));
        }

        self.next_experiment_id += 1;
        let id = format!("exp-{}", self.next_experiment_id);
        self.experiments
            .insert(name.to_string(), Experiment::new(&id, name, artifact_location));

        Ok(id)
    }

    fn get_experiment_by_name(&mut self, name: &str) -> Result<Option<Experiment>> {
        Ok(self.experiments.get(name).cloned())
    }
}
