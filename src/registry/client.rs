//! Registry client trait definition

use std::collections::HashMap;

use super::error::Result;
use super::experiment::Experiment;
use super::stage::ModelStage;
use super::status::VersionStatus;
use super::version::ModelVersion;

/// Client surface of the model registry.
///
/// One handle is constructed by the caller and threaded through the
/// workflow as a parameter; nothing here touches process-global state.
/// All operations take `&mut self`: a client is a stateful session handle,
/// whether it fronts a remote service or an in-process registry.
pub trait RegistryClient {
    /// Fetch the readiness status of a model version.
    fn get_version_status(&mut self, name: &str, version: u32) -> Result<VersionStatus>;

    /// Move a model version to a new lifecycle stage.
    ///
    /// The registry rejects transitions for versions that are not `Ready`.
    fn transition_stage(&mut self, name: &str, version: u32, stage: ModelStage) -> Result<()>;

    /// Submit an artifact for registration under a model name.
    ///
    /// Returns the newly assigned version number.
    fn register_model(&mut self, artifact_uri: &str, name: &str) -> Result<u32>;

    /// Set the free-text description of a model version.
    fn update_description(&mut self, name: &str, version: u32, text: &str) -> Result<()>;

    /// List all versions registered under a model name.
    fn search_versions(&mut self, name: &str) -> Result<Vec<ModelVersion>>;

    /// Attach metrics to a model version.
    fn log_metrics(
        &mut self,
        name: &str,
        version: u32,
        metrics: HashMap<String, f64>,
    ) -> Result<()>;

    /// Create a named experiment, returning its id.
    fn create_experiment(&mut self, name: &str, artifact_location: &str) -> Result<String>;

    /// Look up an experiment by name. `Ok(None)` when absent.
    fn get_experiment_by_name(&mut self, name: &str) -> Result<Option<Experiment>>;
}
