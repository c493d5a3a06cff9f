//! Model Registry Client Surface
//!
//! Data model and client trait for a registry that tracks named models,
//! their numbered versions, readiness status, and lifecycle stage.
//!
//! The registry itself is an external service; this module defines the
//! client-side contract ([`RegistryClient`]) consumed by the promotion
//! workflow, plus [`InMemoryRegistry`], a process-local implementation used
//! by tests and the CLI.
//!
//! # Example
//!
//! ```
//! use promover::registry::{InMemoryRegistry, ModelStage, RegistryClient, VersionStatus};
//!
//! # fn main() -> promover::registry::Result<()> {
//! let mut registry = InMemoryRegistry::new();
//! let version = registry.register_model("/artifacts/pipeline.json", "clf-model")?;
//! assert_eq!(version, 1);
//!
//! let status = registry.get_version_status("clf-model", version)?;
//! assert_eq!(status, VersionStatus::Ready);
//!
//! registry.transition_stage("clf-model", version, ModelStage::Staging)?;
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod experiment;
mod memory;
mod stage;
mod status;
mod transition;
mod version;

pub use client::RegistryClient;
pub use error::{RegistryError, Result};
pub use experiment::Experiment;
pub use memory::InMemoryRegistry;
pub use stage::ModelStage;
pub use status::VersionStatus;
pub use transition::StageTransition;
pub use version::ModelVersion;
