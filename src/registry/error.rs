//! Registry error types

use thiserror::Error;

/// Registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Version not found: {0} v{1}")]
    VersionNotFound(String, u32),

    #[error("Experiment not found: {0}")]
    ExperimentNotFound(String),

    #[error("Experiment already exists: {0}")]
    ExperimentExists(String),

    #[error("Version {1} of {0} is not ready for a stage transition")]
    NotReady(String, u32),

    #[error("Unknown stage: {0}")]
    UnknownStage(String),

    #[error("Registry unreachable: {0}")]
    Unreachable(String),

    #[error("Registry error: {0}")]
    Internal(String),
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
