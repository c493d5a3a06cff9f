//! Model lifecycle stages

use serde::{Deserialize, Serialize};

use super::error::RegistryError;

/// Lifecycle stage attached to a model version.
///
/// The registry applies whatever stage a client requests; there is no
/// adjacency rule between stages. `None` is the initial label of every
/// freshly registered version and doubles as the parking stage for retired
/// predecessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelStage {
    /// Not assigned to any stage
    None,
    /// Being tested/validated
    Staging,
    /// Deployed and serving traffic
    Production,
    /// Retired from active use
    Archived,
}

impl ModelStage {
    /// Display name for the stage.
    pub fn as_str(self) -> &'static str {
        match self {
            ModelStage::None => "None",
            ModelStage::Staging => "Staging",
            ModelStage::Production => "Production",
            ModelStage::Archived => "Archived",
        }
    }

    /// Parse a stage label as the registry spells it.
    pub fn parse(label: &str) -> super::Result<Self> {
        match label {
            "None" => Ok(ModelStage::None),
            "Staging" => Ok(ModelStage::Staging),
            "Production" => Ok(ModelStage::Production),
            "Archived" => Ok(ModelStage::Archived),
            other => Err(RegistryError::UnknownStage(other.to_string())),
        }
    }
}

impl std::fmt::Display for ModelStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ModelStage {
    type Err = RegistryError;

    fn from_str(s: &str) -> super::Result<Self> {
        ModelStage::parse(s)
    }
}
