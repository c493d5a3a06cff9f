//! Version readiness status

use serde::{Deserialize, Serialize};

/// Readiness of a version's artifact within the registry.
///
/// Registration is asynchronous on the registry side: a freshly registered
/// version stays `PendingRegistration` until the artifact is materialized.
/// Clients compare against `Ready` and treat the enum as opaque otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VersionStatus {
    /// Artifact submitted, not yet materialized
    PendingRegistration,
    /// Registration failed; the version will never become ready
    FailedRegistration,
    /// Artifact materialized; stage transitions are allowed
    Ready,
}

impl VersionStatus {
    /// Wire-format name, matching the registry protocol.
    pub fn as_str(self) -> &'static str {
        match self {
            VersionStatus::PendingRegistration => "PENDING_REGISTRATION",
            VersionStatus::FailedRegistration => "FAILED_REGISTRATION",
            VersionStatus::Ready => "READY",
        }
    }

    /// True once stage transitions are allowed.
    #[must_use]
    pub fn is_ready(self) -> bool {
        self == VersionStatus::Ready
    }
}

impl std::fmt::Display for VersionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
