//! Stage Transition Polling
//!
//! Bounded poll-until-ready against the registry, followed by exactly one
//! stage transition. A freshly registered version sits in
//! `PENDING_REGISTRATION` until the registry materializes the artifact;
//! this module waits for `READY` and then requests the target stage.
//!
//! The retry behavior is an explicit, testable [`WaitPolicy`] rather than a
//! pair of hardcoded constants, and running out of attempts is an explicit
//! [`PromotionOutcome::Exhausted`] rather than a silent return. Sleeping
//! goes through the [`Sleep`] seam so tests never block on wall-clock time.
//!
//! # Example
//!
//! ```
//! use promover::promote::{wait_and_transition, WaitPolicy};
//! use promover::registry::{InMemoryRegistry, ModelStage, RegistryClient};
//!
//! # fn main() -> promover::registry::Result<()> {
//! let mut registry = InMemoryRegistry::new();
//! let version = registry.register_model("/artifacts/pipeline.json", "clf-model")?;
//!
//! let outcome = wait_and_transition(
//!     &mut registry,
//!     "clf-model",
//!     version,
//!     ModelStage::Staging,
//!     &WaitPolicy::default(),
//! )?;
//! assert!(outcome.is_promoted());
//! # Ok(())
//! # }
//! ```

#[cfg(test)]
mod tests;

use std::time::Duration;

use crate::registry::{ModelStage, RegistryClient, Result};

/// Retry budget for the readiness poll.
///
/// `max_attempts` status fetches at most, with a fixed `interval` sleep
/// between consecutive attempts. No backoff growth, no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Maximum number of status fetches
    pub max_attempts: u32,
    /// Sleep between consecutive attempts
    pub interval: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            interval: Duration::from_secs(1),
        }
    }
}

impl WaitPolicy {
    /// Create a policy with the given attempt budget and interval.
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }
}

/// Result of a completed poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionOutcome {
    /// `READY` was observed and the stage transition was issued.
    Promoted {
        /// Status fetches spent, including the one that observed `READY`
        attempts: u32,
    },
    /// The attempt budget ran out without observing `READY`.
    /// No transition was issued.
    Exhausted {
        /// Status fetches spent
        attempts: u32,
    },
}

impl PromotionOutcome {
    /// True if the stage transition was issued.
    #[must_use]
    pub fn is_promoted(&self) -> bool {
        matches!(self, PromotionOutcome::Promoted { .. })
    }
}

/// Sleeping seam for the poll loop.
pub trait Sleep {
    /// Block for the given interval.
    fn sleep(&mut self, interval: Duration);
}

/// Production sleeper; blocks the calling thread.
#[derive(Debug, Default)]
pub struct ThreadSleep;

impl Sleep for ThreadSleep {
    fn sleep(&mut self, interval: Duration) {
        std::thread::sleep(interval);
    }
}

/// Poll a version's status until `READY`, then transition its stage.
///
/// Fetches the status up to `policy.max_attempts` times. The first fetch
/// that observes `READY` triggers exactly one [`transition_stage`] call and
/// polling stops immediately. Between consecutive attempts the thread
/// sleeps `policy.interval`; there is no sleep after the final attempt or
/// after success, so a budget of `n` attempts sleeps at most `n - 1` times.
///
/// Status lookup failures (e.g. polling a version that does not exist)
/// propagate to the caller; deciding whether they abort the wider workflow
/// is the caller's concern.
///
/// [`transition_stage`]: RegistryClient::transition_stage
pub fn wait_and_transition<C: RegistryClient>(
    client: &mut C,
    name: &str,
    version: u32,
    target_stage: ModelStage,
    policy: &WaitPolicy,
) -> Result<PromotionOutcome> {
    wait_and_transition_with(client, name, version, target_stage, policy, &mut ThreadSleep)
}

/// [`wait_and_transition`] with an explicit [`Sleep`] implementation.
pub fn wait_and_transition_with<C: RegistryClient, S: Sleep>(
    client: &mut C,
    name: &str,
    version: u32,
    target_stage: ModelStage,
    policy: &WaitPolicy,
    sleeper: &mut S,
) -> Result<PromotionOutcome> {
    for attempt in 1..=policy.max_attempts {
        let status = client.get_version_status(name, version)?;

        if status.is_ready() {
            client.transition_stage(name, version, target_stage)?;
            return Ok(PromotionOutcome::Promoted { attempts: attempt });
        }

        if attempt < policy.max_attempts {
            sleeper.sleep(policy.interval);
        }
    }

    Ok(PromotionOutcome::Exhausted {
        attempts: policy.max_attempts,
    })
}
