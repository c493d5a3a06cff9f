//! Tests for the stage transition poller

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use super::*;
use crate::registry::{
    Experiment, InMemoryRegistry, ModelVersion, RegistryError, VersionStatus,
};

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

/// Sleeper that records intervals instead of blocking.
#[derive(Debug, Default)]
struct CountingSleep {
    slept: Vec<Duration>,
}

impl Sleep for CountingSleep {
    fn sleep(&mut self, interval: Duration) {
        self.slept.push(interval);
    }
}

/// Registry client that replays a scripted status sequence and records
/// every transition request.
#[derive(Debug, Default)]
struct ScriptedClient {
    statuses: VecDeque<crate::registry::Result<VersionStatus>>,
    transitions: Vec<(String, u32, ModelStage)>,
    polls: u32,
}

impl ScriptedClient {
    fn with_statuses(statuses: Vec<crate::registry::Result<VersionStatus>>) -> Self {
        Self {
            statuses: statuses.into(),
            ..Self::default()
        }
    }
}

impl RegistryClient for ScriptedClient {
    fn get_version_status(
        &mut self,
        name: &str,
        version: u32,
    ) -> crate::registry::Result<VersionStatus> {
        self.polls += 1;
        self.statuses.pop_front().unwrap_or_else(|| {
            Err(RegistryError::VersionNotFound(name.to_string(), version))
        })
    }

    fn transition_stage(
        &mut self,
        name: &str,
        version: u32,
        stage: ModelStage,
    ) -> crate::registry::Result<()> {
        self.transitions.push((name.to_string(), version, stage));
        Ok(())
    }

    fn register_model(&mut self, _artifact_uri: &str, _name: &str) -> crate::registry::Result<u32> {
        Err(RegistryError::Internal("not scripted".to_string()))
    }

    fn update_description(
        &mut self,
        _name: &str,
        _version: u32,
        _text: &str,
    ) -> crate::registry::Result<()> {
        Err(RegistryError::Internal("not scripted".to_string()))
    }

    fn search_versions(&mut self, _name: &str) -> crate::registry::Result<Vec<ModelVersion>> {
        Err(RegistryError::Internal("not scripted".to_string()))
    }

    fn log_metrics(
        &mut self,
        _name: &str,
        _version: u32,
        _metrics: HashMap<String, f64>,
    ) -> crate::registry::Result<()> {
        Err(RegistryError::Internal("not scripted".to_string()))
    }

    fn create_experiment(
        &mut self,
        _name: &str,
        _artifact_location: &str,
    ) -> crate::registry::Result<String> {
        Err(RegistryError::Internal("not scripted".to_string()))
    }

    fn get_experiment_by_name(
        &mut self,
        _name: &str,
    ) -> crate::registry::Result<Option<Experiment>> {
        Ok(None)
    }
}

fn pendings(n: usize) -> Vec<crate::registry::Result<VersionStatus>> {
    (0..n)
        .map(|_| Ok(VersionStatus::PendingRegistration))
        .collect()
}

// ---------------------------------------------------------------------------
// WaitPolicy tests
// ---------------------------------------------------------------------------

#[test]
fn test_wait_policy_default() {
    let policy = WaitPolicy::default();
    assert_eq!(policy.max_attempts, 10);
    assert_eq!(policy.interval, Duration::from_secs(1));
}

#[test]
fn test_wait_policy_new() {
    let policy = WaitPolicy::new(3, Duration::from_millis(5));
    assert_eq!(policy.max_attempts, 3);
    assert_eq!(policy.interval, Duration::from_millis(5));
}

// ---------------------------------------------------------------------------
// Ready paths
// ---------------------------------------------------------------------------

#[test]
fn test_ready_on_first_poll_transitions_without_sleeping() {
    let mut client = ScriptedClient::with_statuses(vec![Ok(VersionStatus::Ready)]);
    let mut sleeper = CountingSleep::default();

    let outcome = wait_and_transition_with(
        &mut client,
        "clf-model",
        1,
        ModelStage::Staging,
        &WaitPolicy::default(),
        &mut sleeper,
    )
    .unwrap();

    assert_eq!(outcome, PromotionOutcome::Promoted { attempts: 1 });
    assert_eq!(client.polls, 1);
    assert_eq!(
        client.transitions,
        vec![("clf-model".to_string(), 1, ModelStage::Staging)]
    );
    assert!(sleeper.slept.is_empty());
}

#[test]
fn test_two_pendings_then_ready_sleeps_twice() {
    // Scenario: [PENDING, PENDING, READY] -> 2 sleeps, 1 transition.
    let mut statuses = pendings(2);
    statuses.push(Ok(VersionStatus::Ready));
    let mut client = ScriptedClient::with_statuses(statuses);
    let mut sleeper = CountingSleep::default();

    let outcome = wait_and_transition_with(
        &mut client,
        "clf-model",
        2,
        ModelStage::Staging,
        &WaitPolicy::default(),
        &mut sleeper,
    )
    .unwrap();

    assert_eq!(outcome, PromotionOutcome::Promoted { attempts: 3 });
    assert_eq!(client.transitions.len(), 1);
    assert_eq!(client.transitions[0].2, ModelStage::Staging);
    assert_eq!(sleeper.slept.len(), 2);
}

#[test]
fn test_polling_stops_immediately_after_ready() {
    // READY followed by more READYs in the script: only the first is consumed.
    let mut client = ScriptedClient::with_statuses(vec![
        Ok(VersionStatus::PendingRegistration),
        Ok(VersionStatus::Ready),
        Ok(VersionStatus::Ready),
    ]);

    wait_and_transition_with(
        &mut client,
        "clf-model",
        1,
        ModelStage::Production,
        &WaitPolicy::default(),
        &mut CountingSleep::default(),
    )
    .unwrap();

    assert_eq!(client.polls, 2);
    assert_eq!(client.statuses.len(), 1);
}

#[test]
fn test_ready_on_final_attempt_still_transitions() {
    let mut statuses = pendings(9);
    statuses.push(Ok(VersionStatus::Ready));
    let mut client = ScriptedClient::with_statuses(statuses);
    let mut sleeper = CountingSleep::default();

    let outcome = wait_and_transition_with(
        &mut client,
        "clf-model",
        1,
        ModelStage::Staging,
        &WaitPolicy::default(),
        &mut sleeper,
    )
    .unwrap();

    assert_eq!(outcome, PromotionOutcome::Promoted { attempts: 10 });
    assert_eq!(client.transitions.len(), 1);
    // No sleep after the attempt that observed READY.
    assert_eq!(sleeper.slept.len(), 9);
}

#[test]
fn test_sleep_interval_comes_from_policy() {
    let mut statuses = pendings(1);
    statuses.push(Ok(VersionStatus::Ready));
    let mut client = ScriptedClient::with_statuses(statuses);
    let mut sleeper = CountingSleep::default();

    wait_and_transition_with(
        &mut client,
        "clf-model",
        1,
        ModelStage::Staging,
        &WaitPolicy::new(10, Duration::from_millis(250)),
        &mut sleeper,
    )
    .unwrap();

    assert_eq!(sleeper.slept, vec![Duration::from_millis(250)]);
}

// ---------------------------------------------------------------------------
// Exhaustion paths
// ---------------------------------------------------------------------------

#[test]
fn test_never_ready_exhausts_without_transition() {
    // Scenario: ten PENDINGs -> 9 sleeps, 0 transitions.
    let mut client = ScriptedClient::with_statuses(pendings(10));
    let mut sleeper = CountingSleep::default();

    let outcome = wait_and_transition_with(
        &mut client,
        "clf-model",
        1,
        ModelStage::Staging,
        &WaitPolicy::default(),
        &mut sleeper,
    )
    .unwrap();

    assert_eq!(outcome, PromotionOutcome::Exhausted { attempts: 10 });
    assert!(client.transitions.is_empty());
    assert_eq!(client.polls, 10);
    assert_eq!(sleeper.slept.len(), 9);
}

#[test]
fn test_failed_registration_exhausts_without_transition() {
    let statuses = (0..10)
        .map(|_| Ok(VersionStatus::FailedRegistration))
        .collect();
    let mut client = ScriptedClient::with_statuses(statuses);

    let outcome = wait_and_transition_with(
        &mut client,
        "clf-model",
        1,
        ModelStage::Staging,
        &WaitPolicy::default(),
        &mut CountingSleep::default(),
    )
    .unwrap();

    assert!(!outcome.is_promoted());
    assert!(client.transitions.is_empty());
}

#[test]
fn test_zero_attempt_budget_exhausts_without_polling() {
    let mut client = ScriptedClient::with_statuses(vec![Ok(VersionStatus::Ready)]);
    let mut sleeper = CountingSleep::default();

    let outcome = wait_and_transition_with(
        &mut client,
        "clf-model",
        1,
        ModelStage::Staging,
        &WaitPolicy::new(0, Duration::from_secs(1)),
        &mut sleeper,
    )
    .unwrap();

    assert_eq!(outcome, PromotionOutcome::Exhausted { attempts: 0 });
    assert_eq!(client.polls, 0);
    assert!(sleeper.slept.is_empty());
}

// ---------------------------------------------------------------------------
// Error paths
// ---------------------------------------------------------------------------

#[test]
fn test_lookup_failure_propagates() {
    // Version 0: the "previous version" of a first-ever registration.
    let mut client = ScriptedClient::with_statuses(vec![Err(
        RegistryError::VersionNotFound("clf-model".to_string(), 0),
    )]);

    let err = wait_and_transition_with(
        &mut client,
        "clf-model",
        0,
        ModelStage::None,
        &WaitPolicy::default(),
        &mut CountingSleep::default(),
    )
    .unwrap_err();

    assert!(matches!(err, RegistryError::VersionNotFound(_, 0)));
    assert!(client.transitions.is_empty());
}

#[test]
fn test_lookup_failure_mid_poll_stops_the_loop() {
    let mut client = ScriptedClient::with_statuses(vec![
        Ok(VersionStatus::PendingRegistration),
        Err(RegistryError::Unreachable("connection reset".to_string())),
    ]);
    let mut sleeper = CountingSleep::default();

    let result = wait_and_transition_with(
        &mut client,
        "clf-model",
        1,
        ModelStage::Staging,
        &WaitPolicy::default(),
        &mut sleeper,
    );

    assert!(result.is_err());
    assert_eq!(client.polls, 2);
    assert_eq!(sleeper.slept.len(), 1);
}

// ---------------------------------------------------------------------------
// Against the in-memory registry
// ---------------------------------------------------------------------------

#[test]
fn test_promotes_against_in_memory_registry() {
    let mut registry = InMemoryRegistry::new().ready_after(2);
    let version = registry.register_model("/path/v1", "clf-model").unwrap();
    let mut sleeper = CountingSleep::default();

    let outcome = wait_and_transition_with(
        &mut registry,
        "clf-model",
        version,
        ModelStage::Staging,
        &WaitPolicy::default(),
        &mut sleeper,
    )
    .unwrap();

    assert_eq!(outcome, PromotionOutcome::Promoted { attempts: 3 });
    assert_eq!(sleeper.slept.len(), 2);

    let versions = registry.search_versions("clf-model").unwrap();
    assert_eq!(versions[0].stage, ModelStage::Staging);
}

// ---------------------------------------------------------------------------
// Property tests
// ---------------------------------------------------------------------------

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// Any sequence that reaches READY within the budget issues exactly
        /// one transition, to the requested stage, and stops polling.
        #[test]
        fn prop_ready_within_budget_transitions_once(
            pending_count in 0u32..10,
            stage in prop_oneof![
                Just(ModelStage::None),
                Just(ModelStage::Staging),
                Just(ModelStage::Production),
            ],
        ) {
            let mut statuses = pendings(pending_count as usize);
            statuses.push(Ok(VersionStatus::Ready));
            let mut client = ScriptedClient::with_statuses(statuses);
            let mut sleeper = CountingSleep::default();

            let outcome = wait_and_transition_with(
                &mut client,
                "clf-model",
                1,
                stage,
                &WaitPolicy::default(),
                &mut sleeper,
            ).unwrap();

            prop_assert_eq!(outcome, PromotionOutcome::Promoted { attempts: pending_count + 1 });
            prop_assert_eq!(client.transitions.len(), 1);
            prop_assert_eq!(client.transitions[0].2, stage);
            prop_assert_eq!(client.polls, pending_count + 1);
            prop_assert_eq!(sleeper.slept.len() as u32, pending_count);
        }

        /// Any sequence that never reaches READY exhausts the budget with
        /// zero transitions and without raising.
        #[test]
        fn prop_never_ready_never_transitions(
            budget in 1u32..16,
            failed in proptest::bool::ANY,
        ) {
            let status = if failed {
                VersionStatus::FailedRegistration
            } else {
                VersionStatus::PendingRegistration
            };
            let statuses = (0..budget).map(|_| Ok(status)).collect();
            let mut client = ScriptedClient::with_statuses(statuses);
            let mut sleeper = CountingSleep::default();

            let outcome = wait_and_transition_with(
                &mut client,
                "clf-model",
                1,
                ModelStage::Staging,
                &WaitPolicy::new(budget, Duration::from_secs(1)),
                &mut sleeper,
            ).unwrap();

            prop_assert_eq!(outcome, PromotionOutcome::Exhausted { attempts: budget });
            prop_assert!(client.transitions.is_empty());
            // At most budget - 1 sleeps: none after the final attempt.
            prop_assert_eq!(sleeper.slept.len() as u32, budget - 1);
        }
    }
}
