//! Reference skill executor adapter: an in-process simulator with
//! idempotency-key dedup (§5, §9).
//!
//! A real deployment wires `SkillExecutor` to the navigation stack, base
//! stop, and speech output (§1's out-of-scope "skill execution runtime");
//! this is the in-memory reference the core's replay-safety guarantee is
//! tested against, mirroring `brainstem_checkpoint::InMemoryCheckpointSaver`'s
//! role for the checkpoint trait.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use brainstem_react::ports::{PollOutcome, PortError, SkillExecutor};
use brainstem_core::state::{ResultStatus, SkillResult};
use uuid::Uuid;

/// How a scripted invocation should eventually resolve.
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    /// Resolve successfully after `polls_until_done` polls.
    Success { polls_until_done: u32 },
    /// Resolve as failed with the given error code after `polls_until_done` polls.
    Failed {
        /// Number of `poll()` calls before this invocation reports done.
        polls_until_done: u32,
        /// Error code to report, matched against `registry.error_map`.
        error_code: String,
    },
    /// Never resolves; every poll reports still-running.
    Hangs,
}

struct Invocation {
    skill_name: String,
    outcome: ScriptedOutcome,
    polls_seen: u32,
    cancelled: bool,
}

/// In-memory `SkillExecutor` that dedups dispatch/speak by idempotency key
/// and resolves invocations per a pre-registered [`ScriptedOutcome`], or a
/// default "succeeds after one poll" behavior when none was registered.
#[derive(Default)]
pub struct SimulatedExecutor {
    seen_keys: Mutex<HashSet<String>>,
    invocations: Mutex<HashMap<String, Invocation>>,
    default_outcomes: Mutex<HashMap<String, ScriptedOutcome>>,
}

impl SimulatedExecutor {
    /// A fresh executor with no scripted behavior; every dispatched skill
    /// succeeds after its first poll.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script how every future dispatch of `skill_name` resolves, until
    /// overridden again.
    pub fn script_outcome(&self, skill_name: impl Into<String>, outcome: ScriptedOutcome) {
        self.default_outcomes
            .lock()
            .unwrap()
            .insert(skill_name.into(), outcome);
    }

    /// Number of distinct idempotency keys this executor has accepted a
    /// dispatch or speak call for (i.e. dedup-survivors), for test assertions.
    pub fn accepted_key_count(&self) -> usize {
        self.seen_keys.lock().unwrap().len()
    }
}

#[async_trait]
impl SkillExecutor for SimulatedExecutor {
    async fn dispatch(
        &self,
        skill_name: &str,
        _params: &serde_json::Value,
        idempotency_key: &str,
    ) -> Result<String, PortError> {
        let mut seen = self.seen_keys.lock().unwrap();
        if !seen.insert(idempotency_key.to_string()) {
            // Replay of an already-accepted key: return the same invocation
            // id rather than creating a second one.
            let invocations = self.invocations.lock().unwrap();
            if let Some((id, _)) = invocations
                .iter()
                .find(|(_, inv)| inv.skill_name == skill_name)
            {
                return Ok(id.clone());
            }
        }

        let outcome = self
            .default_outcomes
            .lock()
            .unwrap()
            .get(skill_name)
            .cloned()
            .unwrap_or(ScriptedOutcome::Success {
                polls_until_done: 1,
            });

        let invocation_id = Uuid::new_v4().to_string();
        self.invocations.lock().unwrap().insert(
            invocation_id.clone(),
            Invocation {
                skill_name: skill_name.to_string(),
                outcome,
                polls_seen: 0,
                cancelled: false,
            },
        );
        Ok(invocation_id)
    }

    async fn cancel(&self, invocation_id: &str) -> Result<(), PortError> {
        if let Some(inv) = self.invocations.lock().unwrap().get_mut(invocation_id) {
            inv.cancelled = true;
        }
        Ok(())
    }

    async fn poll(&self, invocation_id: &str) -> Result<PollOutcome, PortError> {
        let mut invocations = self.invocations.lock().unwrap();
        let Some(inv) = invocations.get_mut(invocation_id) else {
            return Err(PortError::Rejected(format!(
                "no such invocation: {invocation_id}"
            )));
        };

        if inv.cancelled {
            return Ok(PollOutcome::Done(SkillResult {
                status: ResultStatus::Cancelled,
                error_code: None,
                error_msg: None,
                metrics: Default::default(),
            }));
        }

        inv.polls_seen += 1;
        match &inv.outcome {
            ScriptedOutcome::Hangs => Ok(PollOutcome::Running { feedback: None }),
            ScriptedOutcome::Success { polls_until_done } => {
                if inv.polls_seen >= *polls_until_done {
                    Ok(PollOutcome::Done(SkillResult {
                        status: ResultStatus::Success,
                        error_code: None,
                        error_msg: None,
                        metrics: Default::default(),
                    }))
                } else {
                    Ok(PollOutcome::Running { feedback: None })
                }
            }
            ScriptedOutcome::Failed {
                polls_until_done,
                error_code,
            } => {
                if inv.polls_seen >= *polls_until_done {
                    Ok(PollOutcome::Done(SkillResult {
                        status: ResultStatus::Failed,
                        error_code: Some(error_code.clone()),
                        error_msg: Some(format!("{} failed: {error_code}", inv.skill_name)),
                        metrics: Default::default(),
                    }))
                } else {
                    Ok(PollOutcome::Running { feedback: None })
                }
            }
        }
    }

    async fn speak(&self, _text: &str, idempotency_key: &str) -> Result<(), PortError> {
        self.seen_keys
            .lock()
            .unwrap()
            .insert(idempotency_key.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replaying_a_dispatch_key_does_not_create_a_second_invocation() {
        let executor = SimulatedExecutor::new();
        let first = executor
            .dispatch("NavigateToPose", &serde_json::json!({}), "t1:1:0")
            .await
            .unwrap();
        let second = executor
            .dispatch("NavigateToPose", &serde_json::json!({}), "t1:1:0")
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(executor.accepted_key_count(), 1);
    }

    #[tokio::test]
    async fn scripted_failure_reports_error_code_after_configured_polls() {
        let executor = SimulatedExecutor::new();
        executor.script_outcome(
            "NavigateToPose",
            ScriptedOutcome::Failed {
                polls_until_done: 2,
                error_code: "NAV_BLOCKED".to_string(),
            },
        );
        let id = executor
            .dispatch("NavigateToPose", &serde_json::json!({}), "t1:1:0")
            .await
            .unwrap();

        assert!(matches!(
            executor.poll(&id).await.unwrap(),
            PollOutcome::Running { .. }
        ));
        match executor.poll(&id).await.unwrap() {
            PollOutcome::Done(result) => {
                assert_eq!(result.status, ResultStatus::Failed);
                assert_eq!(result.error_code.as_deref(), Some("NAV_BLOCKED"));
            }
            other => panic!("expected Done, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancel_makes_the_next_poll_report_cancelled() {
        let executor = SimulatedExecutor::new();
        executor.script_outcome("NavigateToPose", ScriptedOutcome::Hangs);
        let id = executor
            .dispatch("NavigateToPose", &serde_json::json!({}), "t1:1:0")
            .await
            .unwrap();
        executor.cancel(&id).await.unwrap();

        match executor.poll(&id).await.unwrap() {
            PollOutcome::Done(result) => assert_eq!(result.status, ResultStatus::Cancelled),
            other => panic!("expected Done(Cancelled), got {other:?}"),
        }
    }
}
