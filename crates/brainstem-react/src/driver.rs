//! ReAct graph driver (§2 item 5, §4.3): sequences R1-R8, checkpointing
//! after every node and honoring R5's suspension point.
//!
//! This reuses `brainstem_core::driver::NodeCheckpointer` rather than
//! re-implementing checkpoint bookkeeping, per that type's own doc comment.

use brainstem_core::driver::NodeCheckpointer;
use brainstem_core::state::BrainState;
use brainstem_core::SkillRegistry;

use crate::error::Result;
use crate::nodes::{
    r1_build_observation, r2_react_decide, r3_compile_ops, r4_guardrails_check,
    r5_human_approval, r6_dispatch_skills, r7_observe_result, r8_stop_or_loop,
    ApprovalOutcome, LoopOutcome,
};
use crate::ports::{OracleClient, SkillExecutor};

/// Why a [`run_react_to_suspension`] call returned control to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactOutcome {
    /// R8 exited the loop; the contained reason is `state.react.stop_reason`.
    Stopped(String),
    /// R5 suspended the graph awaiting a human approval response; the host
    /// must deliver one via `state.hci.approval_response` and call
    /// [`run_react_to_suspension`] again on the same thread id.
    AwaitingApproval,
}

/// Where to begin the first R1..R8 iteration of a [`run_react_to_suspension`]
/// call. Every iteration after the first always begins at `R1`, per §4.3's
/// normal flow; this only matters for the first one, when resuming either a
/// pending human approval or a crash mid-iteration (§5, §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum ReactEntryPoint {
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
}

impl ReactEntryPoint {
    /// Map the node label of the last-written checkpoint to the entry point
    /// for the node that follows it, i.e. the first node that did *not* run
    /// before the process stopped. `None` means "not mid-ReAct-iteration" (a
    /// Kernel node, `R5` — handled separately via `hci.approval_response` —
    /// `R8`, or no checkpoint at all): callers fall back to a normal `R1` entry.
    fn after_node(node: &str) -> Option<Self> {
        match node {
            "R1" => Some(Self::R2),
            "R2" => Some(Self::R3),
            "R3" => Some(Self::R4),
            "R4" => Some(Self::R5),
            "R6" => Some(Self::R7),
            "R7" => Some(Self::R8),
            _ => None,
        }
    }
}

/// Run R1 through R8 repeatedly until the loop exits or R5 suspends for
/// human approval, checkpointing after every node (§5).
///
/// Two independent resume paths feed into where the first iteration starts:
///
/// - **Pending approval**: if `state.react.proposed_ops` already has
///   `need_approval=true` and `state.hci.approval_response` is now `Some`,
///   this resumes directly into R5 rather than re-running R1-R4, matching
///   the "resume is a fresh graph invocation on the same thread id with
///   `hci.approval_response` pre-populated" note in §9.
/// - **Crash mid-iteration**: if `checkpointer` was restored from a
///   checkpoint written mid-ReAct-loop (§5's durable-resume contract), this
///   re-enters right after the last completed node instead of restarting at
///   R1 — critically, without re-running R1 (which bumps `react.iter`), so a
///   crash recorded right after R6's dispatch resumes at R7 rather than
///   re-dispatching under a now-stale idempotency key (§9 end-to-end scenario 6).
pub async fn run_react_to_suspension(
    state: &mut BrainState,
    oracle: &dyn OracleClient,
    executor: &dyn SkillExecutor,
    registry: &SkillRegistry,
    registry_summary: &str,
    max_iter: u32,
    checkpointer: &mut NodeCheckpointer,
) -> Result<ReactOutcome> {
    let resuming_at_approval = state
        .react
        .proposed_ops
        .as_ref()
        .map(|ops| ops.need_approval)
        .unwrap_or(false)
        && state.hci.approval_response.is_some();

    let checkpoint_entry = checkpointer
        .take_pending_resume_node()
        .and_then(|node| ReactEntryPoint::after_node(&node));

    let mut entry = if resuming_at_approval {
        ReactEntryPoint::R5
    } else {
        checkpoint_entry.unwrap_or(ReactEntryPoint::R1)
    };

    loop {
        if entry <= ReactEntryPoint::R1 {
            r1_build_observation::run(state);
            checkpointer.checkpoint("R1", state).await?;
        }
        if entry <= ReactEntryPoint::R2 {
            r2_react_decide::run(state, oracle, registry_summary).await?;
            checkpointer.checkpoint("R2", state).await?;
        }
        if entry <= ReactEntryPoint::R3 {
            r3_compile_ops::run(state);
            checkpointer.checkpoint("R3", state).await?;
        }
        if entry <= ReactEntryPoint::R4 {
            r4_guardrails_check::run(state, registry);
            checkpointer.checkpoint("R4", state).await?;
        }

        if entry <= ReactEntryPoint::R5 {
            match r5_human_approval::run(state, registry) {
                ApprovalOutcome::Suspend => {
                    checkpointer.checkpoint("R5", state).await?;
                    return Ok(ReactOutcome::AwaitingApproval);
                }
                ApprovalOutcome::PassThrough | ApprovalOutcome::Resumed => {
                    checkpointer.checkpoint("R5", state).await?;
                }
            }
        }

        if entry <= ReactEntryPoint::R6 {
            r6_dispatch_skills::run(state, executor, registry, checkpointer.thread_id()).await?;
            checkpointer.checkpoint("R6", state).await?;
        }

        if entry <= ReactEntryPoint::R7 {
            r7_observe_result::run(state, executor).await?;
            checkpointer.checkpoint("R7", state).await?;
        }

        let outcome = r8_stop_or_loop::run(state, max_iter);
        checkpointer.checkpoint("R8", state).await?;

        entry = ReactEntryPoint::R1;

        if outcome == LoopOutcome::Exit {
            return Ok(ReactOutcome::Stopped(
                state.react.stop_reason.clone().unwrap_or_default(),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{PollOutcome, PortError};
    use async_trait::async_trait;
    use brainstem_checkpoint::InMemoryCheckpointSaver;
    use brainstem_core::state::{Message, Observation};
    use std::sync::Arc;

    struct ScriptedOracle(Vec<&'static str>, std::sync::Mutex<usize>);

    impl ScriptedOracle {
        fn new(replies: Vec<&'static str>) -> Self {
            Self(replies, std::sync::Mutex::new(0))
        }
    }

    #[async_trait]
    impl OracleClient for ScriptedOracle {
        async fn decide(
            &self,
            _messages: &[Message],
            _observation: &Observation,
            _registry_summary: &str,
        ) -> std::result::Result<String, PortError> {
            let mut idx = self.1.lock().unwrap();
            let reply = self.0[(*idx).min(self.0.len() - 1)];
            *idx += 1;
            Ok(reply.to_string())
        }
    }

    struct InstantExecutor;

    #[async_trait]
    impl SkillExecutor for InstantExecutor {
        async fn dispatch(
            &self,
            _skill_name: &str,
            _params: &serde_json::Value,
            idempotency_key: &str,
        ) -> std::result::Result<String, PortError> {
            Ok(format!("goal-{idempotency_key}"))
        }
        async fn cancel(&self, _invocation_id: &str) -> std::result::Result<(), PortError> {
            Ok(())
        }
        async fn poll(&self, _invocation_id: &str) -> std::result::Result<PollOutcome, PortError> {
            Ok(PollOutcome::Done(brainstem_core::state::SkillResult {
                status: brainstem_core::state::ResultStatus::Success,
                error_code: None,
                error_msg: None,
                metrics: Default::default(),
            }))
        }
        async fn speak(&self, _text: &str, _idempotency_key: &str) -> std::result::Result<(), PortError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn finish_decision_stops_after_one_iteration() {
        let saver = Arc::new(InMemoryCheckpointSaver::new());
        let mut checkpointer = NodeCheckpointer::new(saver, "t1", 0);
        let mut state = BrainState::new();
        let oracle = ScriptedOracle::new(vec![r#"{"type": "FINISH", "reason": "arrived"}"#]);
        let executor = InstantExecutor;
        let registry = SkillRegistry::with_builtins();

        let outcome = run_react_to_suspension(
            &mut state,
            &oracle,
            &executor,
            &registry,
            "registry summary",
            r8_stop_or_loop::DEFAULT_MAX_ITER,
            &mut checkpointer,
        )
        .await
        .unwrap();

        assert_eq!(outcome, ReactOutcome::Stopped("finish".to_string()));
        assert_eq!(state.react.iter, 1);
    }

    #[tokio::test]
    async fn ask_human_suspends_and_resume_applies_approval() {
        let saver = Arc::new(InMemoryCheckpointSaver::new());
        let mut checkpointer = NodeCheckpointer::new(saver, "t1", 0);
        let mut state = BrainState::new();
        let oracle = ScriptedOracle::new(vec![
            r#"{"type": "ASK_HUMAN", "reason": "need confirmation"}"#,
        ]);
        let executor = InstantExecutor;
        let registry = SkillRegistry::with_builtins();

        let outcome = run_react_to_suspension(
            &mut state,
            &oracle,
            &executor,
            &registry,
            "registry summary",
            r8_stop_or_loop::DEFAULT_MAX_ITER,
            &mut checkpointer,
        )
        .await
        .unwrap();

        assert_eq!(outcome, ReactOutcome::AwaitingApproval);
        assert!(state
            .react
            .proposed_ops
            .as_ref()
            .unwrap()
            .need_approval);

        state.hci.approval_response = Some(brainstem_core::state::ApprovalResponse::Reject);
        let outcome = run_react_to_suspension(
            &mut state,
            &oracle,
            &executor,
            &registry,
            "registry summary",
            r8_stop_or_loop::DEFAULT_MAX_ITER,
            &mut checkpointer,
        )
        .await
        .unwrap();

        // R5 itself rewrites decision.type to ABORT on REJECT (per its own
        // spec), so R8's condition 1 (decision.type ∈ {FINISH,ABORT,ASK_HUMAN})
        // fires before condition 5 ever observes the REJECT response.
        assert_eq!(outcome, ReactOutcome::Stopped("abort".to_string()));
    }

    #[derive(Default)]
    struct RecordingExecutor {
        dispatch_calls: std::sync::Mutex<u32>,
    }

    #[async_trait]
    impl SkillExecutor for RecordingExecutor {
        async fn dispatch(
            &self,
            _skill_name: &str,
            _params: &serde_json::Value,
            idempotency_key: &str,
        ) -> std::result::Result<String, PortError> {
            *self.dispatch_calls.lock().unwrap() += 1;
            Ok(format!("goal-{idempotency_key}"))
        }
        async fn cancel(&self, _invocation_id: &str) -> std::result::Result<(), PortError> {
            Ok(())
        }
        async fn poll(&self, _invocation_id: &str) -> std::result::Result<PollOutcome, PortError> {
            Ok(PollOutcome::Done(brainstem_core::state::SkillResult {
                status: brainstem_core::state::ResultStatus::Success,
                error_code: None,
                error_msg: None,
                metrics: Default::default(),
            }))
        }
        async fn speak(&self, _text: &str, _idempotency_key: &str) -> std::result::Result<(), PortError> {
            Ok(())
        }
    }

    /// Simulates the process being killed right after R6's checkpoint and
    /// restarted on the same thread id (§9 end-to-end scenario 6): a
    /// checkpoint tagged `"R6"` is written directly (bypassing the driver),
    /// with a `RunningSkill` already recorded as if R6 had just dispatched
    /// it. Resuming must re-enter at R7, not redispatch.
    #[tokio::test]
    async fn resume_after_r6_checkpoint_does_not_redispatch() {
        use brainstem_checkpoint::{Checkpoint, CheckpointMetadata, CheckpointSaver};
        use brainstem_core::state::{Decision, DecisionType, Resource, RunningSkill};

        let saver = Arc::new(InMemoryCheckpointSaver::new());

        let mut crashed_state = BrainState::new();
        crashed_state.react.iter = 5;
        crashed_state.react.decision = Some(Decision {
            decision_type: Some(DecisionType::Finish),
            ..Default::default()
        });
        crashed_state.skills.running.push(RunningSkill {
            goal_id: "goal-t1:5:0".to_string(),
            skill_name: "NavigateToPose".to_string(),
            params: serde_json::json!({"x": 1.0, "y": 2.0}),
            invocation_id: "goal-t1:5:0".to_string(),
            start_time: chrono::Utc::now(),
            timeout_s: 120.0,
            resources_occupied: vec![Resource::Base],
        });
        crashed_state.robot.resources.insert(Resource::Base, true);

        let value = crashed_state.to_checkpoint_value().unwrap();
        let checkpoint = Checkpoint::new(3, Some("R6".to_string()), value);
        saver
            .put("t1", checkpoint, CheckpointMetadata::default())
            .await
            .unwrap();

        let (mut checkpointer, mut state) =
            NodeCheckpointer::resume(saver, "t1").await.unwrap();
        assert_eq!(state.react.iter, 5);

        let oracle = ScriptedOracle::new(vec![r#"{"type": "FINISH"}"#]);
        let executor = RecordingExecutor::default();
        let registry = SkillRegistry::with_builtins();

        let outcome = run_react_to_suspension(
            &mut state,
            &oracle,
            &executor,
            &registry,
            "registry summary",
            r8_stop_or_loop::DEFAULT_MAX_ITER,
            &mut checkpointer,
        )
        .await
        .unwrap();

        assert_eq!(outcome, ReactOutcome::Stopped("finish".to_string()));
        assert_eq!(
            *executor.dispatch_calls.lock().unwrap(),
            0,
            "resuming after R6 must not re-dispatch the already-running skill"
        );
        // R1 (which bumps iter) was skipped on the resumed pass: iter is
        // unchanged from the checkpointed value.
        assert_eq!(state.react.iter, 5);
    }
}
