//! R6 Dispatch_Skills (§4.3): the sole side-effecting node.
//!
//! Every side-effect call is tagged with a deterministic idempotency key
//! derived from `(thread_id, react.iter, op_index)` (§5); executor adapters
//! are responsible for suppressing duplicates on replay.

use brainstem_core::state::{BrainState, Resource, RunningSkill};
use brainstem_core::SkillRegistry;
use chrono::Utc;

use crate::error::Result;
use crate::ports::SkillExecutor;

/// Build the deterministic idempotency key for one op this iteration.
pub fn idempotency_key(thread_id: &str, iter: u32, op_index: usize) -> String {
    format!("{thread_id}:{iter}:{op_index}")
}

/// Run R6: cancels, then dispatches, then speaks, per §5's ordering rule
/// that cancels complete before dispatches in the same pass.
pub async fn run(
    state: &mut BrainState,
    executor: &dyn SkillExecutor,
    registry: &SkillRegistry,
    thread_id: &str,
) -> Result<()> {
    let Some(ops) = state.react.proposed_ops.clone() else {
        return Ok(());
    };
    let iter = state.react.iter;

    for invocation_id in &ops.to_cancel {
        executor.cancel(invocation_id).await?;
        state.skills.running.retain(|r| &r.invocation_id != invocation_id);
        state.trace.push(format!("R6: cancelled {invocation_id}"));
    }

    for (op_index, op) in ops.to_dispatch.iter().enumerate() {
        let key = idempotency_key(thread_id, iter, op_index);
        let goal_id = executor.dispatch(&op.skill_name, &op.params, &key).await?;
        let def = registry.get(&op.skill_name).ok();
        let (timeout_s, resources): (f64, Vec<Resource>) = def
            .map(|d| (d.timeout_s, d.resources_required.iter().copied().collect()))
            .unwrap_or((60.0, Vec::new()));

        for r in &resources {
            state.robot.resources.insert(*r, true);
        }

        state.skills.running.push(RunningSkill {
            goal_id: goal_id.clone(),
            skill_name: op.skill_name.clone(),
            params: op.params.clone(),
            invocation_id: goal_id,
            start_time: Utc::now(),
            timeout_s,
            resources_occupied: resources,
        });
        state
            .trace
            .push(format!("R6: dispatched {} (key={key})", op.skill_name));
    }

    for (op_index, text) in ops.to_speak.iter().enumerate() {
        let key = idempotency_key(thread_id, iter, ops.to_dispatch.len() + op_index);
        executor.speak(text, &key).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{PollOutcome, PortError};
    use async_trait::async_trait;
    use brainstem_core::state::{OpDescriptor, ProposedOps};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingExecutor {
        dispatched_keys: Mutex<Vec<String>>,
        seen_keys: Mutex<std::collections::HashSet<String>>,
    }

    #[async_trait]
    impl SkillExecutor for RecordingExecutor {
        async fn dispatch(
            &self,
            skill_name: &str,
            _params: &serde_json::Value,
            idempotency_key: &str,
        ) -> std::result::Result<String, PortError> {
            let mut seen = self.seen_keys.lock().unwrap();
            if !seen.insert(idempotency_key.to_string()) {
                return Ok(format!("existing-{skill_name}"));
            }
            self.dispatched_keys
                .lock()
                .unwrap()
                .push(idempotency_key.to_string());
            Ok(format!("goal-{skill_name}"))
        }

        async fn cancel(&self, _invocation_id: &str) -> std::result::Result<(), PortError> {
            Ok(())
        }

        async fn poll(&self, _invocation_id: &str) -> std::result::Result<PollOutcome, PortError> {
            Ok(PollOutcome::Running { feedback: None })
        }

        async fn speak(&self, _text: &str, _idempotency_key: &str) -> std::result::Result<(), PortError> {
            Ok(())
        }
    }

    fn dispatch_state() -> BrainState {
        let mut state = BrainState::new();
        state.react.iter = 3;
        state.react.proposed_ops = Some(ProposedOps {
            to_dispatch: vec![OpDescriptor {
                skill_name: "NavigateToPose".to_string(),
                params: serde_json::json!({"x": 1.0, "y": 2.0}),
            }],
            ..Default::default()
        });
        state
    }

    #[tokio::test]
    async fn dispatch_marks_resources_and_records_running_skill() {
        let mut state = dispatch_state();
        let executor = RecordingExecutor::default();
        let registry = SkillRegistry::with_builtins();

        run(&mut state, &executor, &registry, "thread-1").await.unwrap();

        assert_eq!(state.skills.running.len(), 1);
        assert!(state.robot.is_busy(Resource::Base));
        let keys = executor.dispatched_keys.lock().unwrap();
        assert_eq!(keys[0], "thread-1:3:0");
    }

    #[tokio::test]
    async fn replaying_the_same_iter_does_not_duplicate_dispatch() {
        let executor = RecordingExecutor::default();
        let registry = SkillRegistry::with_builtins();

        let mut first = dispatch_state();
        run(&mut first, &executor, &registry, "thread-1").await.unwrap();

        let mut replay = dispatch_state();
        run(&mut replay, &executor, &registry, "thread-1").await.unwrap();

        assert_eq!(executor.dispatched_keys.lock().unwrap().len(), 1);
    }
}
