//! R7 Observe_Result (§4.3): polls feedback/results for all running skills.

use brainstem_core::state::{BrainState, Message, ResultStatus, SkillResult};
use chrono::Utc;

use crate::error::Result;
use crate::ports::{PollOutcome, SkillExecutor};

/// Run R7: writes `state.skills.running`, `state.skills.last_result`, and
/// appends a tool-result message for each completed/timed-out skill.
pub async fn run(state: &mut BrainState, executor: &dyn SkillExecutor) -> Result<()> {
    let now = Utc::now();
    let mut still_running = Vec::new();

    for running in std::mem::take(&mut state.skills.running) {
        if running.is_timed_out(now) {
            let result = SkillResult {
                status: ResultStatus::Failed,
                error_code: Some("TIMEOUT".to_string()),
                error_msg: Some(format!("{} exceeded {}s", running.skill_name, running.timeout_s)),
                metrics: Default::default(),
            };
            state.messages.push(Message {
                role: "tool".to_string(),
                content: format!("{} timed out", running.skill_name),
            });
            state.skills.record_result(&running.skill_name, result);
            continue;
        }

        match executor.poll(&running.invocation_id).await? {
            PollOutcome::Running { feedback } => {
                if let Some(text) = feedback {
                    state.messages.push(Message {
                        role: "tool".to_string(),
                        content: text,
                    });
                }
                still_running.push(running);
            }
            PollOutcome::Done(result) => {
                state.messages.push(Message {
                    role: "tool".to_string(),
                    content: format!("{} finished: {:?}", running.skill_name, result.status),
                });
                state.skills.record_result(&running.skill_name, result);
            }
        }
    }

    state.skills.running = still_running;
    Ok(())
}
