//! R5 Human_Approval (§4.3): optionally suspends the graph for human input.

use brainstem_core::state::{ApprovalResponse, BrainState, DecisionType};
use brainstem_core::SkillRegistry;

use super::r4_guardrails_check;

/// Outcome of an R5 pass.
#[derive(Debug, Clone, PartialEq)]
pub enum ApprovalOutcome {
    /// `need_approval` was false; nothing to do.
    PassThrough,
    /// `need_approval` is true and no response has arrived yet: the host
    /// must suspend the thread here and resume later with
    /// `hci.approval_response` set.
    Suspend,
    /// A response arrived and was applied.
    Resumed,
}

/// Run R5. If suspending, the caller should persist a checkpoint and
/// return control to the host (§5, §9's coroutine-style suspension note).
pub fn run(state: &mut BrainState, registry: &SkillRegistry) -> ApprovalOutcome {
    let need_approval = state
        .react
        .proposed_ops
        .as_ref()
        .map(|ops| ops.need_approval)
        .unwrap_or(false);
    if !need_approval {
        return ApprovalOutcome::PassThrough;
    }

    let Some(response) = state.hci.approval_response.take() else {
        return ApprovalOutcome::Suspend;
    };

    match response {
        ApprovalResponse::Approve => {}
        ApprovalResponse::Edit { edits } => {
            if let Some(ops) = state.react.proposed_ops.as_mut() {
                for (index, params) in edits {
                    if let Some(op) = ops.to_dispatch.get_mut(index) {
                        op.params = params;
                    }
                }
            }
            r4_guardrails_check::run(state, registry);
        }
        ApprovalResponse::Reject => {
            if let Some(ops) = state.react.proposed_ops.as_mut() {
                ops.to_dispatch.clear();
            }
            if let Some(decision) = state.react.decision.as_mut() {
                decision.decision_type = Some(DecisionType::Abort);
            }
        }
    }

    ApprovalOutcome::Resumed
}
