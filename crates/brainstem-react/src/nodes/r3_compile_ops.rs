//! R3 Compile_Ops (§4.3): translates a `Decision` into `ProposedOps`.

use brainstem_core::state::{ApprovalPayload, BrainState, DecisionType, OpDescriptor, ProposedOps};

/// Run R3: writes `state.react.proposed_ops` from `state.react.decision`.
pub fn run(state: &mut BrainState) {
    let decision = state
        .react
        .decision
        .clone()
        .expect("R2 must run before R3");
    let running_ids: Vec<String> = state
        .skills
        .running
        .iter()
        .map(|r| r.invocation_id.clone())
        .collect();

    let ops = match decision.decision_type {
        Some(DecisionType::Continue) => ProposedOps {
            to_cancel: Vec::new(),
            to_dispatch: Vec::new(),
            to_speak: Vec::new(),
            need_approval: false,
            approval_payload: None,
        },
        Some(DecisionType::Retry) => {
            let redispatch = state
                .skills
                .running
                .first()
                .map(|r| OpDescriptor {
                    skill_name: r.skill_name.clone(),
                    params: r.params.clone(),
                })
                .into_iter()
                .collect();
            ProposedOps {
                to_cancel: running_ids,
                to_dispatch: redispatch,
                to_speak: Vec::new(),
                need_approval: false,
                approval_payload: None,
            }
        }
        Some(DecisionType::Replan) => ProposedOps {
            to_cancel: running_ids,
            to_dispatch: decision.ops.clone(),
            to_speak: Vec::new(),
            need_approval: false,
            approval_payload: None,
        },
        Some(DecisionType::SwitchTask) => ProposedOps {
            to_cancel: running_ids,
            to_dispatch: decision.ops.clone(),
            to_speak: Vec::new(),
            need_approval: true,
            approval_payload: Some(ApprovalPayload {
                reason: decision
                    .reason
                    .clone()
                    .unwrap_or_else(|| "switch_task".to_string()),
                candidate_ops: decision.ops.clone(),
            }),
        },
        Some(DecisionType::AskHuman) => ProposedOps {
            to_cancel: Vec::new(),
            to_dispatch: Vec::new(),
            to_speak: Vec::new(),
            need_approval: true,
            approval_payload: Some(ApprovalPayload {
                reason: decision
                    .reason
                    .clone()
                    .unwrap_or_else(|| "ask_human".to_string()),
                candidate_ops: decision.ops.clone(),
            }),
        },
        Some(DecisionType::Finish) | Some(DecisionType::Abort) | None => ProposedOps {
            to_cancel: running_ids,
            to_dispatch: Vec::new(),
            to_speak: decision.reason.clone().into_iter().collect(),
            need_approval: false,
            approval_payload: None,
        },
    };

    state.react.proposed_ops = Some(ops);
}
