//! R8 Stop_Or_Loop (§4.3): decides whether to exit the ReAct loop and why.

use brainstem_core::state::{BrainState, DecisionType, Mode};

/// Default iteration cap (§4.3 R8 condition 2), overridable by the host config.
pub const DEFAULT_MAX_ITER: u32 = 20;

/// Where the host loop should go next after an R8 pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopOutcome {
    /// Exit the ReAct loop; `state.react.stop_reason` explains why.
    Exit,
    /// Loop back to R1 for another iteration.
    Continue,
}

/// Run R8: writes `state.react.stop_reason`, returns the routing token.
///
/// Exit conditions are checked in the order given by §4.3; the first match
/// wins. A decision forced to ASK_HUMAN by the iter-cap or
/// consecutive-failure conditions is written back so R3/R4 see it on the
/// next pass through this thread (relevant on resume after suspension).
pub fn run(state: &mut BrainState, max_iter: u32) -> LoopOutcome {
    let decision_type = state.react.decision.as_ref().and_then(|d| d.decision_type);

    if matches!(
        decision_type,
        Some(DecisionType::Finish) | Some(DecisionType::Abort) | Some(DecisionType::AskHuman)
    ) {
        state.react.stop_reason = Some(stop_reason_for(decision_type.unwrap()));
        return LoopOutcome::Exit;
    }

    if state.react.iter >= max_iter {
        state.react.stop_reason = Some("iter_cap".to_string());
        force_ask_human(state);
        return LoopOutcome::Exit;
    }

    if state.skills.consecutive_failures >= 3 {
        state.react.stop_reason = Some("consecutive_failure".to_string());
        force_ask_human(state);
        return LoopOutcome::Exit;
    }

    if matches!(state.tasks.mode, Mode::Safe | Mode::Charge) {
        state.react.stop_reason = Some("mode_preempt".to_string());
        return LoopOutcome::Exit;
    }

    if matches!(
        state.hci.approval_response,
        Some(brainstem_core::state::ApprovalResponse::Reject)
    ) {
        state.react.stop_reason = Some("user_rejected".to_string());
        return LoopOutcome::Exit;
    }

    LoopOutcome::Continue
}

fn stop_reason_for(decision_type: DecisionType) -> String {
    match decision_type {
        DecisionType::Finish => "finish".to_string(),
        DecisionType::Abort => "abort".to_string(),
        DecisionType::AskHuman => "ask_human".to_string(),
        other => format!("{other:?}"),
    }
}

fn force_ask_human(state: &mut BrainState) {
    if let Some(decision) = state.react.decision.as_mut() {
        decision.decision_type = Some(DecisionType::AskHuman);
    }
}
