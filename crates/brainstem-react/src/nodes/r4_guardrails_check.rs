//! R4 Guardrails_Check (§4.3): validates proposed ops before dispatch.

use brainstem_core::state::{BrainState, DecisionType, Mode, ResultStatus, SkillResult};
use brainstem_core::SkillRegistry;

/// Run R4: rewrites `state.react.proposed_ops` (and `state.react.decision.type`)
/// in place, rejecting ops that violate the registry, arg schema, or
/// resource-exclusivity rules, and demoting mode-unsafe ops to ASK_HUMAN.
pub fn run(state: &mut BrainState, registry: &SkillRegistry) {
    let mode = state.tasks.mode;
    let Some(mut ops) = state.react.proposed_ops.clone() else {
        return;
    };
    let Some(mut decision) = state.react.decision.clone() else {
        return;
    };

    let occupied_by_non_preemptible: std::collections::HashSet<_> = state
        .skills
        .running
        .iter()
        .filter(|r| {
            registry
                .get(&r.skill_name)
                .map(|d| !d.preemptible)
                .unwrap_or(true)
        })
        .flat_map(|r| r.resources_occupied.iter().copied())
        .collect();

    let mut rejection: Option<(&'static str, String)> = None;

    for op in &ops.to_dispatch {
        let Ok(def) = registry.get(&op.skill_name) else {
            rejection = Some(("REJECT_UNKNOWN_SKILL", format!("unknown skill: {}", op.skill_name)));
            break;
        };
        if !validate_params(&def.arg_schema, &op.params) {
            rejection = Some((
                "REJECT_PARAMS",
                format!("invalid params for {}", op.skill_name),
            ));
            break;
        }
        if def
            .resources_required
            .iter()
            .any(|r| occupied_by_non_preemptible.contains(r))
        {
            rejection = Some((
                "REJECT_RESOURCE_CONFLICT",
                format!("resource conflict dispatching {}", op.skill_name),
            ));
            break;
        }
    }

    if let Some((error_code, error_msg)) = rejection {
        let recoverable = error_code == "REJECT_RESOURCE_CONFLICT";
        state.skills.last_result = Some(SkillResult {
            status: ResultStatus::Failed,
            error_code: Some(error_code.to_string()),
            error_msg: Some(error_msg),
            metrics: Default::default(),
        });
        decision.decision_type = Some(if recoverable {
            DecisionType::Replan
        } else {
            DecisionType::AskHuman
        });
        ops.to_dispatch.clear();
        state.react.decision = Some(decision.clone());
        state.react.proposed_ops = Some(ops);
        return;
    }

    // Mode-safety demotion: while SAFE/CHARGE, only the mode's own canonical
    // response may claim the resource it owns; anything else needing a
    // resource is demoted to ASK_HUMAN rather than dispatched underneath it.
    if matches!(mode, Mode::Safe | Mode::Charge) {
        let canonical = match mode {
            Mode::Safe => "StopBase",
            Mode::Charge => "NavigateToPose",
            _ => unreachable!(),
        };
        let offending = ops
            .to_dispatch
            .iter()
            .any(|op| op.skill_name != canonical && registry.get(&op.skill_name).is_ok());
        if offending {
            decision.decision_type = Some(DecisionType::AskHuman);
            ops.need_approval = true;
            ops.to_dispatch.clear();
        }
    }

    state.react.decision = Some(decision);
    state.react.proposed_ops = Some(ops);
}

fn validate_params(schema: &serde_json::Value, params: &serde_json::Value) -> bool {
    let Some(required) = schema.get("required").and_then(|v| v.as_array()) else {
        return true;
    };
    required
        .iter()
        .filter_map(|v| v.as_str())
        .all(|field| params.get(field).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use brainstem_core::state::{Decision, OpDescriptor, ProposedOps};

    fn base_state_with(decision_type: DecisionType, to_dispatch: Vec<OpDescriptor>) -> BrainState {
        let mut state = BrainState::new();
        state.react.decision = Some(Decision {
            decision_type: Some(decision_type),
            ..Default::default()
        });
        state.react.proposed_ops = Some(ProposedOps {
            to_dispatch,
            ..Default::default()
        });
        state
    }

    #[test]
    fn unknown_skill_is_rejected() {
        let registry = SkillRegistry::with_builtins();
        let mut state = base_state_with(
            DecisionType::Replan,
            vec![OpDescriptor {
                skill_name: "FlyToMoon".to_string(),
                params: serde_json::json!({}),
            }],
        );
        run(&mut state, &registry);
        let result = state.skills.last_result.unwrap();
        assert_eq!(result.error_code.as_deref(), Some("REJECT_UNKNOWN_SKILL"));
        assert_eq!(
            state.react.decision.unwrap().decision_type,
            Some(DecisionType::AskHuman)
        );
    }

    #[test]
    fn missing_required_param_is_rejected() {
        let registry = SkillRegistry::with_builtins();
        let mut state = base_state_with(
            DecisionType::Replan,
            vec![OpDescriptor {
                skill_name: "NavigateToPose".to_string(),
                params: serde_json::json!({"y": 1.0}),
            }],
        );
        run(&mut state, &registry);
        let result = state.skills.last_result.unwrap();
        assert_eq!(result.error_code.as_deref(), Some("REJECT_PARAMS"));
    }

    #[test]
    fn valid_op_passes_through_unchanged() {
        let registry = SkillRegistry::with_builtins();
        let mut state = base_state_with(
            DecisionType::Replan,
            vec![OpDescriptor {
                skill_name: "NavigateToPose".to_string(),
                params: serde_json::json!({"x": 1.0, "y": 2.0}),
            }],
        );
        run(&mut state, &registry);
        assert!(state.skills.last_result.is_none());
        assert_eq!(state.react.proposed_ops.unwrap().to_dispatch.len(), 1);
    }
}
