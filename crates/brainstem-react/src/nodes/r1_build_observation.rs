//! R1 Build_Observation (§4.3): composes a structured observation for the oracle.

use brainstem_core::state::{BrainState, Message, Observation};

/// Run R1: writes `state.react.observation`, increments `state.react.iter`,
/// and appends the observation as a tool-result message.
pub fn run(state: &mut BrainState) {
    let active_goal = state.tasks.active_task().map(|t| t.goal.clone());
    let running_skills: Vec<String> = state
        .skills
        .running
        .iter()
        .map(|r| r.skill_name.clone())
        .collect();

    let observation = Observation {
        world_summary: state.world.summary.clone(),
        pose: state.robot.pose,
        battery_pct: state.robot.battery_pct,
        resources: state.robot.resources.clone(),
        active_task_goal: active_goal,
        running_skills,
        last_result: state.skills.last_result.clone(),
    };

    state.react.iter += 1;
    state.messages.push(Message {
        role: "tool".to_string(),
        content: serde_json::to_string(&observation).unwrap_or_default(),
    });
    state.react.observation = Some(observation);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increments_iter_and_captures_observation() {
        let mut state = BrainState::new();
        state.world.summary = "no obstacles".to_string();
        state.robot.battery_pct = 55.0;

        run(&mut state);

        assert_eq!(state.react.iter, 1);
        let obs = state.react.observation.as_ref().unwrap();
        assert_eq!(obs.world_summary, "no obstacles");
        assert_eq!(obs.battery_pct, 55.0);
        assert_eq!(state.messages.len(), 1);
    }

    #[test]
    fn iter_is_monotonic_across_calls() {
        let mut state = BrainState::new();
        run(&mut state);
        run(&mut state);
        run(&mut state);
        assert_eq!(state.react.iter, 3);
    }
}
