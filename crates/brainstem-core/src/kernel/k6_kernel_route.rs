//! K6 Kernel_Route: maps mode to a routing token (§4.2).

use crate::state::{BrainState, Mode, OpDescriptor};

/// Where the host loop should go next after the Kernel pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// Synthesize and dispatch a one-shot `StopBase`, bypassing ReAct.
    SafeHandler(OpDescriptor),
    /// Synthesize and dispatch a one-shot navigate-to-charger, bypassing ReAct.
    ChargeHandler(OpDescriptor),
    /// Enter the inner ReAct loop (R1..R8).
    ExecEnterReact,
    /// Nothing to do this tick.
    IdleYield,
}

/// Run K6: writes nothing structural, returns the routing token.
///
/// `charging_station` parameterizes the synthesized CHARGE-mode op; it is
/// supplied by the host since it is not part of `BrainState`.
pub fn run(state: &BrainState, charging_station: (f64, f64)) -> Route {
    match state.tasks.mode {
        Mode::Safe => Route::SafeHandler(OpDescriptor {
            skill_name: "StopBase".to_string(),
            params: serde_json::json!({}),
        }),
        Mode::Charge => Route::ChargeHandler(OpDescriptor {
            skill_name: "NavigateToPose".to_string(),
            params: serde_json::json!({
                "x": charging_station.0,
                "y": charging_station.1,
                "zone": "charging_station",
            }),
        }),
        Mode::Exec => Route::ExecEnterReact,
        Mode::Idle => Route::IdleYield,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_mode_routes_to_stop_base() {
        let mut state = BrainState::new();
        state.tasks.mode = Mode::Safe;
        match run(&state, (0.0, 0.0)) {
            Route::SafeHandler(op) => assert_eq!(op.skill_name, "StopBase"),
            other => panic!("expected SafeHandler, got {other:?}"),
        }
    }

    #[test]
    fn charge_mode_routes_to_navigate_charging_station() {
        let mut state = BrainState::new();
        state.tasks.mode = Mode::Charge;
        match run(&state, (1.0, 2.0)) {
            Route::ChargeHandler(op) => {
                assert_eq!(op.skill_name, "NavigateToPose");
                assert_eq!(op.params["zone"], "charging_station");
            }
            other => panic!("expected ChargeHandler, got {other:?}"),
        }
    }

    #[test]
    fn exec_mode_enters_react() {
        let mut state = BrainState::new();
        state.tasks.mode = Mode::Exec;
        assert_eq!(run(&state, (0.0, 0.0)), Route::ExecEnterReact);
    }

    #[test]
    fn idle_mode_yields() {
        let state = BrainState::new();
        assert_eq!(run(&state, (0.0, 0.0)), Route::IdleYield);
    }
}
