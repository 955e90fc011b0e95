//! K4 Event_Arbitrate: the sole priority authority (§4.2).
//!
//! Evaluated top-down against a fixed six-rank table; first match wins, so
//! ties between ranks always resolve to the lower rank number.

use crate::state::{BrainState, Mode, PreemptReason, UserInterrupt};

/// Battery-percentage cutoffs K4 arbitrates against (§4.2 ranks 1-2),
/// supplied by the host since they are a configurable surface, not part of
/// `BrainState`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryThresholds {
    /// Below this, rank 1 forces SAFE.
    pub safe: f64,
    /// Below this (and at/above `safe`), rank 2 forces CHARGE.
    pub charge: f64,
}

impl Default for BatteryThresholds {
    fn default() -> Self {
        Self {
            safe: 5.0,
            charge: 20.0,
        }
    }
}

/// Run K4: writes `state.tasks.mode`, `state.tasks.preempt_flag`,
/// `state.tasks.preempt_reason`, and appends a rationale to `state.trace`.
pub fn run(state: &mut BrainState, thresholds: BatteryThresholds) {
    let (mode, preempt_flag, reason) = arbitrate(state, thresholds);

    state.tasks.mode = mode;
    state.tasks.preempt_flag = preempt_flag;
    state.tasks.preempt_reason = reason;
    state.trace.push(format!(
        "K4: mode={mode:?} preempt={preempt_flag} reason={reason:?}"
    ));
}

fn arbitrate(state: &BrainState, thresholds: BatteryThresholds) -> (Mode, bool, PreemptReason) {
    let queue_non_empty =
        state.tasks.active_task_id.is_some() || !state.tasks.queue.is_empty();

    // Rank 1: safety.
    if state.robot.battery_pct < thresholds.safe || state.robot.collision_risk {
        return (Mode::Safe, true, PreemptReason::Safety);
    }
    // Rank 2: battery.
    if state.robot.battery_pct < thresholds.charge {
        return (Mode::Charge, true, PreemptReason::Battery);
    }
    // Rank 3: user stop.
    if state.hci.user_interrupt == UserInterrupt::Stop {
        return (Mode::Idle, true, PreemptReason::UserStop);
    }
    // Rank 4: user pause.
    if state.hci.user_interrupt == UserInterrupt::Pause {
        return (Mode::Idle, false, PreemptReason::UserPause);
    }
    // Rank 5: work queued.
    if queue_non_empty {
        return (Mode::Exec, false, PreemptReason::None);
    }
    // Rank 6: otherwise.
    (Mode::Idle, false, PreemptReason::None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Task;

    fn queued_task(state: &mut BrainState) {
        state.tasks.queue.push(Task {
            id: "t1".to_string(),
            goal: "navigate_to:kitchen".to_string(),
            priority: 0,
            deadline: None,
            resources_required: Default::default(),
            preemptible: true,
            status: crate::state::TaskStatus::Pending,
            arrival_seq: 0,
        });
    }

    #[test]
    fn critical_battery_forces_safe_regardless_of_queue() {
        let mut state = BrainState::new();
        state.robot.battery_pct = 3.0;
        queued_task(&mut state);
        run(&mut state, BatteryThresholds::default());
        assert_eq!(state.tasks.mode, Mode::Safe);
        assert!(state.tasks.preempt_flag);
        assert_eq!(state.tasks.preempt_reason, PreemptReason::Safety);
    }

    #[test]
    fn collision_risk_forces_safe() {
        let mut state = BrainState::new();
        state.robot.battery_pct = 80.0;
        state.robot.collision_risk = true;
        run(&mut state, BatteryThresholds::default());
        assert_eq!(state.tasks.mode, Mode::Safe);
        assert!(state.tasks.preempt_flag);
    }

    #[test]
    fn low_battery_ranks_below_safety_but_above_everything_else() {
        let mut state = BrainState::new();
        state.robot.battery_pct = 18.0;
        state.hci.user_interrupt = UserInterrupt::Stop;
        run(&mut state, BatteryThresholds::default());
        assert_eq!(state.tasks.mode, Mode::Charge);
        assert_eq!(state.tasks.preempt_reason, PreemptReason::Battery);
    }

    #[test]
    fn user_stop_preempts_to_idle() {
        let mut state = BrainState::new();
        state.robot.battery_pct = 80.0;
        state.hci.user_interrupt = UserInterrupt::Stop;
        queued_task(&mut state);
        run(&mut state, BatteryThresholds::default());
        assert_eq!(state.tasks.mode, Mode::Idle);
        assert!(state.tasks.preempt_flag);
        assert_eq!(state.tasks.preempt_reason, PreemptReason::UserStop);
    }

    #[test]
    fn user_pause_does_not_set_preempt_flag() {
        let mut state = BrainState::new();
        state.robot.battery_pct = 80.0;
        state.hci.user_interrupt = UserInterrupt::Pause;
        run(&mut state, BatteryThresholds::default());
        assert_eq!(state.tasks.mode, Mode::Idle);
        assert!(!state.tasks.preempt_flag);
        assert_eq!(state.tasks.preempt_reason, PreemptReason::UserPause);
    }

    #[test]
    fn non_empty_queue_with_no_interrupt_enters_exec() {
        let mut state = BrainState::new();
        state.robot.battery_pct = 80.0;
        queued_task(&mut state);
        run(&mut state, BatteryThresholds::default());
        assert_eq!(state.tasks.mode, Mode::Exec);
        assert!(!state.tasks.preempt_flag);
    }

    #[test]
    fn empty_queue_with_no_interrupt_is_idle() {
        let mut state = BrainState::new();
        state.robot.battery_pct = 80.0;
        run(&mut state, BatteryThresholds::default());
        assert_eq!(state.tasks.mode, Mode::Idle);
        assert!(!state.tasks.preempt_flag);
        assert_eq!(state.tasks.preempt_reason, PreemptReason::None);
    }

    #[test]
    fn configured_thresholds_override_the_defaults() {
        let mut state = BrainState::new();
        state.robot.battery_pct = 40.0;
        run(
            &mut state,
            BatteryThresholds {
                safe: 10.0,
                charge: 50.0,
            },
        );
        assert_eq!(state.tasks.mode, Mode::Charge);
        assert_eq!(state.tasks.preempt_reason, PreemptReason::Battery);
    }
}
