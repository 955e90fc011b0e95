//! K5 Task_Queue: drains the inbox, sorts, and picks an active task (§4.2).

use crate::state::{BrainState, Mode, Task, TaskStatus, UserInterrupt};

/// Run K5: writes `state.tasks.inbox`, `state.tasks.queue`, and
/// `state.tasks.active_task_id`.
pub fn run(state: &mut BrainState) {
    drain_inbox(state);

    state.tasks.sort_queue();

    if state.tasks.preempt_flag {
        if let Some(active_id) = state.tasks.active_task_id.clone() {
            let preemptible = state
                .tasks
                .queue
                .iter()
                .find(|t| t.id == active_id)
                .map(|t| t.preemptible)
                .unwrap_or(true);
            if preemptible {
                if let Some(t) = state.tasks.queue.iter_mut().find(|t| t.id == active_id) {
                    t.status = TaskStatus::Preempted;
                }
                state.tasks.active_task_id = None;
            }
        }
    }

    if state.tasks.active_task_id.is_none() && state.tasks.mode == Mode::Exec {
        if let Some(head) = state
            .tasks
            .queue
            .iter_mut()
            .find(|t| t.status == TaskStatus::Pending || t.status == TaskStatus::Preempted)
        {
            head.status = TaskStatus::Active;
            state.tasks.active_task_id = Some(head.id.clone());
        }
    }
}

fn drain_inbox(state: &mut BrainState) {
    // A NEW_GOAL interrupt this tick also seeds the inbox, mirroring K1's
    // classification into a queueable goal.
    if let UserInterrupt::NewGoal { goal_text } = &state.hci.user_interrupt {
        state.tasks.inbox.push(goal_text.clone());
    }

    for goal_text in state.tasks.inbox.drain(..) {
        let arrival_seq = state.tasks.arrival_counter;
        state.tasks.arrival_counter += 1;
        state.tasks.queue.push(Task {
            id: uuid::Uuid::new_v4().to_string(),
            goal: format!("navigate_to:{goal_text}"),
            priority: 0,
            deadline: None,
            resources_required: Default::default(),
            preemptible: true,
            status: TaskStatus::Pending,
            arrival_seq,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Mode;

    #[test]
    fn new_goal_interrupt_becomes_a_queued_task() {
        let mut state = BrainState::new();
        state.hci.user_interrupt = UserInterrupt::NewGoal {
            goal_text: "kitchen".to_string(),
        };
        state.tasks.mode = Mode::Exec;
        run(&mut state);
        assert_eq!(state.tasks.queue.len(), 1);
        assert_eq!(state.tasks.queue[0].goal, "navigate_to:kitchen");
        assert_eq!(state.tasks.active_task_id, Some(state.tasks.queue[0].id.clone()));
    }

    #[test]
    fn queue_is_sorted_by_priority_then_arrival() {
        let mut state = BrainState::new();
        state.tasks.inbox.push("low".to_string());
        run(&mut state);
        state.tasks.inbox.push("also_low".to_string());
        run(&mut state);
        assert_eq!(state.tasks.queue.len(), 2);
        assert_eq!(state.tasks.queue[0].goal, "navigate_to:low");
        assert_eq!(state.tasks.queue[1].goal, "navigate_to:also_low");
    }

    #[test]
    fn preempt_flag_clears_active_task_when_preemptible() {
        let mut state = BrainState::new();
        state.tasks.mode = Mode::Exec;
        state.tasks.inbox.push("kitchen".to_string());
        run(&mut state);
        assert!(state.tasks.active_task_id.is_some());

        state.tasks.preempt_flag = true;
        state.tasks.mode = Mode::Safe;
        run(&mut state);
        assert!(state.tasks.active_task_id.is_none());
        assert_eq!(state.tasks.queue[0].status, TaskStatus::Preempted);
    }

    #[test]
    fn no_active_task_picked_when_mode_is_not_exec() {
        let mut state = BrainState::new();
        state.tasks.inbox.push("kitchen".to_string());
        state.tasks.mode = Mode::Idle;
        run(&mut state);
        assert!(state.tasks.active_task_id.is_none());
    }
}
