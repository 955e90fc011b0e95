//! Task-queue sub-state (§3 `Tasks`).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::robot::Resource;

/// The four-valued scheduler mode (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Nothing to do; ReAct is not entered.
    Idle,
    /// A task is active; the inner ReAct loop drives it.
    Exec,
    /// Safety override; bypasses ReAct with a one-shot StopBase.
    Safe,
    /// Low-battery override; bypasses ReAct with a one-shot navigate-to-charger.
    Charge,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Idle
    }
}

/// Why K4 set `preempt_flag` this tick, for the trace log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PreemptReason {
    /// Rank 1: collision risk or critical battery.
    Safety,
    /// Rank 2: low battery.
    Battery,
    /// Rank 3: user said stop.
    UserStop,
    /// Rank 4: user said pause.
    UserPause,
    /// No preemption this tick.
    None,
}

impl Default for PreemptReason {
    fn default() -> Self {
        PreemptReason::None
    }
}

/// Lifecycle status of a queued task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Waiting in queue.
    Pending,
    /// Currently the active task.
    Active,
    /// Finished successfully.
    Completed,
    /// Finished unsuccessfully or aborted.
    Failed,
    /// Preempted before completion; eligible to re-enter queue.
    Preempted,
}

/// A single goal-directed unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Stable, unique task id (assigned by K5).
    pub id: String,
    /// The goal text this task pursues, e.g. "navigate_to:kitchen".
    pub goal: String,
    /// Scheduling priority; higher sorts first.
    pub priority: i32,
    /// Optional deadline (earlier sorts first among equal priority).
    pub deadline: Option<chrono::DateTime<chrono::Utc>>,
    /// Resources this task's skills are expected to require.
    pub resources_required: HashSet<Resource>,
    /// Whether running skills serving this task may be cancelled by preemption.
    pub preemptible: bool,
    /// Current lifecycle status.
    pub status: TaskStatus,
    /// Monotonic arrival order, used as the final sort tiebreaker.
    pub arrival_seq: u64,
}

/// Queue and task-lifecycle sub-state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TasksState {
    /// Raw new goals not yet translated into `Task` records.
    pub inbox: Vec<String>,
    /// Sorted queue of not-yet-completed tasks.
    pub queue: Vec<Task>,
    /// The task currently being pursued by ReAct, if any.
    pub active_task_id: Option<String>,
    /// Current scheduler mode, set fresh by K4 every tick.
    pub mode: Mode,
    /// One-tick signal that preemptible running skills must be cancelled.
    pub preempt_flag: bool,
    /// Why `preempt_flag` was set this tick.
    pub preempt_reason: PreemptReason,
    /// Monotonic counter used to assign `Task::arrival_seq`.
    pub arrival_counter: u64,
}

impl TasksState {
    /// The active task record, if `active_task_id` is set and present in queue.
    pub fn active_task(&self) -> Option<&Task> {
        let id = self.active_task_id.as_ref()?;
        self.queue.iter().find(|t| &t.id == id)
    }

    /// Sort the queue by (priority desc, deadline asc, arrival asc) per §4.2.
    pub fn sort_queue(&mut self) {
        self.queue.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| match (a.deadline, b.deadline) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                })
                .then_with(|| a.arrival_seq.cmp(&b.arrival_seq))
        });
    }
}
