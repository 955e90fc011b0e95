//! `BrainState`: the single monolithic, checkpointable state aggregate (§3).

pub mod hci;
pub mod react;
pub mod robot;
pub mod skills;
pub mod tasks;
pub mod trace;
pub mod world;

pub use hci::{ApprovalResponse, HciState, UserInterrupt};
pub use react::{ApprovalPayload, Decision, DecisionType, Observation, OpDescriptor, ProposedOps, ReactState};
pub use robot::{BatteryStatus, Pose, Resource, RobotState, Twist};
pub use skills::{ResultStatus, RunningSkill, SkillResult, SkillsState};
pub use tasks::{Mode, PreemptReason, Task, TaskStatus, TasksState};
pub use trace::{Message, TraceState};
pub use world::{ObstacleRecord, WorldState};

use serde::{Deserialize, Serialize};

/// The single aggregate carried through the Kernel and ReAct graphs.
///
/// Every field is a value-typed sub-state written by exactly one node
/// (the "one writer rule", enforced by convention in `kernel`/the
/// `brainstem-react` crate, not by the type system). The whole aggregate
/// must round-trip through serialization identically (invariant 6): this
/// is what makes it usable as a checkpoint payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrainState {
    /// Human/interface sub-state.
    pub hci: HciState,
    /// Semantic world-model sub-state.
    pub world: WorldState,
    /// Objective telemetry sub-state.
    pub robot: RobotState,
    /// Task queue and mode sub-state.
    pub tasks: TasksState,
    /// Dynamic skill-execution sub-state.
    pub skills: SkillsState,
    /// Inner ReAct loop working memory.
    pub react: ReactState,
    /// Explainability trace.
    pub trace: TraceState,
    /// Chat-style message transcript threaded to the oracle.
    pub messages: Vec<Message>,
}

impl BrainState {
    /// A freshly created, empty state (mode IDLE, no tasks, no messages).
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize to the canonical checkpoint byte form (JSON).
    ///
    /// Exists as a named, tested choke point for invariant 6 rather than
    /// leaving callers to reach for `serde_json` directly.
    pub fn to_checkpoint_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    /// Restore from a checkpoint byte form produced by [`BrainState::to_checkpoint_value`].
    pub fn from_checkpoint_value(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}
