//! ReAct sub-state (§3 `ReAct`): the inner loop's working memory.
//!
//! Types here are written by the `brainstem-react` crate's R1-R8 nodes but
//! live in `brainstem-core` alongside the rest of `BrainState` since they
//! are part of the single checkpointed aggregate.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::robot::{Pose, Resource};
use super::skills::SkillResult;

/// The seven-valued Decision type set (§3, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionType {
    /// Keep the current plan running.
    Continue,
    /// Abandon the current plan; produce a new one from scratch.
    Replan,
    /// Re-attempt the exact same op.
    Retry,
    /// Drop the active task in favor of another queued task.
    SwitchTask,
    /// Suspend for human input.
    AskHuman,
    /// The goal is achieved; stop successfully.
    Finish,
    /// Stop unsuccessfully.
    Abort,
}

impl DecisionType {
    /// All seven values, for validating oracle output against the closed set.
    pub const ALL: [DecisionType; 7] = [
        DecisionType::Continue,
        DecisionType::Replan,
        DecisionType::Retry,
        DecisionType::SwitchTask,
        DecisionType::AskHuman,
        DecisionType::Finish,
        DecisionType::Abort,
    ];
}

/// A single op the oracle proposes to run, prior to guardrail validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpDescriptor {
    /// Name of the skill to invoke; validated against the registry by R4.
    pub skill_name: String,
    /// Arguments, validated against the skill's arg schema by R4.
    pub params: serde_json::Value,
}

/// The oracle's structured decision, parsed (with fallback) by R2.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// What the oracle decided to do.
    pub decision_type: Option<DecisionType>,
    /// Free-text rationale, preserved verbatim when present.
    pub reason: Option<String>,
    /// Optional patch describing how the active task's plan should change.
    pub plan_patch: Option<String>,
    /// Candidate ops, preserved verbatim when present.
    pub ops: Vec<OpDescriptor>,
}

/// Ops compiled from a `Decision` by R3, after guardrail review by R4.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProposedOps {
    /// Invocation ids to cancel before dispatching anything new.
    pub to_cancel: Vec<String>,
    /// Ops to dispatch, in order.
    pub to_dispatch: Vec<OpDescriptor>,
    /// Messages to speak via the executor's `speak` operation.
    pub to_speak: Vec<String>,
    /// Whether R5 must suspend for human approval before R6 runs.
    pub need_approval: bool,
    /// Payload shown to the human when `need_approval` is set.
    pub approval_payload: Option<ApprovalPayload>,
}

/// What a pending approval request shows the human.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalPayload {
    /// Why approval is being requested.
    pub reason: String,
    /// The ops awaiting approval.
    pub candidate_ops: Vec<OpDescriptor>,
}

/// A structured snapshot of the current situation, built by R1 for the oracle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// World summary as of this iteration.
    pub world_summary: String,
    /// Current pose.
    pub pose: Pose,
    /// Current battery percentage.
    pub battery_pct: f64,
    /// Which resources are currently busy.
    pub resources: HashMap<Resource, bool>,
    /// The active task's goal text, if any.
    pub active_task_goal: Option<String>,
    /// Names of currently running skills.
    pub running_skills: Vec<String>,
    /// The most recent terminal skill result, if any.
    pub last_result: Option<SkillResult>,
}

/// Inner-loop working memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReactState {
    /// Iteration counter within the current EXEC entry; reset to 0 on every
    /// fresh entry, strictly monotonic within a loop (invariant 5).
    pub iter: u32,
    /// The observation R1 most recently built.
    pub observation: Option<Observation>,
    /// The decision R2 most recently produced.
    pub decision: Option<Decision>,
    /// The ops R3/R4/R5 most recently compiled and validated.
    pub proposed_ops: Option<ProposedOps>,
    /// Why R8 most recently exited the loop.
    pub stop_reason: Option<String>,
}
