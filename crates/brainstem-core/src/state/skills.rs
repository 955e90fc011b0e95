//! Skill-execution sub-state (§3 `Skills`).
//!
//! The static catalog ([`crate::registry::SkillRegistry`]) lives in its own
//! module since it is read-mostly and shared across threads; this module
//! holds only the per-thread dynamic state: what's currently running and
//! the last reported result.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::robot::Resource;

/// Terminal status of a finished skill invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultStatus {
    /// The skill completed its goal.
    Success,
    /// The skill ended in error.
    Failed,
    /// The skill was cancelled before completion.
    Cancelled,
}

/// The result of a finished (or cancelled) skill invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillResult {
    /// Terminal status.
    pub status: ResultStatus,
    /// Structured error code from `registry.error_map`, when `status != SUCCESS`.
    pub error_code: Option<String>,
    /// Human-readable error detail.
    pub error_msg: Option<String>,
    /// Free-form numeric metrics reported by the executor (duration, distance, etc).
    pub metrics: HashMap<String, f64>,
}

/// A skill invocation currently in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningSkill {
    /// The goal id this invocation serves (usually the owning task's id).
    pub goal_id: String,
    /// Name of the skill in `registry`.
    pub skill_name: String,
    /// Params the skill was dispatched with, kept so RETRY can re-dispatch
    /// the same skill+params rather than an empty param set (§4.3 R3).
    pub params: serde_json::Value,
    /// Executor-assigned invocation id, used for cancel/poll.
    pub invocation_id: String,
    /// When the invocation was dispatched.
    pub start_time: chrono::DateTime<chrono::Utc>,
    /// Timeout copied from the skill's `SkillDef` at dispatch time.
    pub timeout_s: f64,
    /// Resources this invocation holds exclusively.
    pub resources_occupied: Vec<Resource>,
}

impl RunningSkill {
    /// Whether, as of `now`, this invocation has exceeded its timeout.
    pub fn is_timed_out(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        (now - self.start_time).num_milliseconds() as f64 > self.timeout_s * 1000.0
    }
}

/// Dynamic per-thread skill-execution sub-state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillsState {
    /// Invocations currently in flight.
    pub running: Vec<RunningSkill>,
    /// Most recent terminal result, published by R7.
    pub last_result: Option<SkillResult>,
    /// Consecutive failures for the currently active skill name, used by R8's
    /// "consecutive_failure" exit condition.
    pub consecutive_failures: u32,
    /// Name of the skill the `consecutive_failures` counter is tracking.
    pub last_failed_skill: Option<String>,
}

impl SkillsState {
    /// Record a terminal result, updating the consecutive-failure counter.
    pub fn record_result(&mut self, skill_name: &str, result: SkillResult) {
        if result.status == ResultStatus::Failed {
            if self.last_failed_skill.as_deref() == Some(skill_name) {
                self.consecutive_failures += 1;
            } else {
                self.consecutive_failures = 1;
                self.last_failed_skill = Some(skill_name.to_string());
            }
        } else {
            self.consecutive_failures = 0;
            self.last_failed_skill = None;
        }
        self.last_result = Some(result);
    }
}
