//! Human/HCI-facing sub-state (§3 `HCI`).

use serde::{Deserialize, Serialize};

/// Why the user interrupted, if they did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserInterrupt {
    /// No interrupt this tick.
    None,
    /// "pause" / "暂停".
    Pause,
    /// "stop" / "紧急停止".
    Stop,
    /// A recognized goal utterance, e.g. "go to kitchen" / "去厨房".
    NewGoal {
        /// The raw goal text extracted from the utterance.
        goal_text: String,
    },
}

impl Default for UserInterrupt {
    fn default() -> Self {
        UserInterrupt::None
    }
}

/// A human's response to an R5 approval request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalResponse {
    /// Accept the proposed ops unchanged.
    Approve,
    /// Accept with parameter edits, keyed by op index.
    Edit {
        /// Parameter overrides, keyed by the index into the pending `to_dispatch` list.
        edits: std::collections::HashMap<usize, serde_json::Value>,
    },
    /// Reject; R8 will exit with stop_reason "user_rejected" and decision becomes ABORT.
    Reject,
}

/// Human/interface sub-state: the latest utterance, any interrupt it carries,
/// and a pending approval response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HciState {
    /// The most recent user utterance, preserved verbatim.
    pub user_utterance: String,
    /// The interrupt K1 classified `user_utterance` into.
    pub user_interrupt: UserInterrupt,
    /// Set by the host when resuming a thread suspended at R5.
    pub approval_response: Option<ApprovalResponse>,
}
