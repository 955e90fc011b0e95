//! Trace/explainability sub-state (§3 `Trace`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Append-only log of human-readable rationale and a metrics bag.
///
/// Populated by K4, R2, R4, and R6 per §7's propagation policy; never
/// pruned within a thread's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceState {
    /// Explanatory strings, oldest first.
    pub log: Vec<String>,
    /// Free-form numeric metrics (e.g. per-node latencies, retry counts).
    pub metrics: HashMap<String, f64>,
}

impl TraceState {
    /// Append a rationale string.
    pub fn push(&mut self, entry: impl Into<String>) {
        self.log.push(entry.into());
    }
}

/// A single role/content entry in the ReAct message transcript fed to the
/// oracle, in the spirit of a chat-completion message log (§4.3 R1, R7).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// `"user"`, `"assistant"`, or `"tool"`.
    pub role: String,
    /// Message body.
    pub content: String,
}
