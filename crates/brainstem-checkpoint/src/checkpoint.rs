//! Checkpoint value types.
//!
//! A [`Checkpoint`] is an opaque snapshot of a thread's `BrainState`, taken
//! after every Kernel/ReAct node per §6. Unlike the
//! channel-versioned checkpoints this crate's lineage descends from, the
//! decision core's state is a single monolithic value (not a set of
//! independently-versioned channels), so one scalar `step_index` plays the
//! role the channel version map used to play: it is what the driver bumps
//! after every node and what callers key a specific checkpoint by.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque checkpoint identifier (a UUID string).
pub type CheckpointId = String;

/// A versioned, timestamped snapshot of a thread's `BrainState`.
///
/// `state` holds the full serialized state (the byte-string encoding
/// required by §3's round-trip invariant, represented here as
/// `serde_json::Value` rather than raw bytes since every backend in this
/// crate serializes through JSON anyway).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint format version (currently 1).
    pub v: i32,
    /// Unique id of this checkpoint.
    pub id: CheckpointId,
    /// Creation timestamp.
    pub ts: DateTime<Utc>,
    /// Monotonic step counter within the owning thread; bumped by the
    /// graph driver after every Kernel/ReAct node executes.
    pub step_index: u64,
    /// Name of the node whose execution produced this checkpoint, e.g.
    /// `"K4"` or `"R6"`. `None` for the initial (pre-K1) checkpoint.
    pub node: Option<String>,
    /// The full serialized `BrainState`.
    pub state: serde_json::Value,
}

impl Checkpoint {
    /// Current checkpoint format version.
    pub const CURRENT_VERSION: i32 = 1;

    /// Build a new checkpoint from an already-serialized state value.
    pub fn new(step_index: u64, node: Option<String>, state: serde_json::Value) -> Self {
        Self {
            v: Self::CURRENT_VERSION,
            id: Uuid::new_v4().to_string(),
            ts: Utc::now(),
            step_index,
            node,
            state,
        }
    }
}

/// Addresses a checkpoint (or a thread's latest checkpoint) for read/write.
///
/// Mirrors the `(thread_id, step_index)` keying required by §6: supplying
/// only `thread_id` resolves to the latest checkpoint for that thread;
/// supplying `step_index` as well resolves to that exact step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckpointConfig {
    /// Thread id grouping all checkpoints of one logical conversation/task session.
    pub thread_id: Option<String>,
    /// Specific step to retrieve; `None` means "latest".
    pub step_index: Option<u64>,
}

impl CheckpointConfig {
    /// Build a config addressing the latest checkpoint of `thread_id`.
    pub fn new(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: Some(thread_id.into()),
            step_index: None,
        }
    }

    /// Narrow this config to a specific step.
    pub fn at_step(mut self, step_index: u64) -> Self {
        self.step_index = Some(step_index);
        self
    }
}

/// Free-form metadata recorded alongside a checkpoint (source, parent, etc.).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckpointMetadata {
    /// Which node produced this checkpoint.
    pub node: Option<String>,
    /// Arbitrary extra fields (e.g. routing token, interrupt reason).
    #[serde(flatten)]
    pub extra: std::collections::HashMap<String, serde_json::Value>,
}

/// A checkpoint together with its config and metadata, as returned by reads.
#[derive(Debug, Clone)]
pub struct CheckpointTuple {
    /// The config that resolves to this checkpoint (with a concrete `step_index`).
    pub config: CheckpointConfig,
    /// The checkpoint itself.
    pub checkpoint: Checkpoint,
    /// Metadata recorded with the checkpoint.
    pub metadata: CheckpointMetadata,
}
