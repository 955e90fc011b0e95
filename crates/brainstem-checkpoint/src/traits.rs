//! The [`CheckpointSaver`] trait implemented by each storage backend.

use async_trait::async_trait;

use crate::checkpoint::{Checkpoint, CheckpointConfig, CheckpointMetadata, CheckpointTuple};
use crate::error::Result;

/// Filter options for [`CheckpointSaver::list`].
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Only return checkpoints at or before this step.
    pub before_step: Option<u64>,
    /// Maximum number of entries to return.
    pub limit: Option<usize>,
}

/// Persists and retrieves `BrainState` checkpoints.
///
/// Every tick of the outer Kernel loop and every node of the inner ReAct
/// loop checkpoints through this trait (§6), so an implementation must be
/// safe to call from `async` node bodies and must make `put` idempotent:
/// writing the same `(thread_id, step_index)` twice is expected during
/// replay and must not duplicate entries.
#[async_trait]
pub trait CheckpointSaver: Send + Sync {
    /// Fetch a checkpoint, discarding its metadata. Convenience wrapper
    /// around [`CheckpointSaver::get_tuple`].
    async fn get(&self, config: &CheckpointConfig) -> Result<Option<Checkpoint>> {
        Ok(self.get_tuple(config).await?.map(|t| t.checkpoint))
    }

    /// Fetch a checkpoint together with its resolved config and metadata.
    ///
    /// When `config.step_index` is `None`, resolves to the thread's most
    /// recent checkpoint.
    async fn get_tuple(&self, config: &CheckpointConfig) -> Result<Option<CheckpointTuple>>;

    /// List a thread's checkpoints, most recent first.
    async fn list(
        &self,
        thread_id: &str,
        options: &ListOptions,
    ) -> Result<Vec<CheckpointTuple>>;

    /// Persist a checkpoint for a thread.
    async fn put(
        &self,
        thread_id: &str,
        checkpoint: Checkpoint,
        metadata: CheckpointMetadata,
    ) -> Result<CheckpointConfig>;
}
