//! An in-memory [`CheckpointSaver`], suitable for tests and ephemeral runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::checkpoint::{Checkpoint, CheckpointConfig, CheckpointMetadata, CheckpointTuple};
use crate::error::{CheckpointError, Result};
use crate::traits::{CheckpointSaver, ListOptions};

#[derive(Clone)]
struct Entry {
    checkpoint: Checkpoint,
    metadata: CheckpointMetadata,
}

/// Stores every thread's checkpoints in a `HashMap` guarded by a `RwLock`.
///
/// Checkpoints for a thread are appended in order; `step_index` is assumed
/// to be monotonically increasing per thread, so "latest" is always the
/// last entry in the thread's `Vec`.
pub struct InMemoryCheckpointSaver {
    storage: Arc<RwLock<HashMap<String, Vec<Entry>>>>,
}

impl InMemoryCheckpointSaver {
    /// Create an empty saver.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of distinct threads with at least one checkpoint.
    pub async fn thread_count(&self) -> usize {
        self.storage.read().await.len()
    }

    /// Number of checkpoints stored for `thread_id`.
    pub async fn checkpoint_count(&self, thread_id: &str) -> usize {
        self.storage
            .read()
            .await
            .get(thread_id)
            .map(|v| v.len())
            .unwrap_or(0)
    }

    /// Drop every stored checkpoint.
    pub async fn clear(&self) {
        self.storage.write().await.clear();
    }
}

impl Default for InMemoryCheckpointSaver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CheckpointSaver for InMemoryCheckpointSaver {
    async fn get_tuple(&self, config: &CheckpointConfig) -> Result<Option<CheckpointTuple>> {
        let thread_id = config
            .thread_id
            .as_ref()
            .ok_or(CheckpointError::MissingThreadId)?;
        let storage = self.storage.read().await;
        let Some(entries) = storage.get(thread_id) else {
            return Ok(None);
        };
        let found = match config.step_index {
            Some(step) => entries.iter().find(|e| e.checkpoint.step_index == step),
            None => entries.last(),
        };
        Ok(found.map(|e| CheckpointTuple {
            config: CheckpointConfig::new(thread_id.clone()).at_step(e.checkpoint.step_index),
            checkpoint: e.checkpoint.clone(),
            metadata: e.metadata.clone(),
        }))
    }

    async fn list(&self, thread_id: &str, options: &ListOptions) -> Result<Vec<CheckpointTuple>> {
        let storage = self.storage.read().await;
        let Some(entries) = storage.get(thread_id) else {
            return Ok(Vec::new());
        };
        let mut out: Vec<CheckpointTuple> = entries
            .iter()
            .rev()
            .filter(|e| match options.before_step {
                Some(before) => e.checkpoint.step_index <= before,
                None => true,
            })
            .map(|e| CheckpointTuple {
                config: CheckpointConfig::new(thread_id.to_string())
                    .at_step(e.checkpoint.step_index),
                checkpoint: e.checkpoint.clone(),
                metadata: e.metadata.clone(),
            })
            .collect();
        if let Some(limit) = options.limit {
            out.truncate(limit);
        }
        Ok(out)
    }

    async fn put(
        &self,
        thread_id: &str,
        checkpoint: Checkpoint,
        metadata: CheckpointMetadata,
    ) -> Result<CheckpointConfig> {
        let mut storage = self.storage.write().await;
        let entries = storage.entry(thread_id.to_string()).or_default();
        let step_index = checkpoint.step_index;
        entries.retain(|e| e.checkpoint.step_index != step_index);
        entries.push(Entry {
            checkpoint,
            metadata,
        });
        entries.sort_by_key(|e| e.checkpoint.step_index);
        Ok(CheckpointConfig::new(thread_id.to_string()).at_step(step_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(n: u64) -> serde_json::Value {
        serde_json::json!({ "n": n })
    }

    #[tokio::test]
    async fn put_then_get_latest() {
        let saver = InMemoryCheckpointSaver::new();
        saver
            .put(
                "t1",
                Checkpoint::new(0, None, state(0)),
                CheckpointMetadata::default(),
            )
            .await
            .unwrap();
        saver
            .put(
                "t1",
                Checkpoint::new(1, Some("K1".into()), state(1)),
                CheckpointMetadata::default(),
            )
            .await
            .unwrap();

        let latest = saver
            .get(&CheckpointConfig::new("t1"))
            .await
            .unwrap()
            .expect("checkpoint present");
        assert_eq!(latest.step_index, 1);
        assert_eq!(latest.state, state(1));
    }

    #[tokio::test]
    async fn get_specific_step() {
        let saver = InMemoryCheckpointSaver::new();
        for n in 0..3 {
            saver
                .put(
                    "t1",
                    Checkpoint::new(n, None, state(n)),
                    CheckpointMetadata::default(),
                )
                .await
                .unwrap();
        }
        let cp = saver
            .get(&CheckpointConfig::new("t1").at_step(1))
            .await
            .unwrap()
            .expect("checkpoint present");
        assert_eq!(cp.step_index, 1);
    }

    #[tokio::test]
    async fn missing_thread_id_errors() {
        let saver = InMemoryCheckpointSaver::new();
        let err = saver.get(&CheckpointConfig::default()).await.unwrap_err();
        assert!(matches!(err, CheckpointError::MissingThreadId));
    }

    #[tokio::test]
    async fn unknown_thread_returns_none() {
        let saver = InMemoryCheckpointSaver::new();
        let found = saver.get(&CheckpointConfig::new("nope")).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn put_is_idempotent_per_step() {
        let saver = InMemoryCheckpointSaver::new();
        saver
            .put(
                "t1",
                Checkpoint::new(0, None, state(0)),
                CheckpointMetadata::default(),
            )
            .await
            .unwrap();
        saver
            .put(
                "t1",
                Checkpoint::new(0, None, state(99)),
                CheckpointMetadata::default(),
            )
            .await
            .unwrap();
        assert_eq!(saver.checkpoint_count("t1").await, 1);
        let cp = saver.get(&CheckpointConfig::new("t1")).await.unwrap().unwrap();
        assert_eq!(cp.state, state(99));
    }

    #[tokio::test]
    async fn list_is_reverse_chronological_and_respects_limit() {
        let saver = InMemoryCheckpointSaver::new();
        for n in 0..5 {
            saver
                .put(
                    "t1",
                    Checkpoint::new(n, None, state(n)),
                    CheckpointMetadata::default(),
                )
                .await
                .unwrap();
        }
        let listed = saver
            .list(
                "t1",
                &ListOptions {
                    before_step: None,
                    limit: Some(2),
                },
            )
            .await
            .unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].checkpoint.step_index, 4);
        assert_eq!(listed[1].checkpoint.step_index, 3);
    }
}
