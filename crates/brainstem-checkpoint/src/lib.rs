//! Checkpoint persistence for the brainstem decision core.
//!
//! Every node of the outer Kernel loop and inner ReAct loop checkpoints the
//! full `BrainState` after it runs (§6). This crate
//! defines the storage-agnostic [`CheckpointSaver`] trait and ships two
//! backends: [`memory::InMemoryCheckpointSaver`] for tests and ephemeral
//! runs, and [`file::FileCheckpointSaver`] for durable on-disk storage.

pub mod checkpoint;
pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use checkpoint::{Checkpoint, CheckpointConfig, CheckpointId, CheckpointMetadata, CheckpointTuple};
pub use error::{CheckpointError, Result};
pub use file::FileCheckpointSaver;
pub use memory::InMemoryCheckpointSaver;
pub use traits::{CheckpointSaver, ListOptions};
