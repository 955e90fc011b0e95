//! Errors raised by checkpoint storage backends.

use thiserror::Error;

/// Convenience result type using [`CheckpointError`].
pub type Result<T> = std::result::Result<T, CheckpointError>;

/// Errors that can occur while saving, loading, or listing checkpoints.
#[derive(Error, Debug)]
pub enum CheckpointError {
    /// The caller omitted a `thread_id`, which every checkpoint operation requires.
    #[error("thread_id is required")]
    MissingThreadId,

    /// No checkpoint matched the requested config.
    #[error("no checkpoint found for thread '{0}'")]
    NotFound(String),

    /// The state could not be serialized to or deserialized from its byte form.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The on-disk backend failed to read or write a checkpoint file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure not covered by the other variants.
    #[error("checkpoint backend error: {0}")]
    Backend(String),
}
