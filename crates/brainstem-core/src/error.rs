//! Errors raised by the skill registry and Kernel nodes.

use thiserror::Error;

/// Convenience result type using [`KernelError`].
pub type Result<T> = std::result::Result<T, KernelError>;

/// Errors surfaced by `brainstem-core`.
#[derive(Error, Debug)]
pub enum KernelError {
    /// A registry lookup found no skill with the given name.
    #[error("unknown skill: {0}")]
    UnknownSkill(String),

    /// A Kernel node was asked to act on a state it cannot parse or route.
    #[error("kernel node {node} failed: {message}")]
    NodeFailed {
        /// The node that failed, e.g. `"K4"`.
        node: &'static str,
        /// Human-readable detail.
        message: String,
    },

    /// Checkpoint persistence failed.
    #[error(transparent)]
    Checkpoint(#[from] brainstem_checkpoint::CheckpointError),
}
