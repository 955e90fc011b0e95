//! Errors raised by the ReAct nodes.

use thiserror::Error;

use crate::ports::PortError;

/// Convenience result type using [`ReactError`].
pub type Result<T> = std::result::Result<T, ReactError>;

/// Errors surfaced by `brainstem-react`.
#[derive(Error, Debug)]
pub enum ReactError {
    /// A Kernel-layer failure (registry lookup, checkpoint write) propagated up.
    #[error(transparent)]
    Kernel(#[from] brainstem_core::KernelError),

    /// An oracle or executor port failed.
    #[error(transparent)]
    Port(#[from] PortError),

    /// A ReAct node was asked to act on a state it cannot process.
    #[error("react node {node} failed: {message}")]
    NodeFailed {
        /// The node that failed, e.g. `"R4"`.
        node: &'static str,
        /// Human-readable detail.
        message: String,
    },
}
