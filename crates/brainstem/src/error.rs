//! Top-level error type for the `brainstem` binary.
//!
//! Library crates (`brainstem-core`, `brainstem-react`, `brainstem-checkpoint`,
//! `brainstem-adapters`) each raise their own `thiserror` error at their
//! boundary; this crate's `main` converts all of them to `anyhow::Result`
//! via `anyhow::Context`, per §10.2's split between library and binary
//! error handling.

use thiserror::Error;

/// Convenience result type using [`BrainstemError`].
pub type Result<T> = std::result::Result<T, BrainstemError>;

/// Errors surfaced directly by the `brainstem` binary (as opposed to a
/// library crate's error, which is wrapped via `anyhow::Context` instead).
#[derive(Error, Debug)]
pub enum BrainstemError {
    /// Configuration failed to load or validate.
    #[error("configuration error: {0}")]
    Config(String),

    /// A Kernel-layer failure propagated up.
    #[error(transparent)]
    Kernel(#[from] brainstem_core::KernelError),

    /// A ReAct-layer failure propagated up.
    #[error(transparent)]
    React(#[from] brainstem_react::ReactError),
}
