//! Errors raised by the reference adapters in this crate.

use thiserror::Error;

/// Convenience result type using [`AdapterError`].
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Errors surfaced by `brainstem-adapters`.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// The oracle HTTP endpoint could not be reached or returned a non-2xx status.
    #[error("oracle request failed: {0}")]
    OracleTransport(#[from] reqwest::Error),

    /// The oracle responded but the payload didn't carry the expected shape.
    #[error("unexpected oracle response shape: {0}")]
    OracleResponseShape(String),
}

impl From<AdapterError> for brainstem_react::PortError {
    fn from(err: AdapterError) -> Self {
        brainstem_react::PortError::Transport(err.to_string())
    }
}
