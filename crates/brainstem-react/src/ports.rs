//! Port traits the ReAct nodes call out through (§6).
//!
//! Implementations live in `brainstem-adapters`, which depends on this
//! crate for the trait definitions; `brainstem-react` never depends on a
//! concrete oracle or executor.

use async_trait::async_trait;

use brainstem_core::state::{Message, Observation, SkillResult};

/// Errors a port implementation can raise. Kept local to this crate (rather
/// than defined in `brainstem-adapters`) so `brainstem-react` can wrap it
/// in [`crate::error::ReactError`] without depending on the adapters crate.
#[derive(thiserror::Error, Debug)]
pub enum PortError {
    /// The oracle or executor endpoint could not be reached or returned an
    /// unexpected transport-level failure.
    #[error("adapter transport error: {0}")]
    Transport(String),
    /// The oracle/executor rejected the request as invalid.
    #[error("adapter rejected request: {0}")]
    Rejected(String),
}

/// The `decide(messages, observation, registry_summary) -> raw_text` oracle
/// contract (§6). The core performs JSON parsing and fallback on `raw_text`.
#[async_trait]
pub trait OracleClient: Send + Sync {
    /// Ask the oracle for a decision, given the running message transcript,
    /// this iteration's observation, and a summary of the skill registry.
    async fn decide(
        &self,
        messages: &[Message],
        observation: &Observation,
        registry_summary: &str,
    ) -> Result<String, PortError>;
}

/// Outcome of polling a running skill invocation.
#[derive(Debug, Clone)]
pub enum PollOutcome {
    /// Still running; `feedback` is an optional progress message.
    Running {
        /// Optional progress message, threaded back into messages by R7.
        feedback: Option<String>,
    },
    /// Finished, with a terminal result.
    Done(SkillResult),
}

/// The four-operation skill executor contract (§6).
#[async_trait]
pub trait SkillExecutor: Send + Sync {
    /// Start a skill invocation. `idempotency_key` lets the executor
    /// suppress duplicate dispatches on replay (§5).
    async fn dispatch(
        &self,
        skill_name: &str,
        params: &serde_json::Value,
        idempotency_key: &str,
    ) -> Result<String, PortError>;

    /// Cancel a running invocation by its executor-assigned id.
    async fn cancel(&self, invocation_id: &str) -> Result<(), PortError>;

    /// Poll a running invocation for progress or a terminal result.
    async fn poll(&self, invocation_id: &str) -> Result<PollOutcome, PortError>;

    /// Speak `text`. `idempotency_key` suppresses duplicate speech on replay.
    async fn speak(&self, text: &str, idempotency_key: &str) -> Result<(), PortError>;
}
