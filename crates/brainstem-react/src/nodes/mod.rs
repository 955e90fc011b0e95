//! ReAct nodes R1-R8 (§4.3): the inner, oracle-driven planning loop.
//!
//! Like the Kernel nodes, each node has strict writer ownership of the
//! sub-state(s) named in its doc comment. Unlike the Kernel, several nodes
//! are async (R2 calls the oracle, R6 and R7 call the skill executor) and
//! R5 may suspend the whole graph rather than return a new state.

pub mod r1_build_observation;
pub mod r2_react_decide;
pub mod r3_compile_ops;
pub mod r4_guardrails_check;
pub mod r5_human_approval;
pub mod r6_dispatch_skills;
pub mod r7_observe_result;
pub mod r8_stop_or_loop;

pub use r5_human_approval::ApprovalOutcome;
pub use r8_stop_or_loop::{LoopOutcome, DEFAULT_MAX_ITER};
