//! Inner ReAct loop (R1-R8) for the brainstem decision core (§4.3).
//!
//! Built on top of `brainstem_core::state::BrainState` and
//! `brainstem_core::driver::NodeCheckpointer`; [`driver::run_react_to_suspension`]
//! is the entry point the host loop calls while the Kernel's mode is EXEC.

pub mod driver;
pub mod error;
pub mod nodes;
pub mod oracle_parse;
pub mod ports;

pub use driver::{run_react_to_suspension, ReactOutcome};
pub use error::{ReactError, Result};
pub use ports::{OracleClient, PollOutcome, PortError, SkillExecutor};
