//! BrainState schema, skill registry, and the outer Kernel loop (K1-K6)
//! for the brainstem decision core.
//!
//! `brainstem-react` builds on top of this crate's [`state::BrainState`]
//! and [`driver::NodeCheckpointer`] to implement the inner ReAct loop.

pub mod adapters;
pub mod driver;
pub mod error;
pub mod kernel;
pub mod registry;
pub mod state;

pub use error::{KernelError, Result};
pub use registry::{ErrorSeverity, InterfaceKind, SkillDef, SkillRegistry};
pub use state::BrainState;
