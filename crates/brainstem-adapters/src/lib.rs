//! External adapter contracts and reference implementations for the
//! brainstem decision core (§6, component 7 of the overview table).
//!
//! The port *traits* (`TelemetrySource` in `brainstem-core`; `OracleClient`
//! and `SkillExecutor` in `brainstem-react`) are defined alongside the
//! crates that call them, so neither core crate depends on a concrete
//! oracle, executor, or telemetry source. This crate ships reference
//! implementations good enough for tests, demos, and the `brainstem`
//! binary's default configuration: an HTTP oracle client, an in-process
//! scripted skill executor, and a simulated telemetry source. Production
//! deployments may replace any of the three without touching
//! `brainstem-core` or `brainstem-react`.

pub mod error;
pub mod executor;
pub mod oracle;
pub mod telemetry;

pub use error::{AdapterError, Result};
pub use executor::{ScriptedOutcome, SimulatedExecutor};
pub use oracle::{HttpOracleClient, OracleConfig};
pub use telemetry::SimulatedTelemetry;
