//! Kernel nodes K1-K6 (§4.2): the outer, rule-based arbitration loop.
//!
//! Each node is a pure function over `BrainState` plus whatever external
//! input it needs this tick (an utterance, a telemetry snapshot). Writer
//! ownership is strict: a node only ever mutates the sub-state(s) named in
//! its doc comment.

pub mod k1_hci_ingress;
pub mod k2_telemetry_sync;
pub mod k3_world_update;
pub mod k4_event_arbitrate;
pub mod k5_task_queue;
pub mod k6_kernel_route;

pub use k4_event_arbitrate::BatteryThresholds;
pub use k6_kernel_route::Route;
