//! Reference telemetry adapter: an in-process simulator.
//!
//! Mirrors the role `InMemoryCheckpointSaver` plays for checkpointing — a
//! reference implementation of the port trait good enough for tests and
//! demos, with the real sensor fusion left to whatever production
//! telemetry source a deployment wires in instead (§1's explicit
//! out-of-scope: "the telemetry source").

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use brainstem_core::adapters::{TelemetrySnapshot, TelemetrySource};
use brainstem_core::state::{BatteryStatus, Pose, Resource, Twist};

/// Mutable simulator state, guarded by a single lock since ticks are
/// infrequent and the simulator is not on any hot path.
#[derive(Debug, Clone)]
struct SimState {
    pose: Pose,
    twist: Twist,
    battery_pct: f64,
    resources: HashMap<Resource, bool>,
    distance_to_target: Option<f64>,
    collision_risk: bool,
    battery_drain_per_snapshot: f64,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            pose: Pose::default(),
            twist: Twist::default(),
            battery_pct: 100.0,
            resources: HashMap::new(),
            distance_to_target: None,
            collision_risk: false,
            battery_drain_per_snapshot: 0.0,
        }
    }
}

fn battery_status_for(pct: f64) -> BatteryStatus {
    if pct < 5.0 {
        BatteryStatus::Critical
    } else if pct < 20.0 {
        BatteryStatus::Low
    } else {
        BatteryStatus::Normal
    }
}

/// A scriptable in-process stand-in for a real telemetry source.
///
/// Test and demo code drives it through the setters; [`TelemetrySource::snapshot`]
/// applies one tick of battery drain (if configured) and returns the
/// current readings.
pub struct SimulatedTelemetry {
    state: Mutex<SimState>,
}

impl Default for SimulatedTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedTelemetry {
    /// A fresh simulator: full battery, origin pose, no obstacles, no drain.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SimState::default()),
        }
    }

    /// Overwrite the current pose.
    pub fn set_pose(&self, pose: Pose) {
        self.state.lock().unwrap().pose = pose;
    }

    /// Overwrite the current twist.
    pub fn set_twist(&self, twist: Twist) {
        self.state.lock().unwrap().twist = twist;
    }

    /// Overwrite the current battery percentage (clamped to 0..=100).
    pub fn set_battery_pct(&self, pct: f64) {
        self.state.lock().unwrap().battery_pct = pct.clamp(0.0, 100.0);
    }

    /// Configure battery drain applied on every `snapshot()` call.
    pub fn set_battery_drain_per_snapshot(&self, drain: f64) {
        self.state.lock().unwrap().battery_drain_per_snapshot = drain;
    }

    /// Mark a resource as busy/free, mirroring what an executing skill would do.
    pub fn set_resource_busy(&self, resource: Resource, busy: bool) {
        self.state.lock().unwrap().resources.insert(resource, busy);
    }

    /// Set the opaque collision-risk flag (§9's open question: the source of
    /// this signal is deliberately left to the caller).
    pub fn set_collision_risk(&self, risk: bool) {
        self.state.lock().unwrap().collision_risk = risk;
    }

    /// Set the distance-to-target reading.
    pub fn set_distance_to_target(&self, distance: Option<f64>) {
        self.state.lock().unwrap().distance_to_target = distance;
    }
}

#[async_trait]
impl TelemetrySource for SimulatedTelemetry {
    async fn snapshot(&self) -> TelemetrySnapshot {
        let mut state = self.state.lock().unwrap();
        if state.battery_drain_per_snapshot != 0.0 {
            state.battery_pct = (state.battery_pct - state.battery_drain_per_snapshot).max(0.0);
        }
        TelemetrySnapshot {
            pose: state.pose,
            twist: state.twist,
            battery_pct: state.battery_pct,
            battery_status: battery_status_for(state.battery_pct),
            resources: state.resources.clone(),
            distance_to_target: state.distance_to_target,
            collision_risk: state.collision_risk,
        }
    }
}
