//! Port trait(s) the Kernel nodes call out through (§6).
//!
//! Implementations live in `brainstem-adapters`; this crate only defines
//! the contract K2 depends on, so `brainstem-core` never needs to depend
//! on a concrete telemetry source (real robot, simulator, or test double).

use async_trait::async_trait;

use crate::state::{BatteryStatus, Pose, Resource, Twist};
use std::collections::HashMap;

/// One telemetry snapshot, as returned by [`TelemetrySource::snapshot`].
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySnapshot {
    /// Current pose.
    pub pose: Pose,
    /// Current twist.
    pub twist: Twist,
    /// Battery charge, 0-100.
    pub battery_pct: f64,
    /// Coarse battery status label.
    pub battery_status: BatteryStatus,
    /// Which of the fixed resource set is currently busy.
    pub resources: HashMap<Resource, bool>,
    /// Distance in meters to the currently pursued target, if any.
    pub distance_to_target: Option<f64>,
    /// Opaque safety flag; see §9's open question on its derivation.
    pub collision_risk: bool,
}

/// External telemetry source K2 pulls one snapshot from per tick.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Fetch the current telemetry snapshot.
    async fn snapshot(&self) -> TelemetrySnapshot;
}
