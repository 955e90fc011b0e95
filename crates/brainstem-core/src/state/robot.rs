//! Robot/telemetry sub-state (§3 `Robot`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The three exclusive, reservable resources named in §5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// The mobile base / drivetrain.
    Base,
    /// The manipulator arm.
    Arm,
    /// The end-effector gripper.
    Gripper,
}

impl Resource {
    /// All resources in the fixed set, in a stable order.
    pub const ALL: [Resource; 3] = [Resource::Base, Resource::Arm, Resource::Gripper];
}

/// 6-DoF-ish pose: position plus a single orientation scalar (yaw), matching
/// the field list in §3 rather than a full quaternion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// X position, meters.
    pub x: f64,
    /// Y position, meters.
    pub y: f64,
    /// Z position, meters.
    pub z: f64,
    /// Orientation, radians.
    pub orientation: f64,
}

/// Planar velocity command/readback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Twist {
    /// Forward linear velocity, meters/second.
    pub linear_x: f64,
    /// Yaw angular velocity, radians/second.
    pub angular_z: f64,
}

/// Coarse battery status label, alongside the numeric percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryStatus {
    /// Normal operating range.
    Normal,
    /// Low enough to trigger CHARGE mode (§4.2 rank 2).
    Low,
    /// Low enough to trigger SAFE mode (§4.2 rank 1).
    Critical,
    /// Plugged in and charging.
    Charging,
}

impl Default for BatteryStatus {
    fn default() -> Self {
        BatteryStatus::Normal
    }
}

/// Objective telemetry sub-state, refreshed wholesale by K2 every tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RobotState {
    /// Current pose.
    pub pose: Pose,
    /// Current commanded/measured twist.
    pub twist: Twist,
    /// Battery charge, 0-100.
    pub battery_pct: f64,
    /// Coarse battery status label.
    pub battery_status: BatteryStatus,
    /// Which of the fixed resource set is currently busy.
    pub resources: HashMap<Resource, bool>,
    /// Distance in meters to the currently pursued target, if any.
    pub distance_to_target: Option<f64>,
    /// Opaque safety flag from telemetry; §9 leaves its derivation unspecified.
    pub collision_risk: bool,
}

impl RobotState {
    /// Whether `resource` is currently marked busy.
    pub fn is_busy(&self, resource: Resource) -> bool {
        self.resources.get(&resource).copied().unwrap_or(false)
    }
}
