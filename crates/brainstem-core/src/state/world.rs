//! World-model sub-state (§3 `World`).

use serde::{Deserialize, Serialize};

/// A single detected obstacle, as reported by the world model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleRecord {
    /// Stable identifier for the obstacle.
    pub id: String,
    /// Human-readable label, e.g. "crate" or "person".
    pub label: String,
    /// Position in the world frame.
    pub x: f64,
    /// Position in the world frame.
    pub y: f64,
}

/// Semantic world-model sub-state: a textual summary plus the zones and
/// obstacles K3 derives it from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    /// Deterministic textual summary produced by K3, suitable for oracle consumption.
    pub summary: String,
    /// Known named zones, e.g. "kitchen", "charging_station".
    pub zones: Vec<String>,
    /// Currently detected obstacles.
    pub obstacles: Vec<ObstacleRecord>,
}
