//! K2 Telemetry_Sync: refreshes `state.robot` from one adapter snapshot (§4.2).

use crate::adapters::TelemetrySnapshot;
use crate::state::BrainState;

/// Run K2: writes `state.robot` wholesale from `snapshot`. No derivation —
/// every field is copied as-is from the adapter.
pub fn run(state: &mut BrainState, snapshot: TelemetrySnapshot) {
    state.robot.pose = snapshot.pose;
    state.robot.twist = snapshot.twist;
    state.robot.battery_pct = snapshot.battery_pct;
    state.robot.battery_status = snapshot.battery_status;
    state.robot.resources = snapshot.resources;
    state.robot.distance_to_target = snapshot.distance_to_target;
    state.robot.collision_risk = snapshot.collision_risk;
}
