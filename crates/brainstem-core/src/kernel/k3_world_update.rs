//! K3 World_Update: produces a deterministic oracle-facing summary (§4.2).

use crate::state::BrainState;

/// Run K3: writes `state.world.summary` from `state.world.zones` and
/// `state.world.obstacles`. Deterministic: zones and obstacles are both
/// rendered in sorted order so the summary is stable across calls with the
/// same underlying data regardless of insertion order.
pub fn run(state: &mut BrainState) {
    let mut zones = state.world.zones.clone();
    zones.sort();

    let mut obstacles = state.world.obstacles.clone();
    obstacles.sort_by(|a, b| a.id.cmp(&b.id));

    let zones_line = if zones.is_empty() {
        "no known zones".to_string()
    } else {
        format!("zones: {}", zones.join(", "))
    };

    let obstacles_line = if obstacles.is_empty() {
        "no obstacles detected".to_string()
    } else {
        let rendered: Vec<String> = obstacles
            .iter()
            .map(|o| format!("{} ({}) at ({:.1}, {:.1})", o.label, o.id, o.x, o.y))
            .collect();
        format!("obstacles: {}", rendered.join("; "))
    };

    state.world.summary = format!("{zones_line}. {obstacles_line}.");
}
