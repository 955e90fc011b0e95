//! Skill registry (§4.1): a read-mostly catalog of callable skills.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{KernelError, Result};
use crate::state::Resource;

/// How a skill's executor call shape looks to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceKind {
    /// Long-running, cancellable, polled for completion (e.g. navigation).
    LongRunning,
    /// Fire-and-forget, completes promptly (e.g. speech, a stop command).
    Instantaneous,
}

/// A recoverable-vs-fatal classification for one of a skill's error codes,
/// used by R3/R4's REPLAN/RETRY/ASK_HUMAN routing (§7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    /// Handleable inside ReAct via REPLAN/RETRY.
    Recoverable,
    /// Must surface to a human.
    NeedsHuman,
}

/// Static metadata describing one callable skill. The "canonical eight"
/// fields named in §4.1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDef {
    /// Unique skill name, e.g. `"NavigateToPose"`.
    pub name: String,
    /// Executor call shape.
    pub interface_kind: InterfaceKind,
    /// JSON Schema (as a `Value`) describing valid `params`.
    pub arg_schema: serde_json::Value,
    /// Resources this skill requires exclusively while running.
    pub resources_required: HashSet<Resource>,
    /// Whether a running invocation may be cancelled by preemption.
    pub preemptible: bool,
    /// Whether the executor's `cancel` op is implemented for this skill.
    pub cancel_supported: bool,
    /// Seconds after which a running invocation is considered timed out.
    pub timeout_s: f64,
    /// Maps executor error codes to a recoverable/needs-human classification.
    pub error_map: HashMap<String, ErrorSeverity>,
}

/// Read-mostly catalog of [`SkillDef`]s, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct SkillRegistry {
    defs: HashMap<String, SkillDef>,
}

impl SkillRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            defs: HashMap::new(),
        }
    }

    /// Register `def`, keyed by `def.name`.
    ///
    /// The canonical eight fields are all required by `SkillDef`'s type, so
    /// there is nothing left to reject at runtime beyond a duplicate name;
    /// registering twice replaces the previous definition.
    pub fn register(&mut self, def: SkillDef) {
        self.defs.insert(def.name.clone(), def);
    }

    /// Look up a skill by name.
    pub fn get(&self, name: &str) -> Result<&SkillDef> {
        self.defs
            .get(name)
            .ok_or_else(|| KernelError::UnknownSkill(name.to_string()))
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    /// All skills that require `resource`.
    pub fn by_resource(&self, resource: Resource) -> Vec<&SkillDef> {
        self.defs
            .values()
            .filter(|d| d.resources_required.contains(&resource))
            .collect()
    }

    /// A deterministic, oracle-friendly summary of every registered skill:
    /// name, interface kind, and required resources, one per line.
    pub fn summary(&self) -> String {
        let mut names: Vec<&String> = self.defs.keys().collect();
        names.sort();
        names
            .into_iter()
            .map(|name| {
                let def = &self.defs[name];
                let resources = if def.resources_required.is_empty() {
                    "none".to_string()
                } else {
                    let mut rs: Vec<&str> = def
                        .resources_required
                        .iter()
                        .map(|r| match r {
                            Resource::Base => "base",
                            Resource::Arm => "arm",
                            Resource::Gripper => "gripper",
                        })
                        .collect();
                    rs.sort();
                    rs.join(",")
                };
                format!("{name}: requires=[{resources}] preemptible={}", def.preemptible)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The built-in registry required by §4.1: `NavigateToPose`, `StopBase`, `Speak`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        let mut nav_errors = HashMap::new();
        nav_errors.insert("NAV_TIMEOUT".to_string(), ErrorSeverity::Recoverable);
        nav_errors.insert("NAV_BLOCKED".to_string(), ErrorSeverity::Recoverable);
        nav_errors.insert("RESOURCE_CONFLICT".to_string(), ErrorSeverity::Recoverable);
        nav_errors.insert("NAV_GOAL_REJECTED".to_string(), ErrorSeverity::Recoverable);
        registry.register(SkillDef {
            name: "NavigateToPose".to_string(),
            interface_kind: InterfaceKind::LongRunning,
            arg_schema: serde_json::json!({
                "type": "object",
                "required": ["x", "y"],
                "properties": {
                    "x": {"type": "number"},
                    "y": {"type": "number"},
                    "zone": {"type": "string"}
                }
            }),
            resources_required: HashSet::from([Resource::Base]),
            preemptible: true,
            cancel_supported: true,
            timeout_s: 120.0,
            error_map: nav_errors,
        });

        registry.register(SkillDef {
            name: "StopBase".to_string(),
            interface_kind: InterfaceKind::Instantaneous,
            arg_schema: serde_json::json!({"type": "object", "properties": {}}),
            resources_required: HashSet::from([Resource::Base]),
            preemptible: false,
            cancel_supported: false,
            timeout_s: 5.0,
            error_map: HashMap::new(),
        });

        registry.register(SkillDef {
            name: "Speak".to_string(),
            interface_kind: InterfaceKind::Instantaneous,
            arg_schema: serde_json::json!({
                "type": "object",
                "required": ["text"],
                "properties": {"text": {"type": "string"}}
            }),
            resources_required: HashSet::new(),
            preemptible: false,
            cancel_supported: false,
            timeout_s: 5.0,
            error_map: HashMap::new(),
        });

        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_all_present() {
        let registry = SkillRegistry::with_builtins();
        assert!(registry.contains("NavigateToPose"));
        assert!(registry.contains("StopBase"));
        assert!(registry.contains("Speak"));
    }

    #[test]
    fn unknown_skill_lookup_errors() {
        let registry = SkillRegistry::with_builtins();
        assert!(registry.get("DoesNotExist").is_err());
    }

    #[test]
    fn by_resource_finds_base_skills() {
        let registry = SkillRegistry::with_builtins();
        let base_skills: Vec<&str> = registry
            .by_resource(Resource::Base)
            .into_iter()
            .map(|d| d.name.as_str())
            .collect();
        assert!(base_skills.contains(&"NavigateToPose"));
        assert!(base_skills.contains(&"StopBase"));
        assert!(!base_skills.contains(&"Speak"));
    }

    #[test]
    fn summary_is_sorted_and_deterministic() {
        let registry = SkillRegistry::with_builtins();
        let first = registry.summary();
        let second = registry.summary();
        assert_eq!(first, second);
        let nav_idx = first.find("NavigateToPose").unwrap();
        let speak_idx = first.find("Speak").unwrap();
        assert!(nav_idx < speak_idx, "summary should be sorted by name");
    }
}
