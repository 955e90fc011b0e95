//! K1 HCI_Ingress: classifies the latest utterance (§4.2).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::state::{BrainState, UserInterrupt};

static GOAL_PATTERN_EN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^go\s+to\s+(.+)$").expect("valid regex"));
static GOAL_PATTERN_ZH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^去(.+)$").expect("valid regex"));

/// Classify `utterance` into a `UserInterrupt`, lexically and
/// case-insensitively, after trimming whitespace.
fn classify(utterance: &str) -> UserInterrupt {
    let trimmed = utterance.trim();
    if trimmed.is_empty() {
        return UserInterrupt::None;
    }
    let lowered = trimmed.to_lowercase();
    if lowered == "stop" || trimmed == "紧急停止" {
        return UserInterrupt::Stop;
    }
    if lowered == "pause" || trimmed == "暂停" {
        return UserInterrupt::Pause;
    }
    if let Some(caps) = GOAL_PATTERN_EN.captures(trimmed) {
        return UserInterrupt::NewGoal {
            goal_text: caps[1].trim().to_string(),
        };
    }
    if let Some(caps) = GOAL_PATTERN_ZH.captures(trimmed) {
        return UserInterrupt::NewGoal {
            goal_text: caps[1].trim().to_string(),
        };
    }
    UserInterrupt::None
}

/// Run K1: writes `state.hci`. `utterance` is the raw text delivered by the
/// host this tick (empty string if none arrived).
pub fn run(state: &mut BrainState, utterance: &str) {
    state.hci.user_utterance = utterance.to_string();
    state.hci.user_interrupt = classify(utterance);
}
