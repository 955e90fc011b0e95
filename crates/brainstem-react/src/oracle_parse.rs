//! Decision parsing with fallback (§4.3 R2).
//!
//! Parsing rule: attempt a strict JSON parse of the oracle's raw text;
//! on failure, extract the largest balanced `{...}` substring and retry;
//! on still-failure, or if `type` is not one of the seven decision types,
//! emit `Decision{type=ASK_HUMAN, reason="malformed_decision"}`.

use brainstem_core::state::{Decision, DecisionType, OpDescriptor};
use serde::Deserialize;

#[derive(Deserialize)]
struct RawDecision {
    #[serde(rename = "type")]
    decision_type: Option<String>,
    reason: Option<String>,
    plan_patch: Option<String>,
    #[serde(default)]
    ops: Vec<RawOp>,
}

#[derive(Deserialize)]
struct RawOp {
    skill_name: String,
    #[serde(default)]
    params: serde_json::Value,
}

fn decision_type_from_str(s: &str) -> Option<DecisionType> {
    DecisionType::ALL
        .into_iter()
        .find(|t| format!("{t:?}").to_uppercase().replace('_', "") == s.to_uppercase().replace('_', ""))
}

fn malformed() -> Decision {
    Decision {
        decision_type: Some(DecisionType::AskHuman),
        reason: Some("malformed_decision".to_string()),
        plan_patch: None,
        ops: Vec::new(),
    }
}

fn try_convert(raw: RawDecision) -> Option<Decision> {
    let decision_type = raw.decision_type.as_deref().and_then(decision_type_from_str)?;
    Some(Decision {
        decision_type: Some(decision_type),
        reason: raw.reason,
        plan_patch: raw.plan_patch,
        ops: raw
            .ops
            .into_iter()
            .map(|o| OpDescriptor {
                skill_name: o.skill_name,
                params: o.params,
            })
            .collect(),
    })
}

/// Find the largest substring of `text` that is a balanced `{...}` span,
/// i.e. the widest bracket-depth-zero-terminated JSON object candidate.
///
/// Braces inside JSON string literals don't count toward depth: we track
/// whether we're inside a `"..."` span and skip `\"`-escaped quotes, so a
/// `}` in e.g. a `reason` field's text doesn't close the span early.
fn largest_balanced_braces(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut best: Option<(usize, usize)> = None;
    let mut stack: Vec<usize> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => stack.push(i),
            b'}' => {
                if let Some(start) = stack.pop() {
                    if stack.is_empty() {
                        let len = i - start;
                        let replace = match best {
                            Some((bs, be)) => len > be - bs,
                            None => true,
                        };
                        if replace {
                            best = Some((start, i));
                        }
                    }
                }
            }
            _ => {}
        }
    }

    best.map(|(start, end)| &text[start..=end])
}

/// Parse `raw_text` into a `Decision`, falling back to ASK_HUMAN/malformed
/// on any failure (strict parse → balanced-brace extraction → fallback).
pub fn parse_decision(raw_text: &str) -> Decision {
    if let Ok(raw) = serde_json::from_str::<RawDecision>(raw_text) {
        if let Some(decision) = try_convert(raw) {
            return decision;
        }
    }

    if let Some(candidate) = largest_balanced_braces(raw_text) {
        if let Ok(raw) = serde_json::from_str::<RawDecision>(candidate) {
            if let Some(decision) = try_convert(raw) {
                return decision;
            }
        }
    }

    malformed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_json_parses_directly() {
        let d = parse_decision(r#"{"type": "FINISH", "reason": "done"}"#);
        assert_eq!(d.decision_type, Some(DecisionType::Finish));
        assert_eq!(d.reason.as_deref(), Some("done"));
    }

    #[test]
    fn embedded_json_is_extracted() {
        let d = parse_decision(r#"sure, here you go: {"type": "RETRY", "reason": "transient"} thanks"#);
        assert_eq!(d.decision_type, Some(DecisionType::Retry));
    }

    #[test]
    fn unstructured_text_falls_back_to_ask_human() {
        let d = parse_decision("let's think about it");
        assert_eq!(d.decision_type, Some(DecisionType::AskHuman));
        assert_eq!(d.reason.as_deref(), Some("malformed_decision"));
    }

    #[test]
    fn invalid_type_value_falls_back_to_ask_human() {
        let d = parse_decision(r#"{"type": "DANCE", "reason": "??"}"#);
        assert_eq!(d.decision_type, Some(DecisionType::AskHuman));
        assert_eq!(d.reason.as_deref(), Some("malformed_decision"));
    }

    #[test]
    fn picks_largest_balanced_span_when_multiple_present() {
        let text = r#"{"a":1} then {"type": "CONTINUE", "reason": "ok", "ops": []}"#;
        let d = parse_decision(text);
        assert_eq!(d.decision_type, Some(DecisionType::Continue));
    }

    #[test]
    fn brace_inside_string_literal_does_not_close_the_span_early() {
        let text = r#"prefix {"type":"FINISH","reason":"done } now"} suffix"#;
        let d = parse_decision(text);
        assert_eq!(d.decision_type, Some(DecisionType::Finish));
        assert_eq!(d.reason.as_deref(), Some("done } now"));
    }

    #[test]
    fn escaped_quote_inside_string_does_not_end_the_string_early() {
        let text = r#"{"type":"FINISH","reason":"she said \"hi } there\""}"#;
        let d = parse_decision(text);
        assert_eq!(d.decision_type, Some(DecisionType::Finish));
        assert_eq!(d.reason.as_deref(), Some(r#"she said "hi } there""#));
    }
}
