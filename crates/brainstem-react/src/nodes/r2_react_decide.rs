//! R2 ReAct_Decide (§4.3): calls the oracle and parses its decision.

use brainstem_core::state::{BrainState, Message};

use crate::error::Result;
use crate::oracle_parse::parse_decision;
use crate::ports::OracleClient;

/// Run R2: writes `state.react.decision` and appends a trace entry.
pub async fn run(
    state: &mut BrainState,
    oracle: &dyn OracleClient,
    registry_summary: &str,
) -> Result<()> {
    let observation = state
        .react
        .observation
        .clone()
        .expect("R1 must run before R2");

    let raw_text = oracle
        .decide(&state.messages, &observation, registry_summary)
        .await?;

    let decision = parse_decision(&raw_text);
    state.trace.push(format!(
        "R2: decision={:?} reason={:?}",
        decision.decision_type, decision.reason
    ));
    state.messages.push(Message {
        role: "assistant".to_string(),
        content: raw_text,
    });
    state.react.decision = Some(decision);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PortError;
    use async_trait::async_trait;
    use brainstem_core::state::{DecisionType, Observation};

    struct FixedOracle(&'static str);

    #[async_trait]
    impl OracleClient for FixedOracle {
        async fn decide(
            &self,
            _messages: &[Message],
            _observation: &Observation,
            _registry_summary: &str,
        ) -> std::result::Result<String, PortError> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn well_formed_decision_round_trips() {
        let mut state = BrainState::new();
        state.react.observation = Some(Observation::default());
        let oracle = FixedOracle(r#"{"type": "FINISH", "reason": "goal reached"}"#);

        run(&mut state, &oracle, "registry").await.unwrap();

        let decision = state.react.decision.unwrap();
        assert_eq!(decision.decision_type, Some(DecisionType::Finish));
    }

    #[tokio::test]
    async fn malformed_output_becomes_ask_human() {
        let mut state = BrainState::new();
        state.react.observation = Some(Observation::default());
        let oracle = FixedOracle("let's think about it");

        run(&mut state, &oracle, "registry").await.unwrap();

        let decision = state.react.decision.unwrap();
        assert_eq!(decision.decision_type, Some(DecisionType::AskHuman));
        assert_eq!(decision.reason.as_deref(), Some("malformed_decision"));
    }
}
