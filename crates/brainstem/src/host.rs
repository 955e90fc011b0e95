//! The host loop: drives one Kernel pass per tick and, while mode=EXEC,
//! the ReAct loop to its next suspension point (§2's "Flow per tick").

use brainstem_core::adapters::TelemetrySource;
use brainstem_core::driver::{run_kernel_tick, NodeCheckpointer, TickInput};
use brainstem_core::kernel::Route;
use brainstem_core::SkillRegistry;
use brainstem_react::ports::{OracleClient, SkillExecutor};
use brainstem_react::{run_react_to_suspension, ReactOutcome};
use tracing::{info, warn};

use crate::config::BrainstemConfig;
use crate::error::Result;

/// What a single `tick` call accomplished, for the CLI to report.
#[derive(Debug, Clone, PartialEq)]
pub enum TickSummary {
    /// K4 routed to IDLE; nothing else to do this tick.
    Idle,
    /// K4 routed to the SAFE handler; the synthesized stop was dispatched
    /// by the caller (the Kernel-level SAFE/CHARGE handlers bypass ReAct
    /// and the skill executor's dispatch-with-dedup path per §4.2, so the
    /// host issues them directly rather than through R6).
    SafeHandled,
    /// K4 routed to the CHARGE handler.
    ChargeHandled,
    /// The ReAct loop ran to completion or an iteration/failure cap.
    ReactStopped(String),
    /// The ReAct loop suspended awaiting a human approval response.
    ReactAwaitingApproval,
}

/// Run one host tick: K1-K6, then ReAct to its next suspension point if
/// mode=EXEC, then the synthesized SAFE/CHARGE dispatch otherwise.
pub async fn tick(
    state: &mut brainstem_core::BrainState,
    utterance: &str,
    telemetry: &dyn TelemetrySource,
    oracle: &dyn OracleClient,
    executor: &dyn SkillExecutor,
    registry: &SkillRegistry,
    config: &BrainstemConfig,
    checkpointer: &mut NodeCheckpointer,
) -> Result<TickSummary> {
    let route = run_kernel_tick(
        state,
        telemetry,
        TickInput {
            utterance,
            charging_station: config.charging_station,
            battery_thresholds: config.battery_thresholds(),
        },
        checkpointer,
    )
    .await?;

    match route {
        Route::IdleYield => Ok(TickSummary::Idle),
        Route::SafeHandler(op) => {
            info!(skill = %op.skill_name, "kernel route: SAFE handler");
            let key = format!("{}:{}:safe", checkpointer.thread_id(), checkpointer.step_index());
            if let Err(e) = executor.dispatch(&op.skill_name, &op.params, &key).await {
                warn!(error = %e, skill = %op.skill_name, "SAFE-mode dispatch failed");
                state.trace.push(format!("host: SAFE dispatch of {} failed: {e}", op.skill_name));
            }
            Ok(TickSummary::SafeHandled)
        }
        Route::ChargeHandler(op) => {
            info!(skill = %op.skill_name, "kernel route: CHARGE handler");
            let key = format!("{}:{}:charge", checkpointer.thread_id(), checkpointer.step_index());
            if let Err(e) = executor.dispatch(&op.skill_name, &op.params, &key).await {
                warn!(error = %e, skill = %op.skill_name, "CHARGE-mode dispatch failed");
                state.trace.push(format!("host: CHARGE dispatch of {} failed: {e}", op.skill_name));
            }
            Ok(TickSummary::ChargeHandled)
        }
        Route::ExecEnterReact => {
            let registry_summary = registry.summary();
            let outcome = run_react_to_suspension(
                state,
                oracle,
                executor,
                registry,
                &registry_summary,
                config.max_iter,
                checkpointer,
            )
            .await?;
            Ok(match outcome {
                ReactOutcome::Stopped(reason) => TickSummary::ReactStopped(reason),
                ReactOutcome::AwaitingApproval => TickSummary::ReactAwaitingApproval,
            })
        }
    }
}
