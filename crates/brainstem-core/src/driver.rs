//! Graph driver (§2 item 5): sequences nodes and checkpoints after each one.
//!
//! [`NodeCheckpointer`] is the shared piece of the driver: it owns the
//! thread's step counter and writes a checkpoint through a
//! [`CheckpointSaver`] after every node, in both the Kernel loop (here) and
//! the ReAct loop (`brainstem-react`, which reuses this type rather than
//! re-implementing checkpoint bookkeeping).

use std::sync::Arc;

use brainstem_checkpoint::{Checkpoint, CheckpointConfig, CheckpointMetadata, CheckpointSaver};

use crate::adapters::TelemetrySource;
use crate::error::{KernelError, Result};
use crate::kernel::{
    k1_hci_ingress, k2_telemetry_sync, k3_world_update, k4_event_arbitrate, k5_task_queue,
    k6_kernel_route, BatteryThresholds, Route,
};
use crate::state::BrainState;

/// Tracks the per-thread step counter and writes a checkpoint after every
/// node invocation, per §5's "after every node" rule.
pub struct NodeCheckpointer {
    saver: Arc<dyn CheckpointSaver>,
    thread_id: String,
    step_index: u64,
    /// Node label of the checkpoint this instance was resumed from, if any
    /// (§5, §9: "the driver loads the latest checkpoint and resumes *after*
    /// the last completed node"). Consumed by [`Self::take_pending_resume_node`]
    /// so it only affects the first pass a caller makes after resuming, not
    /// any later tick in the same process.
    pending_resume_node: Option<String>,
}

impl NodeCheckpointer {
    /// Build a checkpointer resuming after `initial_step` (0 for a fresh thread).
    pub fn new(saver: Arc<dyn CheckpointSaver>, thread_id: impl Into<String>, initial_step: u64) -> Self {
        Self {
            saver,
            thread_id: thread_id.into(),
            step_index: initial_step,
            pending_resume_node: None,
        }
    }

    /// Restore a checkpointer at the latest checkpoint for `thread_id`, if any,
    /// returning it alongside the restored state (or a fresh state if none exists).
    pub async fn resume(saver: Arc<dyn CheckpointSaver>, thread_id: impl Into<String>) -> Result<(Self, BrainState)> {
        let thread_id = thread_id.into();
        let latest = saver
            .get(&CheckpointConfig::new(thread_id.clone()))
            .await
            .map_err(KernelError::Checkpoint)?;
        match latest {
            Some(cp) => {
                let state = BrainState::from_checkpoint_value(cp.state.clone())
                    .map_err(brainstem_checkpoint::CheckpointError::Serialization)
                    .map_err(KernelError::Checkpoint)?;
                let mut checkpointer = Self::new(saver, thread_id, cp.step_index + 1);
                checkpointer.pending_resume_node = cp.node.clone();
                Ok((checkpointer, state))
            }
            None => Ok((Self::new(saver, thread_id, 0), BrainState::new())),
        }
    }

    /// Current step index (the step the *next* checkpoint will be written at).
    pub fn step_index(&self) -> u64 {
        self.step_index
    }

    /// Thread id this checkpointer is writing under.
    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    /// Take (and clear) the node label this checkpointer was resumed from.
    ///
    /// Returns `Some("R6")`, e.g., if the process was last killed right
    /// after an R6 checkpoint; callers use this to re-enter the ReAct loop
    /// after the last completed node rather than from its start, per §5's
    /// durable-resume contract. Returns `None` for a freshly-constructed
    /// checkpointer, a thread with no prior checkpoint, or once already
    /// consumed.
    pub fn take_pending_resume_node(&mut self) -> Option<String> {
        self.pending_resume_node.take()
    }

    /// Serialize `state`, write it as the checkpoint for the current step,
    /// and advance the step counter.
    pub async fn checkpoint(&mut self, node: &str, state: &BrainState) -> Result<()> {
        let value = state
            .to_checkpoint_value()
            .map_err(brainstem_checkpoint::CheckpointError::Serialization)
            .map_err(KernelError::Checkpoint)?;
        let checkpoint = Checkpoint::new(self.step_index, Some(node.to_string()), value);
        self.saver
            .put(&self.thread_id, checkpoint, CheckpointMetadata::default())
            .await
            .map_err(KernelError::Checkpoint)?;
        self.step_index += 1;
        Ok(())
    }
}

/// Input the host supplies to one Kernel pass, beyond the persisted state.
pub struct TickInput<'a> {
    /// Raw utterance delivered this tick (empty string if none).
    pub utterance: &'a str,
    /// Charging station coordinates, for the CHARGE-mode synthesized dispatch.
    pub charging_station: (f64, f64),
    /// Battery cutoffs K4 arbitrates against (§10.3's configurable surface).
    pub battery_thresholds: BatteryThresholds,
}

/// Run one Kernel pass (K1 through K6), checkpointing after each node, and
/// return the routing token K6 produced.
pub async fn run_kernel_tick(
    state: &mut BrainState,
    telemetry: &dyn TelemetrySource,
    input: TickInput<'_>,
    checkpointer: &mut NodeCheckpointer,
) -> Result<Route> {
    k1_hci_ingress::run(state, input.utterance);
    checkpointer.checkpoint("K1", state).await?;

    let snapshot = telemetry.snapshot().await;
    k2_telemetry_sync::run(state, snapshot);
    checkpointer.checkpoint("K2", state).await?;

    k3_world_update::run(state);
    checkpointer.checkpoint("K3", state).await?;

    k4_event_arbitrate::run(state, input.battery_thresholds);
    checkpointer.checkpoint("K4", state).await?;

    k5_task_queue::run(state);
    checkpointer.checkpoint("K5", state).await?;

    let route = k6_kernel_route::run(state, input.charging_station);
    checkpointer.checkpoint("K6", state).await?;

    Ok(route)
}
