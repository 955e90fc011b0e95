//! `brainstem` - host binary for the mobile-robot decision core.
//!
//! Wires the reference adapters (`brainstem-adapters`) to the Kernel/ReAct
//! graph (`brainstem-core`, `brainstem-react`) and drives it one tick at a
//! time from the command line.

mod config;
mod error;
mod host;

use std::sync::Arc;

use anyhow::Context;
use brainstem_adapters::{HttpOracleClient, OracleConfig, SimulatedExecutor, SimulatedTelemetry};
use brainstem_checkpoint::{CheckpointSaver, FileCheckpointSaver, InMemoryCheckpointSaver};
use brainstem_core::driver::NodeCheckpointer;
use brainstem_core::state::ApprovalResponse;
use brainstem_core::SkillRegistry;
use clap::{Parser, Subcommand};
use config::{BrainstemConfig, CheckpointBackend};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "brainstem")]
#[command(about = "Mobile-robot decision core: Kernel + ReAct scheduler", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Emit logs as JSON instead of the default human-readable format.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a fixed number of host ticks against the in-process reference adapters.
    Run {
        /// Thread id to run (or resume) under.
        #[arg(long, default_value = "default")]
        thread_id: String,
        /// Utterance to deliver on the first tick, e.g. "go to kitchen".
        #[arg(long, default_value = "")]
        utterance: String,
        /// Number of host ticks to run.
        #[arg(long, default_value_t = 5)]
        ticks: u32,
    },
    /// Resume a thread suspended at R5 with a human approval response.
    Approve {
        /// Thread id to resume.
        #[arg(long)]
        thread_id: String,
        /// One of "approve" or "reject".
        #[arg(long)]
        response: String,
    },
    /// Print the resolved configuration and exit.
    Config,
    /// Print version information.
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    let config = BrainstemConfig::load()
        .await
        .context("failed to load brainstem configuration")?;

    match cli.command {
        Commands::Run {
            thread_id,
            utterance,
            ticks,
        } => run(&config, &thread_id, &utterance, ticks).await,
        Commands::Approve {
            thread_id,
            response,
        } => approve(&config, &thread_id, &response).await,
        Commands::Config => {
            println!("{}", toml::to_string_pretty(&config).context("serializing config")?);
            Ok(())
        }
        Commands::Version => {
            println!("brainstem {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

async fn checkpoint_saver(config: &BrainstemConfig) -> anyhow::Result<Arc<dyn CheckpointSaver>> {
    Ok(match config.checkpoint_backend {
        CheckpointBackend::Memory => Arc::new(InMemoryCheckpointSaver::new()) as Arc<dyn CheckpointSaver>,
        CheckpointBackend::File => Arc::new(
            FileCheckpointSaver::new(&config.checkpoint_dir)
                .await
                .context("constructing file checkpoint backend")?,
        ) as Arc<dyn CheckpointSaver>,
    })
}

fn oracle_client(config: &BrainstemConfig) -> HttpOracleClient {
    HttpOracleClient::new(OracleConfig::new(
        config.oracle_api_key.clone().unwrap_or_default(),
        config.oracle_base_url.clone(),
        config.oracle_model.clone(),
    ))
}

async fn run(
    config: &BrainstemConfig,
    thread_id: &str,
    utterance: &str,
    ticks: u32,
) -> anyhow::Result<()> {
    let saver = checkpoint_saver(config).await?;
    let (mut checkpointer, mut state) = NodeCheckpointer::resume(saver, thread_id)
        .await
        .context("resuming checkpointer")?;

    let telemetry = SimulatedTelemetry::new();
    let executor = SimulatedExecutor::new();
    let oracle = oracle_client(config);
    let registry = SkillRegistry::with_builtins();

    for i in 0..ticks {
        let this_tick_utterance = if i == 0 { utterance } else { "" };
        let summary = host::tick(
            &mut state,
            this_tick_utterance,
            &telemetry,
            &oracle,
            &executor,
            &registry,
            config,
            &mut checkpointer,
        )
        .await
        .context("running host tick")?;
        tracing::info!(tick = i, ?summary, "tick complete");

        if matches!(summary, host::TickSummary::ReactAwaitingApproval) {
            println!(
                "thread {thread_id} suspended awaiting approval; resume with `brainstem approve --thread-id {thread_id} --response <approve|reject>`"
            );
            break;
        }
    }

    Ok(())
}

async fn approve(config: &BrainstemConfig, thread_id: &str, response: &str) -> anyhow::Result<()> {
    let saver = checkpoint_saver(config).await?;
    let (mut checkpointer, mut state) = NodeCheckpointer::resume(saver, thread_id)
        .await
        .context("resuming checkpointer")?;

    state.hci.approval_response = Some(match response {
        "approve" => ApprovalResponse::Approve,
        "reject" => ApprovalResponse::Reject,
        other => anyhow::bail!("unknown approval response: {other} (expected approve|reject)"),
    });

    let telemetry = SimulatedTelemetry::new();
    let executor = SimulatedExecutor::new();
    let oracle = oracle_client(config);
    let registry = SkillRegistry::with_builtins();

    let summary = host::tick(
        &mut state,
        "",
        &telemetry,
        &oracle,
        &executor,
        &registry,
        config,
        &mut checkpointer,
    )
    .await
    .context("resuming host tick after approval")?;
    tracing::info!(?summary, "resumed after approval");
    Ok(())
}
