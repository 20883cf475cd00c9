//! tally daemon — hosts an in-process election and a synced client.
//!
//! Deployment glue for demos and manual testing: loads a candidate roster
//! from TOML, opens the ledger, initializes a client session for one
//! voter address, optionally casts a vote, then follows the view channel
//! and logs standings until interrupted.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tally_client::{
    ClientSession, ClientView, FixedIdentity, LedgerBackend, LocalBackend, SyncConfig, SyncEngine,
    VoteController,
};
use tally_ledger::{ElectionConfig, ElectionLedger};
use tally_types::{CandidateId, VoterAddress};

#[derive(Parser)]
#[command(name = "tallyd", about = "tally election daemon")]
struct Cli {
    /// Path to a TOML roster file (`candidates = ["..", ..]`).
    /// Without one, a three-candidate demo roster is used.
    #[arg(long, env = "TALLY_ROSTER")]
    roster: Option<PathBuf>,

    /// Voter address this client acts as.
    #[arg(
        long,
        env = "TALLY_ADDRESS",
        default_value = "0x22fd351a452fc8bf407452e525cd6fa8ce3d30cf"
    )]
    address: VoterAddress,

    /// Debounce window for event-driven refreshes, in milliseconds.
    #[arg(long, default_value_t = 300, env = "TALLY_DEBOUNCE_MS")]
    debounce_ms: u64,

    /// Cast a vote for this candidate id after startup.
    #[arg(long)]
    vote: Option<u32>,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "TALLY_LOG_LEVEL")]
    log_level: String,
}

fn load_roster(cli: &Cli) -> anyhow::Result<ElectionConfig> {
    match &cli.roster {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read roster file {}", path.display()))?;
            let config: ElectionConfig = toml::from_str(&contents)
                .with_context(|| format!("failed to parse roster file {}", path.display()))?;
            tracing::info!(path = %path.display(), candidates = config.candidates.len(), "loaded roster");
            Ok(config)
        }
        None => {
            tracing::info!("no roster file given, using demo roster");
            Ok(ElectionConfig::new([
                "Candidate 1",
                "Candidate 2",
                "Candidate 3",
            ]))
        }
    }
}

fn log_standings(view: &ClientView) {
    for candidate in &view.candidates {
        tracing::info!(
            id = %candidate.id,
            name = %candidate.name,
            votes = candidate.vote_count,
            "standing"
        );
    }
    tracing::info!(
        total = view.total_votes(),
        has_voted = view.has_voted,
        "election state"
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tally_utils::init_tracing(&cli.log_level);

    let roster = load_roster(&cli)?;
    let ledger = Arc::new(ElectionLedger::open(&roster)?);
    let backend: Arc<dyn LedgerBackend> = Arc::new(LocalBackend::new(Arc::clone(&ledger)));

    let identity = FixedIdentity::new(cli.address.clone());
    let session = ClientSession::initialize(&identity, Arc::clone(&backend)).await?;

    let sync_config = SyncConfig {
        debounce_window: Duration::from_millis(cli.debounce_ms),
    };
    let engine = SyncEngine::new(session.clone(), sync_config);
    let _watcher = engine.watch_events(backend.subscribe_votes());
    let mut view_rx = engine.subscribe_view();

    let view = engine.refresh().await?;
    let _ = view_rx.borrow_and_update();
    log_standings(&view);

    if let Some(id) = cli.vote {
        let controller = VoteController::new(session, Arc::clone(&engine));
        match controller.submit_vote(CandidateId::new(id)).await {
            Ok(()) => tracing::info!(candidate = id, "vote submitted"),
            Err(e) => tracing::warn!(candidate = id, error = %e, "vote not accepted"),
        }
    }

    tracing::info!("following election state, ctrl-c to exit");
    loop {
        tokio::select! {
            changed = view_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = view_rx.borrow_and_update().clone();
                if let Some(view) = view {
                    log_standings(&view);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                break;
            }
        }
    }

    Ok(())
}
