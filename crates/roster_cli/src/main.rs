//! Roster CLI
//!
//! Inspect and edit matchday coupling groups from JSON files, and push them
//! to (or pull them from) the admin constraint API.

mod files;
mod render;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use roster_core::sync::StoreRequest;
use roster_core::{
    project, ConstraintSnapshot, ConstraintStore, Gesture, GroupKey, HttpConstraintStore,
    InMemoryConstraintStore, LogSink, Matchday, MatchdaySession, MergePulse, RosterConfig,
    SessionError, SyncCoordinator, SyncReport,
};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Edit and inspect matchday coupling groups", long_about = None)]
struct Cli {
    /// Config file (YAML or JSON); falls back to ROSTER_CONFIG_PATH
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of the text layout
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Inputs {
    /// Roster JSON file
    #[arg(long)]
    roster: PathBuf,

    /// Coupling groups JSON file
    #[arg(long)]
    groups: Option<PathBuf>,
}

#[derive(Args)]
struct Output {
    /// Write the resulting groups back to the groups file
    #[arg(long)]
    write: bool,

    /// Push the resulting groups to the constraint store
    #[arg(long)]
    push: bool,

    /// Use an in-memory store and print the requests instead of calling the API
    #[arg(long)]
    offline: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the roster laid out by role, with groups collapsed
    Project {
        #[command(flatten)]
        inputs: Inputs,
    },

    /// Drop player SOURCE onto player TARGET
    Merge {
        #[command(flatten)]
        inputs: Inputs,
        #[arg(long)]
        source: String,
        #[arg(long)]
        target: String,
        #[command(flatten)]
        output: Output,
    },

    /// Drop player SOURCE onto the group made up of MEMBERS (any order)
    MergeGroup {
        #[command(flatten)]
        inputs: Inputs,
        #[arg(long)]
        source: String,
        #[arg(long, num_args = 1.., required = true)]
        members: Vec<String>,
        #[command(flatten)]
        output: Output,
    },

    /// Take player SOURCE out of its group
    Remove {
        #[command(flatten)]
        inputs: Inputs,
        #[arg(long)]
        source: String,
        #[command(flatten)]
        output: Output,
    },

    /// Fetch the stored couplings, normalized against the roster
    Pull {
        /// Roster JSON file
        #[arg(long)]
        roster: PathBuf,
    },

    /// Replace the stored couplings with the groups file
    Push {
        #[command(flatten)]
        inputs: Inputs,
        /// Use an in-memory store and print the requests instead of calling the API
        #[arg(long)]
        offline: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = RosterConfig::load(cli.config.as_deref()).context("Failed to load config")?;

    match cli.command {
        Commands::Project { inputs } => {
            let roster = files::load_roster(&inputs.roster)?;
            let partition = files::load_groups(inputs.groups.as_deref(), &roster)?;
            let lines = project(&roster, &partition);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&lines)?);
            } else {
                print!("{}", render::role_lines(&lines));
            }
        }

        Commands::Merge { inputs, source, target, output } => {
            edit(&config, &inputs, &output, Gesture::OntoPlayer { source, target }).await?;
        }

        Commands::MergeGroup { inputs, source, members, output } => {
            let key = GroupKey::from_members(&members);
            edit(&config, &inputs, &output, Gesture::OntoGroup { source, key }).await?;
        }

        Commands::Remove { inputs, source, output } => {
            edit(&config, &inputs, &output, Gesture::OntoEmpty { source }).await?;
        }

        Commands::Pull { roster } => {
            let roster = files::load_roster(&roster)?;
            let coordinator = SyncCoordinator::new(HttpConstraintStore::new(&config.store)?);
            let partition = coordinator.pull(&roster).await?;
            println!("{}", serde_json::to_string_pretty(&partition)?);
        }

        Commands::Push { inputs, offline } => {
            let mut session = open_session(&config, &inputs)?;
            commit(&config, &mut session, offline).await?;
        }
    }

    Ok(())
}

/// Today's matchday over the roster file, seeded with the groups file.
fn open_session(config: &RosterConfig, inputs: &Inputs) -> Result<MatchdaySession> {
    let roster = files::load_roster(&inputs.roster)?;
    let partition = files::load_groups(inputs.groups.as_deref(), &roster)?;

    let mut session = MatchdaySession::new(MergePulse::new(config.pulse_duration()));
    session.load(
        Matchday::new(Local::now().date_naive(), roster),
        ConstraintSnapshot { couplings: partition.to_raw(), decouplings: Vec::new() },
    );
    Ok(session)
}

async fn edit(
    config: &RosterConfig,
    inputs: &Inputs,
    output: &Output,
    gesture: Gesture,
) -> Result<()> {
    let mut session = open_session(config, inputs)?;
    let now = Instant::now();

    if !session.apply(&gesture, now) {
        eprintln!("No change");
    }
    if let Some(key) = session.pulse().active(now) {
        log::info!("Highlighting group {} for {:?}", key, session.pulse().duration());
    }
    println!("{}", serde_json::to_string_pretty(session.partition())?);

    if output.write {
        let path = inputs.groups.as_deref().context("--write needs --groups")?;
        files::save_groups(path, session.partition())?;
        eprintln!("Groups written to {}", path.display());
    }

    if output.push {
        commit(config, &mut session, output.offline).await?;
    }
    Ok(())
}

async fn commit(config: &RosterConfig, session: &mut MatchdaySession, offline: bool) -> Result<()> {
    if offline {
        let coordinator = SyncCoordinator::new(InMemoryConstraintStore::new());
        let report = commit_with(&coordinator, session).await?;
        for request in coordinator.store().requests() {
            eprintln!("  {}", describe(&request));
        }
        eprintln!("Offline: {} groups would be stored", report.created);
        return Ok(());
    }

    let store = HttpConstraintStore::new(&config.store)?;
    eprintln!("Pushing {} groups to {}", session.partition().len(), store.base_url());
    let coordinator = SyncCoordinator::new(store);
    let report = commit_with(&coordinator, session).await?;
    eprintln!("Stored {} groups", report.created);
    Ok(())
}

/// Commit through the session, reporting notices to the log.
async fn commit_with<S: ConstraintStore>(
    coordinator: &SyncCoordinator<S>,
    session: &mut MatchdaySession,
) -> Result<SyncReport> {
    match session.commit(coordinator, &LogSink).await {
        Ok(report) => Ok(report),
        Err(SessionError::Sync(e)) if e.left_partial_remote() => {
            log::error!("Remote store now holds only part of the groups; re-run push to repair");
            Err(SessionError::Sync(e).into())
        }
        Err(e) => Err(e.into()),
    }
}

fn describe(request: &StoreRequest) -> String {
    match request {
        StoreRequest::Fetch => "GET /api/admin/constraints".to_string(),
        StoreRequest::DeleteAll => "DELETE /api/admin/constraints".to_string(),
        StoreRequest::Create(players) => {
            format!("POST /api/admin/constraints/couple {}", players.join(", "))
        }
    }
}
