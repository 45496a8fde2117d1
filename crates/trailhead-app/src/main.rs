use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use trailhead_app::game_loop::{spawn_game_loop, LoopOptions};
use trailhead_app::script::load_script;
use trailhead_app::state::{AppState, GameLoopCommand};
use trailhead_core::commands::InputEvent;
use trailhead_core::config::GameConfig;

/// Trailhead: drive a vehicle around a field of trigger zones.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON game config. Defaults to the stock layout.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this many frames.
    #[arg(long)]
    frames: Option<u64>,

    /// Frame-stamped input script (JSON array of { frame, event }).
    #[arg(long)]
    script: Option<PathBuf>,

    /// Run frames back to back on a simulated clock instead of pacing to
    /// the wall clock.
    #[arg(long)]
    fast: bool,

    /// Read one JSON input event per line from stdin. EOF shuts the loop down.
    #[arg(long)]
    stdin: bool,

    /// Print the final frame snapshot as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::with_default_zones(),
    };
    let script = match &args.script {
        Some(path) => load_script(path)?,
        None => Vec::new(),
    };
    if args.frames.is_none() && !args.stdin && args.fast {
        warn!("--fast without --frames or --stdin runs until killed");
    }

    let options = LoopOptions {
        max_frames: args.frames,
        realtime: !args.fast,
        script,
    };

    let state = AppState::new();
    let (tx, handle) = spawn_game_loop(config, options, Arc::clone(&state.latest_snapshot))
        .context("spawning game loop thread")?;
    if let Ok(mut lock) = state.command_tx.lock() {
        *lock = Some(tx);
    }

    if args.stdin {
        forward_stdin(&state);
    }

    let summary = handle
        .join()
        .map_err(|_| anyhow!("game loop thread panicked"))??;
    info!(
        frames = summary.frames,
        zone_events = summary.zone_events.len(),
        "run finished"
    );

    if args.json {
        let snapshot = state.snapshot().or(summary.last_snapshot);
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }
    Ok(())
}

/// Forward stdin events to the loop until EOF, then request shutdown.
fn forward_stdin(state: &AppState) {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<InputEvent>(line) {
            Ok(event) => {
                if !state.send(GameLoopCommand::Input(event)) {
                    break;
                }
            }
            Err(e) => warn!(error = %e, "ignoring malformed input line"),
        }
    }
    state.send(GameLoopCommand::Shutdown);
}
