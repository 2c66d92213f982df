//! Calypso themes replay tool
//!
//! Loads a themes config and a persisted state blob, applies a JSON-lines
//! action log and prints the resulting persisted state.
//!
//! Usage:
//!   calypso-replay --state persisted.json --actions log.jsonl

use anyhow::{Context, Result};
use calypso_replay::{load_state, render, replay};
use calypso_state::ThemesConfig;
use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "calypso-replay")]
#[command(about = "Replay themes actions against persisted Calypso state")]
struct Args {
    /// Path to the themes config (TOML)
    #[arg(short, long, default_value = "themes.toml")]
    config: PathBuf,

    /// Path to the persisted state (JSON)
    #[arg(short, long)]
    state: PathBuf,

    /// Path to the action log (JSON lines)
    #[arg(short, long)]
    actions: PathBuf,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let config = ThemesConfig::load_from(&args.config);
    let state = load_state(&args.state, config)?;

    info!("Replaying {:?}", args.actions);
    let log = File::open(&args.actions)
        .with_context(|| format!("Failed to open action log {}", args.actions.display()))?;
    let state = replay(state, BufReader::new(log))?;

    println!("{}", render(&state)?);
    Ok(())
}
