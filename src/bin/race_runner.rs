//! Headless Race Runner
//!
//! Plays a full game (roster, schedule, every round) and prints the results.

use std::path::PathBuf;

use clap::Parser;
use derby::core::config::{load_config, GameConfig};
use derby::race::{Pace, RaceDriver, RaceFrame, RaceResult};
use derby::session::GameSession;
use serde::Serialize;
use tokio::sync::watch;

/// Headless Race Runner - simulate a full game of six rounds
#[derive(Parser, Debug)]
#[command(name = "race_runner")]
#[command(about = "Run every round of a derby game and output the results")]
struct Args {
    /// Game config file (TOML); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Step races against the wall clock instead of as fast as possible
    #[arg(long)]
    realtime: bool,

    /// Skip every race instead of stepping it
    #[arg(long)]
    skip: bool,

    /// Log race progress while stepping
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct GameReport<'a> {
    seed: u64,
    rounds: usize,
    results: &'a [RaceResult],
}

#[tokio::main]
async fn main() -> derby::Result<()> {
    let args = Args::parse();

    let directive = if args.verbose { "derby=debug" } else { "derby=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directive)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GameConfig::default(),
    };
    if args.seed.is_some() {
        config.session.seed = args.seed;
    }

    let mut session = GameSession::new(config)?;
    session.generate_schedule()?;

    if args.skip {
        session.skip_to_end()?;
    } else {
        let pace = if args.realtime { Pace::Realtime } else { Pace::Immediate };
        let (tx, rx) = watch::channel(RaceFrame::default());
        let driver = RaceDriver::new(session.config().race.clone())
            .with_pace(pace)
            .with_progress(tx);

        let watcher = args.verbose.then(|| tokio::spawn(log_progress(rx)));
        session.run_all(&driver).await?;
        drop(driver);
        if let Some(watcher) = watcher {
            let _ = watcher.await;
        }
    }

    match args.format.as_str() {
        "text" => {
            println!("Seed: {}", session.seed());
            for result in session.results() {
                println!("{}", result.summary());
                for (place, horse) in result.horses.iter().enumerate() {
                    println!("  {:>2}. {} ({:.1}m)", place + 1, horse.name, horse.position);
                }
            }
        }
        _ => {
            let report = GameReport {
                seed: session.seed(),
                rounds: session.results().len(),
                results: session.results(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

/// Log the leader whenever a new frame lands; ends when the driver is dropped
async fn log_progress(mut rx: watch::Receiver<RaceFrame>) {
    while rx.changed().await.is_ok() {
        let frame = rx.borrow_and_update().clone();
        if let Some(leader) = frame
            .horses
            .iter()
            .max_by(|a, b| a.position.total_cmp(&b.position))
        {
            tracing::debug!(
                round = frame.round,
                elapsed_ms = frame.elapsed_ms,
                leader = %leader.id,
                position = leader.position,
                "progress"
            );
        }
    }
}
