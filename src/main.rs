//! Derby - Entry Point
//!
//! Console front end for a game session: generate a schedule, run rounds in
//! real time or skip them, and inspect the standings.

use std::io::{self, Write};

use derby::core::config::{default_config_path, load_config, GameConfig};
use derby::core::error::Result;
use derby::race::{Pace, RaceDriver, RaceResult};
use derby::session::GameSession;
use tokio::runtime::Runtime;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("derby=info")),
        )
        .init();

    tracing::info!("Derby starting...");

    let rt = Runtime::new()?;

    let config = match load_config(default_config_path()) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Could not load {:?} ({}) - using defaults", default_config_path(), e);
            GameConfig::default()
        }
    };

    let mut session = GameSession::new(config)?;
    let driver = RaceDriver::new(session.config().race.clone()).with_pace(Pace::Realtime);

    println!("\n=== DERBY ===");
    println!("Seed: {}", session.seed());
    println!();
    println!("Commands:");
    println!("  horses / h      - Show the roster");
    println!("  schedule        - Generate the race schedule");
    println!("  start           - Start the game and run every round");
    println!("  next / n        - Run the current round");
    println!("  skip            - Skip the current round");
    println!("  finish          - Skip all remaining rounds");
    println!("  results / r     - Show all results");
    println!("  reset           - New roster, new game");
    println!("  quit / q        - Exit the game");
    println!();

    loop {
        display_status(&session);

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        match input {
            "" => continue,
            "quit" | "q" => break,
            "horses" | "h" => display_roster(&session),
            "schedule" => match session.generate_schedule() {
                Ok(schedule) => {
                    for race in schedule {
                        let names: Vec<&str> = race.horses.iter().map(|h| h.name.as_str()).collect();
                        println!("Round {} - {}m: {}", race.round, race.distance, names.join(", "));
                    }
                }
                Err(e) => println!("Cannot generate schedule: {}", e),
            },
            "start" => match session.start() {
                Ok(()) => {
                    println!("And they're off...");
                    match rt.block_on(session.run_all(&driver)) {
                        Ok(results) => results.iter().for_each(display_result),
                        Err(e) => println!("Race failed: {}", e),
                    }
                }
                Err(e) => println!("Cannot start: {}", e),
            },
            "next" | "n" => {
                println!("And they're off...");
                match rt.block_on(session.run_next_round(&driver)) {
                    Ok(result) => display_result(result),
                    Err(e) => println!("Cannot run round: {}", e),
                }
            }
            "skip" => match session.skip_race() {
                Ok(result) => display_result(result),
                Err(e) => println!("Cannot skip: {}", e),
            },
            "finish" => match session.skip_to_end() {
                Ok(results) => println!("{} rounds complete.", results.len()),
                Err(e) => println!("Cannot finish: {}", e),
            },
            "results" | "r" => {
                if session.results().is_empty() {
                    println!("No results yet.");
                }
                for result in session.results() {
                    display_result(result);
                }
            }
            "reset" => match session.reset() {
                Ok(()) => println!("New roster generated."),
                Err(e) => println!("Reset failed: {}", e),
            },
            _ => println!("Unknown command. Available: horses, schedule, start, next, skip, finish, results, reset, quit"),
        }
    }

    tracing::info!("Derby finished with {} results", session.results().len());
    Ok(())
}

fn display_status(session: &GameSession) {
    let state = if session.is_complete() {
        "complete".to_string()
    } else if session.game_started() {
        format!("round {}/{}", session.current_round(), session.rounds())
    } else if session.schedule_generated() {
        "schedule ready".to_string()
    } else {
        "roster ready".to_string()
    };
    println!("[{} horses | {}]", session.roster().len(), state);
}

fn display_roster(session: &GameSession) {
    let last = session.results().last();
    println!("{:<4} {:<18} {:<8} {:>9} {:>6}", "ID", "Name", "Color", "Condition", "Last");
    for horse in session.roster() {
        let placing = last
            .and_then(|result| result.placing(horse.id))
            .map(|place| place.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<4} {:<18} {:<8} {:>9} {:>6}",
            horse.id.0, horse.name, horse.color, horse.condition, placing
        );
    }
}

fn display_result(result: &RaceResult) {
    println!("{}", result.summary());
    for (place, horse) in result.horses.iter().enumerate() {
        let time = horse
            .finish_time
            .map(|t| format!("{:.1}s", t as f64 / 1000.0))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:>2}. {:<18} {:>7.1}m  {}",
            place + 1,
            horse.name,
            horse.position,
            time
        );
    }
}
