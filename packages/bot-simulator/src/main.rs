//! Bot simulator CLI - fast automated game runs through the real session
//! coordinator.
//!
//! Useful for smoke-testing the engine end to end and for comparing bot
//! strategies; each game result is written to stdout as one JSON line.

mod simulator;

use std::time::Duration;

use clap::Parser;
use engine::config::EngineConfig;
use tracing::info;

use simulator::{BotType, Simulator};

#[derive(Parser)]
#[command(name = "bot-simulator")]
#[command(about = "Automated game simulator for the tile-capture engine")]
struct Args {
    /// Number of games to simulate
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// Bot type for all seats (shortcut for the four seat options)
    #[arg(long, conflicts_with_all = ["seat0", "seat1", "seat2", "seat3"])]
    seats: Option<BotType>,

    /// Bot type for seat 0
    #[arg(long, default_value = "greedy")]
    seat0: BotType,

    /// Bot type for seat 1
    #[arg(long, default_value = "greedy")]
    seat1: BotType,

    /// Bot type for seat 2
    #[arg(long, default_value = "random")]
    seat2: BotType,

    /// Bot type for seat 3
    #[arg(long, default_value = "random")]
    seat3: BotType,

    /// Base seed for deterministic games; game n uses seed + n
    #[arg(long)]
    seed: Option<u64>,

    /// Cumulative score that ends a game
    #[arg(long, default_value = "50")]
    target_score: i16,

    /// Per-game timeout in seconds
    #[arg(long, default_value = "120")]
    timeout_secs: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.verbose {
        tracing_subscriber::fmt().with_env_filter("debug").init();
    } else {
        // RUST_LOG-driven, defaulting to info.
        engine::telemetry::init_tracing();
    }

    let seats = match args.seats {
        Some(all) => [all; 4],
        None => [args.seat0, args.seat1, args.seat2, args.seat3],
    };
    let simulator = Simulator {
        seats,
        target_score: args.target_score,
        timeout: Duration::from_secs(args.timeout_secs),
        engine_config: EngineConfig::from_env(),
    };

    let mut wins = [0u32; 4];
    let mut finished = 0u32;
    for game_no in 0..args.games {
        let seed = args.seed.map(|s| s.wrapping_add(game_no as u64));
        let Some(result) = simulator.run_game(game_no, seed).await else {
            continue;
        };
        finished += 1;
        for &winner in &result.winners {
            wins[winner as usize] += 1;
        }
        println!("{}", serde_json::to_string(&result)?);
    }

    info!(
        games = args.games,
        finished,
        wins = ?wins,
        "Simulation complete"
    );
    Ok(())
}
