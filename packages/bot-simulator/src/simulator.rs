//! Runs one automated session to completion and summarizes it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::warn;

use engine::bot::{spawn_bot, BotPlayer, GreedyBot, Pacing, RandomBot};
use engine::config::EngineConfig;
use engine::domain::snapshot::{PhaseSnapshot, SeatPublic};
use engine::session::{spawn_session, SessionEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BotType {
    Greedy,
    Random,
}

impl BotType {
    fn build(self, seed: Option<u64>) -> Arc<dyn BotPlayer> {
        match self {
            BotType::Greedy => Arc::new(GreedyBot::new()),
            BotType::Random => Arc::new(RandomBot::new(seed)),
        }
    }
}

/// Summary of one finished game, written as a JSONL record.
#[derive(Debug, Serialize)]
pub struct GameResult {
    pub game_no: u32,
    pub rounds: u8,
    pub winners: Vec<u8>,
    pub scores_total: [i16; 4],
    pub events: u64,
    pub duration_ms: u128,
}

pub struct Simulator {
    pub seats: [BotType; 4],
    pub target_score: i16,
    pub timeout: Duration,
    pub engine_config: EngineConfig,
}

impl Simulator {
    /// Run one game with the configured bots and wait for completion.
    pub async fn run_game(&self, game_no: u32, seed: Option<u64>) -> Option<GameResult> {
        let started = Instant::now();
        let seating = [
            SeatPublic::bot(0, format!("{:?} 1", self.seats[0])),
            SeatPublic::bot(1, format!("{:?} 2", self.seats[1])),
            SeatPublic::bot(2, format!("{:?} 3", self.seats[2])),
            SeatPublic::bot(3, format!("{:?} 4", self.seats[3])),
        ];
        let mut config = self.engine_config.session_config(seating);
        config.target_score = self.target_score;
        config.rng_seed = seed;
        // Nobody drains broadcasts while a game is scripted at full speed;
        // leave room so the monitor never lags.
        config.broadcast_capacity = config.broadcast_capacity.max(256);
        let handle = spawn_session(config);

        let mut events = handle.subscribe();
        for (seat, bot_type) in self.seats.iter().enumerate() {
            let bot_seed = seed.map(|s| s.wrapping_add(seat as u64 + 1));
            spawn_bot(
                handle.clone(),
                seat as u8,
                bot_type.build(bot_seed),
                Pacing::none(),
            );
        }

        let mut event_count = 0u64;
        let outcome = tokio::time::timeout(self.timeout, async {
            loop {
                match events.recv().await {
                    Ok(SessionEvent::Phase { snapshot, .. }) => {
                        event_count += 1;
                        if let PhaseSnapshot::GameOver(over) = snapshot.phase {
                            return Some((snapshot.game.round_no, over));
                        }
                    }
                    Ok(SessionEvent::CriticalError { detail }) => {
                        warn!(game_no, %detail, "Session halted on an internal error");
                        return None;
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => return None,
                }
            }
        })
        .await;

        match outcome {
            Ok(Some((rounds, over))) => Some(GameResult {
                game_no,
                rounds,
                winners: over.winners,
                scores_total: over.scores_total,
                events: event_count,
                duration_ms: started.elapsed().as_millis(),
            }),
            Ok(None) => None,
            Err(_) => {
                warn!(game_no, "Game did not finish before the timeout");
                None
            }
        }
    }
}
