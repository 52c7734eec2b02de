//! Engine configuration from environment variables.

use std::time::Duration;

use tracing::warn;

use crate::bot::Pacing;
use crate::domain::rules::{DEFAULT_TARGET_SCORE, PLAYERS};
use crate::domain::snapshot::SeatPublic;
use crate::session::SessionConfig;

/// Process-level engine defaults, applied to new sessions.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// First cumulative total at or above this ends the game.
    pub target_score: i16,
    /// Bound on queued-but-unapplied actions per session.
    pub queue_capacity: usize,
    /// Bound on undelivered broadcast events per subscriber.
    pub broadcast_capacity: usize,
    /// Delay range applied before each bot submission.
    pub bot_pacing: Pacing,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_score: DEFAULT_TARGET_SCORE,
            queue_capacity: 64,
            broadcast_capacity: 64,
            bot_pacing: Pacing::human_like(),
        }
    }
}

impl EngineConfig {
    /// Read configuration from the environment, falling back to defaults on
    /// missing or unparseable values.
    ///
    /// Variables: `ENGINE_TARGET_SCORE`, `ENGINE_QUEUE_CAPACITY`,
    /// `ENGINE_BOT_DELAY_MS_MIN`, `ENGINE_BOT_DELAY_MS_MAX`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let min_ms = env_parse("ENGINE_BOT_DELAY_MS_MIN", defaults.bot_pacing.min.as_millis() as u64);
        let max_ms = env_parse("ENGINE_BOT_DELAY_MS_MAX", defaults.bot_pacing.max.as_millis() as u64);
        Self {
            target_score: env_parse("ENGINE_TARGET_SCORE", defaults.target_score),
            queue_capacity: env_parse("ENGINE_QUEUE_CAPACITY", defaults.queue_capacity),
            broadcast_capacity: defaults.broadcast_capacity,
            bot_pacing: Pacing {
                min: Duration::from_millis(min_ms),
                max: Duration::from_millis(max_ms.max(min_ms)),
            },
        }
    }

    /// Session settings derived from these process defaults.
    pub fn session_config(&self, seating: [SeatPublic; PLAYERS]) -> SessionConfig {
        SessionConfig {
            seating,
            target_score: self.target_score,
            rng_seed: None,
            queue_capacity: self.queue_capacity,
            broadcast_capacity: self.broadcast_capacity,
        }
    }
}

fn env_parse<T: std::str::FromStr + Copy>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(name, %raw, "Unparseable value in environment; using default");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.target_score, 50);
        assert!(cfg.queue_capacity > 0);
        assert!(cfg.bot_pacing.min <= cfg.bot_pacing.max);
    }

    #[test]
    fn session_config_carries_the_defaults() {
        let cfg = EngineConfig::default();
        let session = cfg.session_config([
            SeatPublic::human(0, "A"),
            SeatPublic::human(1, "B"),
            SeatPublic::human(2, "C"),
            SeatPublic::human(3, "D"),
        ]);
        assert_eq!(session.target_score, cfg.target_score);
        assert_eq!(session.queue_capacity, cfg.queue_capacity);
        assert_eq!(session.rng_seed, None);
    }
}
