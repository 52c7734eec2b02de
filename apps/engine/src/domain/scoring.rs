//! Scoring phase: the round formula, game completion, and round advance.

use tracing::{debug, info};

use super::rules::PLAYERS;
use super::state::{GameState, Phase, PlayerId, RoundResult, RoundState};
use crate::errors::domain::{DomainError, ValidationKind};

/// Outcome of scoring a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundScoreOutcome {
    /// Per-seat round scores (base × redeal multiplier).
    pub round_scores: [i16; PLAYERS],
    /// Cumulative totals after this round.
    pub totals: [i16; PLAYERS],
    pub game_over: bool,
    /// Seats sharing the highest total, when the game completed.
    pub winners: Vec<PlayerId>,
}

/// Base score for one player's round.
///
/// Hitting a nonzero target pays the target plus five; hitting a zero target
/// pays three. Missing costs the distance, except a broken zero target which
/// costs every pile captured.
pub fn base_score(declared: u8, captured: u8) -> i16 {
    if declared == captured {
        if declared == 0 {
            3
        } else {
            declared as i16 + 5
        }
    } else if declared == 0 {
        -(captured as i16)
    } else {
        -((declared as i16 - captured as i16).abs())
    }
}

/// Apply round scoring and either finish the game or set up the next round.
///
/// Consumes the transient Scoring phase: on exit the state is either
/// `GameOver` (winners set) or back in `Preparation` with per-round state
/// cleared and the final-trick winner installed as next starter. The caller
/// is responsible for dealing the next round.
pub fn apply_round_scoring(
    state: &mut GameState,
    target_score: i16,
) -> Result<RoundScoreOutcome, DomainError> {
    if state.phase != Phase::Scoring {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            "Scoring can only run once all hands are empty",
        ));
    }

    let mut declarations = [0u8; PLAYERS];
    for (seat, declared) in state.round.declarations.iter().enumerate() {
        declarations[seat] = declared.ok_or_else(|| {
            DomainError::validation_other(format!(
                "Invariant violated: seat {seat} has no declaration at scoring"
            ))
        })?;
    }

    let mut round_scores = [0i16; PLAYERS];
    for seat in 0..PLAYERS {
        let declared = declarations[seat];
        let captured = state.round.piles_won[seat];
        round_scores[seat] = base_score(declared, captured) * state.redeal_multiplier as i16;
        state.scores_total[seat] += round_scores[seat];

        state.zero_streaks[seat] = if declared == 0 {
            state.zero_streaks[seat] + 1
        } else {
            0
        };
    }
    debug!(round_no = state.round_no, ?round_scores, totals = ?state.scores_total, "Round scored");

    state.last_round = Some(RoundResult {
        round_no: state.round_no,
        declarations,
        piles_won: state.round.piles_won,
        round_scores,
        redeal_multiplier: state.redeal_multiplier,
    });

    let best = state.scores_total.iter().max().copied().unwrap_or(0);
    let game_over = best >= target_score;
    let winners: Vec<PlayerId> = if game_over {
        (0..PLAYERS as PlayerId)
            .filter(|&seat| state.scores_total[seat as usize] == best)
            .collect()
    } else {
        Vec::new()
    };

    if game_over {
        state.phase = Phase::GameOver;
        state.winners = winners.clone();
        info!(round_no = state.round_no, ?winners, totals = ?state.scores_total, "Game complete");
    } else {
        let next_starter = state.round.last_trick_winner.ok_or_else(|| {
            DomainError::validation_other("Invariant violated: no final-trick winner at scoring")
        })?;
        state.round_no += 1;
        state.redeal_multiplier = 1;
        state.round_starter = next_starter;
        state.round = RoundState::empty();
        state.hands = Default::default();
        state.phase = Phase::Preparation;
    }

    Ok(RoundScoreOutcome {
        round_scores,
        totals: state.scores_total,
        game_over,
        winners,
    })
}
