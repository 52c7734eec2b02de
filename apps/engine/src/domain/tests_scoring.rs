//! Tests for the scoring formula and round/game transitions.

use crate::domain::scoring::{apply_round_scoring, base_score};
use crate::domain::state::{GameState, Phase, RoundState};
use crate::errors::domain::{DomainError, ValidationKind};

/// A state parked in the transient Scoring phase.
fn scoring_state(declarations: [u8; 4], piles: [u8; 4], multiplier: u8) -> GameState {
    let mut state = GameState::new();
    state.phase = Phase::Scoring;
    state.redeal_multiplier = multiplier;
    for (seat, value) in declarations.iter().enumerate() {
        state.round.declarations[seat] = Some(*value);
    }
    state.round.piles_won = piles;
    state.round.last_trick_winner = Some(1);
    state
}

#[test]
fn base_score_matches_the_formula() {
    // Hit a nonzero target: target + 5.
    assert_eq!(base_score(2, 2), 7);
    assert_eq!(base_score(8, 8), 13);
    // Hit a zero target: +3.
    assert_eq!(base_score(0, 0), 3);
    // Broken zero target: minus every pile captured.
    assert_eq!(base_score(0, 4), -4);
    // Missed nonzero target: minus the distance, either direction.
    assert_eq!(base_score(3, 1), -2);
    assert_eq!(base_score(1, 3), -2);
}

#[test]
fn round_scores_are_multiplied_and_accumulated() {
    let mut state = scoring_state([2, 0, 0, 3], [2, 0, 5, 1], 2);
    let outcome = apply_round_scoring(&mut state, 50).unwrap();

    // (2+5)×2, 3×2, -5×2, -2×2
    assert_eq!(outcome.round_scores, [14, 6, -10, -4]);
    assert_eq!(state.scores_total, [14, 6, -10, -4]);
    assert!(!outcome.game_over);
}

#[test]
fn next_round_is_set_up_after_scoring() {
    let mut state = scoring_state([1, 1, 1, 1], [8, 0, 0, 0], 3);
    state.round.last_trick_winner = Some(3);
    apply_round_scoring(&mut state, 50).unwrap();

    assert_eq!(state.phase, Phase::Preparation);
    assert_eq!(state.round_no, 2);
    // Multiplier resets only at the round boundary.
    assert_eq!(state.redeal_multiplier, 1);
    assert_eq!(state.round_starter, 3);
    assert_eq!(state.round.declarations, [None; 4]);
    assert_eq!(state.round.piles_won, [0; 4]);
    assert!(state.hands.iter().all(|h| h.is_empty()));
    // The finished round is summarized for the next snapshot.
    let summary = state.last_round.as_ref().unwrap();
    assert_eq!(summary.round_no, 1);
    assert_eq!(summary.redeal_multiplier, 3);
}

#[test]
fn zero_streaks_grow_and_reset_with_declarations() {
    let mut state = scoring_state([0, 2, 0, 1], [0, 2, 1, 1], 1);
    state.zero_streaks = [1, 1, 0, 0];
    apply_round_scoring(&mut state, 50).unwrap();

    assert_eq!(state.zero_streaks, [2, 0, 1, 0]);
}

#[test]
fn reaching_the_target_ends_the_game_with_ties_allowed() {
    let mut state = scoring_state([2, 2, 0, 0], [2, 2, 0, 0], 1);
    state.scores_total = [43, 43, 10, -5];
    let outcome = apply_round_scoring(&mut state, 50).unwrap();

    // Both front-runners land on 50 together.
    assert!(outcome.game_over);
    assert_eq!(outcome.totals, [50, 50, 13, -2]);
    assert_eq!(outcome.winners, vec![0, 1]);
    assert_eq!(state.phase, Phase::GameOver);
    assert_eq!(state.winners, vec![0, 1]);
}

#[test]
fn game_continues_below_the_target() {
    let mut state = scoring_state([2, 0, 0, 0], [2, 0, 3, 3], 1);
    state.scores_total = [42, 0, 0, 0];
    let outcome = apply_round_scoring(&mut state, 50).unwrap();
    assert!(!outcome.game_over);
    assert_eq!(state.scores_total[0], 49);
    assert_eq!(state.phase, Phase::Preparation);
}

#[test]
fn scoring_requires_the_scoring_phase() {
    let mut state = scoring_state([1, 1, 1, 1], [0; 4], 1);
    state.phase = Phase::Declaration;
    let err = apply_round_scoring(&mut state, 50).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::PhaseMismatch, _)
    ));
}

#[test]
fn scoring_without_full_declarations_is_an_invariant_error() {
    let mut state = scoring_state([1, 1, 1, 1], [0; 4], 1);
    state.round = RoundState::empty();
    assert!(apply_round_scoring(&mut state, 50).is_err());
}
