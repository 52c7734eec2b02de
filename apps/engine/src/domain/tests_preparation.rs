//! Tests for dealing and the weak-hand redeal negotiation.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::dealing::is_weak_hand;
use crate::domain::pieces_types::HIGHEST_PIECE;
use crate::domain::preparation::{enter_round, redeal_decision};
use crate::domain::state::{GameState, Phase};
use crate::domain::test_state_helpers::pieces;
use crate::errors::domain::{DomainError, ValidationKind};

/// A Preparation state with hand-crafted hands and a fixed weak queue.
fn preparation_state(weak_queue: &[u8]) -> GameState {
    let mut state = GameState::new();
    state.phase = Phase::Preparation;
    // A full partition of the 32-piece set: seats 1 and 2 hold nothing above
    // rank 9, seats 0 and 3 are strong.
    state.hands = [
        pieces(&["GR", "AR", "AB", "ER", "SR", "SR", "SR", "SR"]),
        pieces(&["EB", "RB", "HB", "CB", "SB", "SB", "SB", "SR"]),
        pieces(&["RR", "RB", "HR", "HB", "CR", "CB", "SB", "SB"]),
        pieces(&["GB", "AR", "AB", "ER", "EB", "RR", "HR", "CR"]),
    ];
    state.round.weak_queue = weak_queue.to_vec();
    state
}

#[test]
fn round_one_starter_holds_the_highest_piece() {
    let mut state = GameState::new();
    enter_round(&mut state, &mut ChaCha8Rng::seed_from_u64(42));

    let holder = state
        .hands
        .iter()
        .position(|h| h.contains(&HIGHEST_PIECE))
        .unwrap() as u8;
    assert_eq!(state.round_starter, holder);
    assert_eq!(state.turn_order[0], holder);
}

#[test]
fn enter_round_queues_weak_hands_in_turn_order() {
    let mut state = GameState::new();
    enter_round(&mut state, &mut ChaCha8Rng::seed_from_u64(42));

    let expected: Vec<u8> = state
        .turn_order
        .iter()
        .copied()
        .filter(|&seat| is_weak_hand(&state.hands[seat as usize]))
        .collect();
    assert_eq!(state.round.weak_queue, expected);
    if expected.is_empty() {
        assert_eq!(state.phase, Phase::Declaration);
    } else {
        assert_eq!(state.phase, Phase::Preparation);
    }
}

#[test]
fn only_the_current_decider_may_answer() {
    let mut state = preparation_state(&[1, 2]);
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let err = redeal_decision(&mut state, 2, true, &mut rng).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::NotWeakDecider, _)
    ));
    // Nothing changed; the queue still leads with seat 1.
    assert_eq!(state.round.weak_queue, vec![1, 2]);
    assert_eq!(state.redeal_multiplier, 1);
}

#[test]
fn declines_advance_the_decider_then_finish_preparation() {
    let mut state = preparation_state(&[1, 2]);
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let outcome = redeal_decision(&mut state, 1, false, &mut rng).unwrap();
    assert!(!outcome.accepted);
    assert_eq!(outcome.next_decider, Some(2));
    assert!(!outcome.preparation_complete);
    assert_eq!(state.phase, Phase::Preparation);

    let outcome = redeal_decision(&mut state, 2, false, &mut rng).unwrap();
    assert!(outcome.preparation_complete);
    assert_eq!(state.phase, Phase::Declaration);
    assert_eq!(state.redeal_multiplier, 1);
}

#[test]
fn acceptance_rotates_order_bumps_multiplier_and_redeals() {
    let mut state = preparation_state(&[2]);
    let before_hands = state.hands.clone();
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    let outcome = redeal_decision(&mut state, 2, true, &mut rng).unwrap();
    assert!(outcome.accepted);
    assert_eq!(outcome.redeal_multiplier, 2);
    assert_eq!(state.redeal_multiplier, 2);
    assert_eq!(state.round_starter, 2);
    assert_eq!(state.turn_order, [2, 3, 0, 1]);
    assert_ne!(state.hands, before_hands);
    // Negotiation restarted on the new hands.
    let expected_weak: Vec<u8> = state
        .turn_order
        .iter()
        .copied()
        .filter(|&seat| is_weak_hand(&state.hands[seat as usize]))
        .collect();
    assert_eq!(state.round.weak_queue, expected_weak);
}

#[test]
fn each_acceptance_increments_the_multiplier_again() {
    let mut state = preparation_state(&[2]);
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    redeal_decision(&mut state, 2, true, &mut rng).unwrap();

    // Force another negotiation regardless of what was dealt.
    state.phase = Phase::Preparation;
    state.round.weak_queue = vec![0];
    redeal_decision(&mut state, 0, true, &mut rng).unwrap();
    assert_eq!(state.redeal_multiplier, 3);
    assert_eq!(state.round_starter, 0);
}

#[test]
fn decisions_outside_preparation_are_rejected() {
    let mut state = preparation_state(&[1]);
    state.phase = Phase::Declaration;
    let err = redeal_decision(&mut state, 1, true, &mut ChaCha8Rng::seed_from_u64(1)).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::PhaseMismatch, _)
    ));
}

#[test]
fn decision_with_nothing_pending_is_rejected() {
    let mut state = preparation_state(&[]);
    let err = redeal_decision(&mut state, 0, true, &mut ChaCha8Rng::seed_from_u64(1)).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::NotWeakDecider, _)
    ));
}
