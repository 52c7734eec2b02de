//! Tests for the Declaration phase rules.

use crate::domain::declaration::{declare, forbidden_values, legal_values};
use crate::domain::state::Phase;
use crate::domain::test_state_helpers::{declaration_state, small_hands};
use crate::errors::domain::{DomainError, ValidationKind};

#[test]
fn declarations_proceed_in_turn_order_from_the_starter() {
    let mut state = declaration_state(small_hands(), 2);
    assert_eq!(state.turn_order, [2, 3, 0, 1]);

    // Seat 0 is not first in order.
    let err = declare(&mut state, 0, 1).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::OutOfTurn, _)
    ));
    assert!(state.round.declarations.iter().all(|d| d.is_none()));

    declare(&mut state, 2, 1).unwrap();
    declare(&mut state, 3, 2).unwrap();
    declare(&mut state, 0, 0).unwrap();
    let result = declare(&mut state, 1, 1).unwrap();
    assert!(result.declarations_complete);
    assert_eq!(state.phase, Phase::Turn { turn_no: 1 });
    assert_eq!(state.round.trick_leader, Some(2));
}

#[test]
fn values_outside_zero_to_eight_are_rejected() {
    let mut state = declaration_state(small_hands(), 0);
    let err = declare(&mut state, 0, 9).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidDeclaration, _)
    ));
}

#[test]
fn last_declarer_cannot_complete_a_total_of_eight() {
    let mut state = declaration_state(small_hands(), 0);
    declare(&mut state, 0, 3).unwrap();
    declare(&mut state, 1, 2).unwrap();
    declare(&mut state, 2, 1).unwrap();

    // 3 + 2 + 1 + 2 == 8 is forbidden for the last declarer.
    let err = declare(&mut state, 3, 2).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::ForbiddenDeclarationTotal, _)
    ));

    // Any other value in range is fine.
    declare(&mut state, 3, 3).unwrap();
    let total: u8 = state.round.declarations.iter().flatten().sum();
    assert_ne!(total, 8);
}

#[test]
fn earlier_declarers_may_pass_through_eight() {
    let mut state = declaration_state(small_hands(), 0);
    declare(&mut state, 0, 8).unwrap();
    declare(&mut state, 1, 0).unwrap();
    declare(&mut state, 2, 0).unwrap();
    // Total is already 8 before the last declarer; only completing exactly
    // 8 is forbidden, so 0 is legal here.
    declare(&mut state, 3, 1).unwrap();
}

#[test]
fn two_zero_rounds_force_a_nonzero_declaration() {
    let mut state = declaration_state(small_hands(), 0);
    state.zero_streaks[0] = 2;

    let err = declare(&mut state, 0, 0).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::ForcedNonZeroDeclaration, _)
    ));
    declare(&mut state, 0, 1).unwrap();
}

#[test]
fn a_single_zero_round_does_not_force_anything() {
    let mut state = declaration_state(small_hands(), 0);
    state.zero_streaks[0] = 1;
    declare(&mut state, 0, 0).unwrap();
}

#[test]
fn rejected_declaration_can_be_corrected_and_resubmitted() {
    let mut state = declaration_state(small_hands(), 0);
    declare(&mut state, 0, 3).unwrap();
    declare(&mut state, 1, 2).unwrap();
    declare(&mut state, 2, 1).unwrap();

    assert!(declare(&mut state, 3, 2).is_err());
    // The rejection left no trace; the corrected value goes through.
    assert_eq!(state.round.declarations[3], None);
    let result = declare(&mut state, 3, 0).unwrap();
    assert!(result.declarations_complete);
}

#[test]
fn forbidden_values_cover_both_rules() {
    let mut state = declaration_state(small_hands(), 0);
    state.zero_streaks[0] = 2;
    assert_eq!(forbidden_values(&state), vec![0]);

    declare(&mut state, 0, 3).unwrap();
    declare(&mut state, 1, 2).unwrap();
    declare(&mut state, 2, 1).unwrap();
    // Last declarer: completing to 8 means declaring 2.
    assert_eq!(forbidden_values(&state), vec![2]);
    assert!(!legal_values(&state).contains(&2));
    assert_eq!(legal_values(&state).len(), 8);
}

#[test]
fn declarations_outside_the_phase_are_rejected() {
    let mut state = declaration_state(small_hands(), 0);
    state.phase = Phase::Preparation;
    let err = declare(&mut state, 0, 1).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::PhaseMismatch, _)
    ));
}
