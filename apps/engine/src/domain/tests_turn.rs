//! Tests for trick play and resolution.

use crate::domain::state::Phase;
use crate::domain::test_state_helpers::{pieces, turn_state};
use crate::domain::turn::{legal_plays, play_pieces};
use crate::errors::domain::{DomainError, FatalKind, ValidationKind};

#[test]
fn higher_matching_straight_beats_the_leader_and_captures_three_piles() {
    // Leader opens with the black straight; seat 2 answers with the higher
    // red straight; the other two commit unclassifiable trios.
    let mut state = turn_state(
        [
            pieces(&["RB", "HB", "CB"]),
            pieces(&["GB", "AB", "SB"]),
            pieces(&["RR", "HR", "CR"]),
            pieces(&["AR", "ER", "SR"]),
        ],
        0,
        [1, 1, 3, 1],
    );

    play_pieces(&mut state, 0, &pieces(&["RB", "HB", "CB"])).unwrap();
    assert_eq!(state.round.required_count, Some(3));

    play_pieces(&mut state, 1, &pieces(&["GB", "AB", "SB"])).unwrap();
    play_pieces(&mut state, 2, &pieces(&["RR", "HR", "CR"])).unwrap();
    let result = play_pieces(&mut state, 3, &pieces(&["AR", "ER", "SR"])).unwrap();

    assert!(result.trick_completed);
    assert_eq!(result.trick_winner, Some(2));
    // Three piles for a three-piece winning play, not a flat one.
    assert_eq!(result.piles_awarded, 3);
    assert_eq!(state.round.piles_won, [0, 0, 3, 0]);
    // Seat 3's trio is worth 24 to the straight's 18 but cannot win.
    assert!(result.round_completed);
    assert_eq!(state.phase, Phase::Scoring);
}

#[test]
fn winner_of_a_trick_leads_the_next_one() {
    let mut state = turn_state(
        [
            pieces(&["CB", "SR"]),
            pieces(&["SR", "SB"]),
            pieces(&["AR", "SB"]),
            pieces(&["AB", "SB"]),
        ],
        0,
        [1, 1, 1, 1],
    );

    play_pieces(&mut state, 0, &pieces(&["CB"])).unwrap();
    play_pieces(&mut state, 1, &pieces(&["SR"])).unwrap();
    play_pieces(&mut state, 2, &pieces(&["AR"])).unwrap();
    let result = play_pieces(&mut state, 3, &pieces(&["AB"])).unwrap();

    assert_eq!(result.trick_winner, Some(2));
    assert_eq!(result.piles_awarded, 1);
    assert!(!result.round_completed);
    assert_eq!(state.phase, Phase::Turn { turn_no: 2 });
    assert_eq!(state.round.trick_leader, Some(2));
    assert_eq!(state.round.required_count, None);
    assert_eq!(state.expected_trick_actor(), Some(2));

    // Second trick proceeds from the new leader in turn order.
    play_pieces(&mut state, 2, &pieces(&["SB"])).unwrap();
    play_pieces(&mut state, 3, &pieces(&["SB"])).unwrap();
    play_pieces(&mut state, 0, &pieces(&["SR"])).unwrap();
    let result = play_pieces(&mut state, 1, &pieces(&["SB"])).unwrap();
    assert_eq!(result.trick_winner, Some(0));
    assert!(result.round_completed);
    assert_eq!(state.round.piles_won, [1, 0, 1, 0]);
}

#[test]
fn value_ties_go_to_the_earliest_committed_play() {
    let mut state = turn_state(
        [
            pieces(&["CB", "SR"]),
            pieces(&["SR", "SB"]),
            pieces(&["AR", "SB"]),
            pieces(&["AR", "SB"]),
        ],
        0,
        [1, 1, 1, 1],
    );

    play_pieces(&mut state, 0, &pieces(&["CB"])).unwrap();
    play_pieces(&mut state, 1, &pieces(&["SR"])).unwrap();
    play_pieces(&mut state, 2, &pieces(&["AR"])).unwrap();
    let result = play_pieces(&mut state, 3, &pieces(&["AR"])).unwrap();

    // Seats 2 and 3 tie on value; seat 2 committed first.
    assert_eq!(result.trick_winner, Some(2));
}

#[test]
fn validation_rejections_leave_the_trick_untouched() {
    let mut state = turn_state(
        [
            pieces(&["SR", "SR", "GR"]),
            pieces(&["SB", "SB", "GB"]),
            pieces(&["AR", "AR", "ER"]),
            pieces(&["AB", "AB", "EB"]),
        ],
        0,
        [2, 0, 2, 0],
    );

    // Out of turn.
    let err = play_pieces(&mut state, 1, &pieces(&["SB"])).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::OutOfTurn, _)
    ));

    // A lead must contain at least one piece.
    let err = play_pieces(&mut state, 0, &[]).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::WrongPieceCount, _)
    ));

    // Unowned piece.
    let err = play_pieces(&mut state, 0, &pieces(&["CB"])).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::PieceNotInHand, _)
    ));

    // An unclassifiable lead is refused outright.
    let err = play_pieces(&mut state, 0, &pieces(&["SR", "GR"])).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::UnrecognizedLead, _)
    ));

    // Nothing was committed by any of the rejections.
    assert!(state.round.turn_plays.is_empty());
    assert_eq!(state.round.required_count, None);
    assert_eq!(state.hands[0].len(), 3);
}

#[test]
fn followers_must_match_count_but_not_classification() {
    let mut state = turn_state(
        [
            pieces(&["SR", "SR", "GR"]),
            pieces(&["SB", "SB", "GB"]),
            pieces(&["AR", "AR", "ER"]),
            pieces(&["AB", "AB", "EB"]),
        ],
        0,
        [2, 0, 2, 0],
    );

    play_pieces(&mut state, 0, &pieces(&["SR", "SR"])).unwrap();

    // Wrong piece count for a follower.
    let err = play_pieces(&mut state, 1, &pieces(&["SB"])).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::WrongPieceCount, _)
    ));

    // The corrected resubmission succeeds: an unclassifiable follower set is
    // accepted, just ineligible to win.
    play_pieces(&mut state, 1, &pieces(&["GB", "SB"])).unwrap();
    assert_eq!(state.round.turn_plays[1].play_type, None);

    // Resubmitting after a commit is refused.
    let err = play_pieces(&mut state, 1, &pieces(&["SB", "SB"])).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::AlreadyPlayed, _)
    ));

    play_pieces(&mut state, 2, &pieces(&["AR", "AR"])).unwrap();
    let result = play_pieces(&mut state, 3, &pieces(&["AB", "EB"])).unwrap();

    // Only the advisor pair matched the leader's type; its value 24 beats
    // the soldier pair's 4. Two piles for a two-piece play.
    assert_eq!(result.trick_winner, Some(2));
    assert_eq!(result.piles_awarded, 2);
    assert_eq!(state.round.piles_won[2], 2);

    // All committed pieces left their hands and sit in the winner's pile.
    assert_eq!(state.hand_sizes(), [1, 1, 1, 1]);
    assert_eq!(state.round.captured[2].len(), 8);
}

#[test]
fn hand_size_divergence_is_fatal_not_a_rejection() {
    let mut state = turn_state(
        [
            pieces(&["SR", "SR", "SR"]),
            pieces(&["SB", "SB", "SB"]),
            pieces(&["CR", "CB", "HR"]),
            pieces(&["GR"]),
        ],
        0,
        [1, 1, 1, 1],
    );

    play_pieces(&mut state, 0, &pieces(&["SR"])).unwrap();
    play_pieces(&mut state, 1, &pieces(&["SB"])).unwrap();
    play_pieces(&mut state, 2, &pieces(&["CR"])).unwrap();
    let err = play_pieces(&mut state, 3, &pieces(&["GR"])).unwrap_err();

    assert!(err.is_fatal());
    assert!(matches!(
        err,
        DomainError::Fatal(FatalKind::HandSizeDivergence, _)
    ));
}

#[test]
fn plays_outside_the_turn_phase_are_rejected() {
    let mut state = turn_state(
        [
            pieces(&["SR"]),
            pieces(&["SB"]),
            pieces(&["AR"]),
            pieces(&["AB"]),
        ],
        0,
        [1, 1, 1, 1],
    );
    state.phase = Phase::Declaration;

    let err = play_pieces(&mut state, 0, &pieces(&["SR"])).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::PhaseMismatch, _)
    ));
    assert!(legal_plays(&state, 0).is_empty());
}

#[test]
fn legal_plays_follow_the_required_count() {
    let mut state = turn_state(
        [
            pieces(&["SR", "SR", "GR"]),
            pieces(&["SB", "SB", "GB"]),
            pieces(&["AR", "AR", "ER"]),
            pieces(&["AB", "AB", "EB"]),
        ],
        0,
        [2, 0, 2, 0],
    );

    // Leading: every classifiable subset (two singles, the soldier pair).
    let leads = legal_plays(&state, 0);
    assert!(leads.iter().all(|p| crate::domain::classify(p).is_some()));
    assert!(leads.contains(&pieces(&["SR", "SR"])));

    play_pieces(&mut state, 0, &pieces(&["SR", "SR"])).unwrap();

    // Following: any two pieces, classifiable or not.
    let follows = legal_plays(&state, 1);
    assert!(!follows.is_empty());
    assert!(follows.iter().all(|p| p.len() == 2));
}
