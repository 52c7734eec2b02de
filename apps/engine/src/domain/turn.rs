//! Turn phase: trick play and resolution.
//!
//! Each trick, the leader commits 1–6 pieces forming a recognized play type;
//! followers must match the piece count but their sets need not classify
//! (such plays are accepted and merely ineligible to win). The winner
//! captures piles equal to the piece count of the winning play.

use tracing::debug;

use super::pieces_types::Piece;
use super::play_type::{classify, hand_contains, legal_plays as candidate_plays, play_value, remove_from_hand};
use super::rules::{DECK_SIZE, MAX_LEAD_SIZE, PLAYERS};
use super::state::{require_required_count, require_trick_leader, GameState, Phase, PlayerId, TurnPlay};
use crate::errors::domain::{DomainError, FatalKind, ValidationKind};

/// Result of committing pieces, describing what state changes occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayPiecesResult {
    /// Whether this play completed the trick (all four players committed).
    pub trick_completed: bool,
    /// Winner of the completed trick, if one was completed.
    pub trick_winner: Option<PlayerId>,
    /// Piles awarded to the winner (the winning play's piece count).
    pub piles_awarded: u8,
    /// Trick number this play belonged to.
    pub turn_no: u8,
    /// Whether all hands emptied and the round moved to Scoring.
    pub round_completed: bool,
}

/// Commit one player's pieces to the current trick.
pub fn play_pieces(
    state: &mut GameState,
    who: PlayerId,
    pieces: &[Piece],
) -> Result<PlayPiecesResult, DomainError> {
    let Phase::Turn { turn_no } = state.phase else {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            "Pieces can only be played during the Turn phase",
        ));
    };

    if state.round.turn_plays.iter().any(|p| p.player == who) {
        return Err(DomainError::validation(
            ValidationKind::AlreadyPlayed,
            "Already committed a play to this trick",
        ));
    }

    let expected = state
        .expected_trick_actor()
        .ok_or_else(|| DomainError::validation_other("Invariant violated: no trick in progress"))?;
    if expected != who {
        return Err(DomainError::validation(
            ValidationKind::OutOfTurn,
            format!("Player {expected} plays next, not player {who}"),
        ));
    }

    match state.round.required_count {
        Some(required) => {
            if pieces.len() != required as usize {
                return Err(DomainError::validation(
                    ValidationKind::WrongPieceCount,
                    format!("Must play exactly {required} piece(s)"),
                ));
            }
        }
        None => {
            if pieces.is_empty() || pieces.len() > MAX_LEAD_SIZE {
                return Err(DomainError::validation(
                    ValidationKind::WrongPieceCount,
                    format!("A leading play must contain 1 to {MAX_LEAD_SIZE} pieces"),
                ));
            }
        }
    }

    if !hand_contains(&state.hands[who as usize], pieces) {
        return Err(DomainError::validation(
            ValidationKind::PieceNotInHand,
            "You do not hold one of the selected pieces",
        ));
    }

    let play_type = classify(pieces);
    let is_leader = state.round.required_count.is_none();
    if is_leader && play_type.is_none() {
        return Err(DomainError::validation(
            ValidationKind::UnrecognizedLead,
            "A leading play must form a recognized combination",
        ));
    }

    // Validation passed; mutate.
    if is_leader {
        state.round.required_count = Some(pieces.len() as u8);
    }

    let removed = remove_from_hand(&mut state.hands[who as usize], pieces);
    debug_assert!(removed, "ownership was checked before removal");

    let position = state.round.turn_plays.len() as u8;
    state.round.turn_plays.push(TurnPlay {
        player: who,
        pieces: pieces.to_vec(),
        play_type,
        value: play_value(pieces),
        position,
    });
    debug!(seat = who, turn_no, count = pieces.len(), play_type = ?play_type, "Play committed");

    let mut result = PlayPiecesResult {
        trick_completed: false,
        trick_winner: None,
        piles_awarded: 0,
        turn_no,
        round_completed: false,
    };

    if state.round.turn_plays.len() < PLAYERS {
        return Ok(result);
    }

    // All four plays are in; resolve the trick.
    let winner = resolve_current_trick(state)?;
    let piles = require_required_count(state, "trick resolution")?;
    state.round.piles_won[winner as usize] += piles;
    let captured: Vec<Piece> = state
        .round
        .turn_plays
        .drain(..)
        .flat_map(|p| p.pieces)
        .collect();
    state.round.captured[winner as usize].extend(captured);
    state.round.last_trick_winner = Some(winner);
    state.round.required_count = None;

    result.trick_completed = true;
    result.trick_winner = Some(winner);
    result.piles_awarded = piles;
    debug!(turn_no, winner, piles, "Trick resolved");

    check_consistency(state)?;

    if state.hands.iter().all(|h| h.is_empty()) {
        state.phase = Phase::Scoring;
        state.round.trick_leader = None;
        result.round_completed = true;
        debug!(round_no = state.round_no, "All hands empty, transitioning to Scoring");
    } else {
        state.round.trick_leader = Some(winner);
        state.phase = Phase::Turn {
            turn_no: turn_no.saturating_add(1),
        };
    }

    Ok(result)
}

/// Determine the winner of the completed trick.
///
/// Only plays whose type matches the leader's are eligible; the highest
/// value wins, with ties broken by earliest commit position (the strict
/// comparison scans in commit order, so the first best play stands).
fn resolve_current_trick(state: &GameState) -> Result<PlayerId, DomainError> {
    let leader = require_trick_leader(state, "resolve_current_trick")?;
    let plays = &state.round.turn_plays;
    let lead_play = plays
        .iter()
        .find(|p| p.player == leader)
        .ok_or_else(|| DomainError::validation_other("Invariant violated: leader play missing"))?;
    let lead_type = lead_play.play_type.ok_or_else(|| {
        DomainError::validation_other("Invariant violated: leading play must classify")
    })?;

    let mut best = lead_play;
    for play in plays {
        if play.play_type == Some(lead_type) && play.value > best.value {
            best = play;
        }
    }
    Ok(best.player)
}

/// Post-resolution consistency guard.
///
/// Every trick removes the same piece count from each hand, so hand sizes
/// may never diverge by more than one; all 32 pieces must sit in a hand or a
/// captured pile. A violation poisons the session state and must halt it.
fn check_consistency(state: &GameState) -> Result<(), DomainError> {
    let sizes = state.hand_sizes();
    let max = sizes.iter().max().copied().unwrap_or(0);
    let min = sizes.iter().min().copied().unwrap_or(0);
    if max - min > 1 {
        return Err(DomainError::fatal(
            FatalKind::HandSizeDivergence,
            format!("Hand sizes diverged beyond tolerance: {sizes:?}"),
        ));
    }

    let in_hands: usize = sizes.iter().sum();
    let captured: usize = state.round.captured.iter().map(|c| c.len()).sum();
    let in_flight: usize = state.round.turn_plays.iter().map(|p| p.pieces.len()).sum();
    if in_hands + captured + in_flight != DECK_SIZE {
        return Err(DomainError::fatal(
            FatalKind::PieceConservation,
            format!(
                "Piece conservation broken: {in_hands} in hands, {captured} captured, {in_flight} in flight"
            ),
        ));
    }
    Ok(())
}

/// Candidate plays for a seat, independent of turn enforcement.
pub fn legal_plays(state: &GameState, who: PlayerId) -> Vec<Vec<Piece>> {
    let Phase::Turn { .. } = state.phase else {
        return Vec::new();
    };
    candidate_plays(&state.hands[who as usize], state.round.required_count)
}
