//! Test-only game state helpers for domain unit tests.

use crate::domain::pieces_parsing::try_parse_pieces;
use crate::domain::pieces_types::Piece;
use crate::domain::rules::PLAYERS;
use crate::domain::state::{GameState, Phase, PlayerId};

/// Parse hardcoded piece tokens, panicking on typos in test fixtures.
pub fn pieces(tokens: &[&str]) -> Vec<Piece> {
    try_parse_pieces(tokens).expect("hardcoded valid piece tokens")
}

/// A `GameState` in the Declaration phase with the given hands and starter.
///
/// Turn order is rotated starter-first, matching what Preparation leaves
/// behind once no weak-hand decision is pending.
pub fn declaration_state(hands: [Vec<Piece>; PLAYERS], starter: PlayerId) -> GameState {
    let mut state = GameState::new();
    state.hands = hands;
    state.round_starter = starter;
    state.rotate_order_to(starter);
    state.phase = Phase::Declaration;
    state
}

/// A `GameState` mid-round in the Turn phase: declarations filled, a trick
/// about to start with `starter` leading.
///
/// Pieces of the 32-piece set not in any hand are parked in a captured pile
/// so the state models an honest mid-round position and satisfies the piece
/// conservation guard. Fixture hands must stay within the set's multiset.
pub fn turn_state(
    hands: [Vec<Piece>; PLAYERS],
    starter: PlayerId,
    declarations: [u8; PLAYERS],
) -> GameState {
    let mut remaining = crate::domain::dealing::full_deck();
    for hand in &hands {
        for piece in hand {
            let idx = remaining
                .iter()
                .position(|p| p == piece)
                .expect("fixture hands exceed the piece set");
            remaining.swap_remove(idx);
        }
    }

    let mut state = declaration_state(hands, starter);
    for (seat, value) in declarations.iter().enumerate() {
        state.round.declarations[seat] = Some(*value);
    }
    state.phase = Phase::Turn { turn_no: 1 };
    state.round.trick_leader = Some(starter);
    state.round.captured[starter as usize] = remaining;
    state
}

/// Four three-piece hands with distinct ranks, giving short scripted tricks.
pub fn small_hands() -> [Vec<Piece>; PLAYERS] {
    [
        pieces(&["GR", "AR", "SR"]),
        pieces(&["GB", "AB", "SB"]),
        pieces(&["ER", "RR", "HR"]),
        pieces(&["EB", "RB", "HB"]),
    ]
}
