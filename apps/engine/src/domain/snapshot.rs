//! Public snapshot API: the full-state view broadcast after every commit.
//!
//! Snapshots are complete (never deltas) so the transport layer can apply
//! last-write-wins recovery for any dropped message. All four hands are
//! included; per-seat redaction is the transport's concern.

use serde::{Deserialize, Serialize};

use super::declaration::forbidden_values;
use super::pieces_types::Piece;
use super::play_type::PlayType;
use super::rules::PLAYERS;
use super::state::{GameState, Phase, Seat};

/// Public info about a single seat in the session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeatPublic {
    pub seat: Seat,
    pub display_name: String,
    pub is_bot: bool,
}

impl SeatPublic {
    pub fn human(seat: Seat, display_name: impl Into<String>) -> Self {
        Self {
            seat,
            display_name: display_name.into(),
            is_bot: false,
        }
    }

    pub fn bot(seat: Seat, display_name: impl Into<String>) -> Self {
        Self {
            seat,
            display_name: display_name.into(),
            is_bot: true,
        }
    }
}

/// Game-level header present in all snapshots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameHeader {
    pub round_no: u8,
    pub turn_order: [Seat; PLAYERS],
    pub round_starter: Seat,
    pub redeal_multiplier: u8,
    pub seating: [SeatPublic; PLAYERS],
    pub scores_total: [i16; PLAYERS],
    pub declarations: [Option<u8>; PLAYERS],
    pub piles_won: [u8; PLAYERS],
    pub hands: [Vec<Piece>; PLAYERS],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_round: Option<RoundSummary>,
}

/// Top-level snapshot combining header and phase-specific data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub game: GameHeader,
    pub phase: PhaseSnapshot,
}

/// Adjacently tagged union of phase-specific snapshots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "data")]
pub enum PhaseSnapshot {
    Preparation(PreparationSnapshot),
    Declaration(DeclarationSnapshot),
    Turn(TurnSnapshot),
    Scoring(ScoringSnapshot),
    GameOver(GameOverSnapshot),
    /// The session hit a fatal consistency violation and refuses actions.
    Halted,
}

/// Final state of the last completed round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round_no: u8,
    pub declarations: [u8; PLAYERS],
    pub piles_won: [u8; PLAYERS],
    pub round_scores: [i16; PLAYERS],
    pub redeal_multiplier: u8,
}

/// Preparation phase snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PreparationSnapshot {
    /// Weak-hand holders still owed a decision, in turn order.
    pub weak_seats: Vec<Seat>,
    /// Seat currently asked to accept or decline a redeal.
    pub to_decide: Option<Seat>,
    pub redeal_multiplier: u8,
}

/// Declaration phase snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeclarationSnapshot {
    pub to_act: Seat,
    pub declarations: [Option<u8>; PLAYERS],
    /// Values the declarer may not choose (forced-nonzero and total rules).
    pub forbidden_values: Vec<u8>,
}

/// One committed play within the current trick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaySnapshot {
    pub seat: Seat,
    pub pieces: Vec<Piece>,
    pub play_type: Option<PlayType>,
    pub value: u16,
}

/// Turn (trick play) phase snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnSnapshot {
    pub turn_no: u8,
    pub leader: Option<Seat>,
    pub to_act: Option<Seat>,
    pub required_count: Option<u8>,
    pub plays: Vec<PlaySnapshot>,
    pub piles_won: [u8; PLAYERS],
}

/// Scoring phase snapshot (transient; observed only mid-commit).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringSnapshot {
    pub declarations: [Option<u8>; PLAYERS],
    pub piles_won: [u8; PLAYERS],
}

/// Game-over snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameOverSnapshot {
    pub scores_total: [i16; PLAYERS],
    pub winners: Vec<Seat>,
}

/// Entry point: produce a snapshot of the current session state.
pub fn snapshot(state: &GameState, seating: &[SeatPublic; PLAYERS]) -> GameSnapshot {
    let game = GameHeader {
        round_no: state.round_no,
        turn_order: state.turn_order,
        round_starter: state.round_starter,
        redeal_multiplier: state.redeal_multiplier,
        seating: seating.clone(),
        scores_total: state.scores_total,
        declarations: state.round.declarations,
        piles_won: state.round.piles_won,
        hands: state.hands.clone(),
        last_round: state.last_round.as_ref().map(|r| RoundSummary {
            round_no: r.round_no,
            declarations: r.declarations,
            piles_won: r.piles_won,
            round_scores: r.round_scores,
            redeal_multiplier: r.redeal_multiplier,
        }),
    };

    let phase = if state.halted {
        PhaseSnapshot::Halted
    } else {
        match state.phase {
            Phase::Preparation => snapshot_preparation(state),
            Phase::Declaration => snapshot_declaration(state),
            Phase::Turn { turn_no } => snapshot_turn(state, turn_no),
            Phase::Scoring => PhaseSnapshot::Scoring(ScoringSnapshot {
                declarations: state.round.declarations,
                piles_won: state.round.piles_won,
            }),
            Phase::GameOver => PhaseSnapshot::GameOver(GameOverSnapshot {
                scores_total: state.scores_total,
                winners: state.winners.clone(),
            }),
        }
    };

    GameSnapshot { game, phase }
}

fn snapshot_preparation(state: &GameState) -> PhaseSnapshot {
    PhaseSnapshot::Preparation(PreparationSnapshot {
        weak_seats: state.round.weak_queue.clone(),
        to_decide: state.round.weak_queue.first().copied(),
        redeal_multiplier: state.redeal_multiplier,
    })
}

fn snapshot_declaration(state: &GameState) -> PhaseSnapshot {
    PhaseSnapshot::Declaration(DeclarationSnapshot {
        to_act: state.expected_declarer(),
        declarations: state.round.declarations,
        forbidden_values: forbidden_values(state),
    })
}

fn snapshot_turn(state: &GameState, turn_no: u8) -> PhaseSnapshot {
    let plays = state
        .round
        .turn_plays
        .iter()
        .map(|p| PlaySnapshot {
            seat: p.player,
            pieces: p.pieces.clone(),
            play_type: p.play_type,
            value: p.value,
        })
        .collect();

    PhaseSnapshot::Turn(TurnSnapshot {
        turn_no,
        leader: state.round.trick_leader,
        to_act: state.expected_trick_actor(),
        required_count: state.round.required_count,
        plays,
        piles_won: state.round.piles_won,
    })
}
