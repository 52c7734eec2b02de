use super::pieces_types::Piece;
use super::play_type::PlayType;
use super::rules::PLAYERS;
use crate::errors::domain::DomainError;

pub type PlayerId = u8; // 0..=3
pub type Seat = u8; // 0..=3, positional alias for PlayerId

/// Round lifecycle phases.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Phase {
    /// Deal hands and run the weak-hand redeal negotiation.
    Preparation,
    /// Players commit a pile target in turn order.
    Declaration,
    /// Trick play; `turn_no` is 1-based within the round.
    Turn { turn_no: u8 },
    /// Tally round scores. Transient: consumed in the same commit that
    /// resolves the final trick, never waits for input.
    Scoring,
    /// A cumulative total reached the target; winners are set.
    GameOver,
}

/// One player's committed pieces for the trick in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnPlay {
    pub player: PlayerId,
    pub pieces: Vec<Piece>,
    /// `None` for a follower play that does not classify; such plays are
    /// accepted but can never win the trick.
    pub play_type: Option<PlayType>,
    /// Sum of piece ranks.
    pub value: u16,
    /// Commit position within the trick (leader = 0); breaks value ties.
    pub position: u8,
}

/// Per-round state: declarations, captures, and the trick in progress.
#[derive(Debug, Clone, Default)]
pub struct RoundState {
    /// Pile targets, filled in turn order during Declaration.
    pub declarations: [Option<u8>; PLAYERS],
    /// Piles captured this round.
    pub piles_won: [u8; PLAYERS],
    /// Pieces captured this round (the physical piles).
    pub captured: [Vec<Piece>; PLAYERS],
    /// Piece count every play this trick must match; unset until the leader
    /// plays, reset when the trick resolves.
    pub required_count: Option<u8>,
    /// Committed plays for the current trick, in commit order.
    pub turn_plays: Vec<TurnPlay>,
    /// Leader of the current trick.
    pub trick_leader: Option<PlayerId>,
    /// Winner of the most recently resolved trick.
    pub last_trick_winner: Option<PlayerId>,
    /// Weak-hand holders still owed a redeal decision, in turn order. The
    /// head of the queue is the current decider.
    pub weak_queue: Vec<PlayerId>,
}

impl RoundState {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Summary of the most recently completed round, kept for snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    pub round_no: u8,
    pub declarations: [u8; PLAYERS],
    pub piles_won: [u8; PLAYERS],
    pub round_scores: [i16; PLAYERS],
    pub redeal_multiplier: u8,
}

/// Entire session state, sufficient for pure domain operations.
///
/// Owned exclusively by the session's coordinator task; every mutation goes
/// through a phase handler called from there.
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: Phase,
    /// Round number, 1-based.
    pub round_no: u8,
    /// Seat rotation for the round. Mutated only by redeal acceptance, which
    /// rotates the accepter to the front; index 0 is the round starter.
    pub turn_order: [PlayerId; PLAYERS],
    /// Player leading the round: first declarer and first trick leader.
    pub round_starter: PlayerId,
    /// Starts at 1, +1 per accepted redeal, reset at the round boundary.
    pub redeal_multiplier: u8,
    /// Players' hands, indexed by seat.
    pub hands: [Vec<Piece>; PLAYERS],
    /// Cumulative scores across rounds.
    pub scores_total: [i16; PLAYERS],
    /// Consecutive zero declarations entering this round, per seat. Two in a
    /// row forbids a third.
    pub zero_streaks: [u8; PLAYERS],
    /// Set on a fatal consistency violation; the session refuses all further
    /// actions.
    pub halted: bool,
    /// Seats sharing the highest total once the game completes.
    pub winners: Vec<PlayerId>,
    /// Per-round container.
    pub round: RoundState,
    /// Summary of the previous round, if any.
    pub last_round: Option<RoundResult>,
}

impl GameState {
    /// Fresh session state, before the first deal.
    pub fn new() -> Self {
        Self {
            phase: Phase::Preparation,
            round_no: 1,
            turn_order: [0, 1, 2, 3],
            round_starter: 0,
            redeal_multiplier: 1,
            hands: Default::default(),
            scores_total: [0; PLAYERS],
            zero_streaks: [0; PLAYERS],
            halted: false,
            winners: Vec::new(),
            round: RoundState::empty(),
            last_round: None,
        }
    }

    /// Rotate `turn_order` so `starter` sits at index 0.
    ///
    /// Order A,B,C,D with C becoming starter yields C,D,A,B.
    pub fn rotate_order_to(&mut self, starter: PlayerId) {
        if let Some(idx) = self.turn_order.iter().position(|&p| p == starter) {
            self.turn_order.rotate_left(idx);
        }
    }

    /// Seat `steps` places after `seat` in the current turn order.
    pub fn seat_after(&self, seat: PlayerId, steps: usize) -> PlayerId {
        let idx = self
            .turn_order
            .iter()
            .position(|&p| p == seat)
            .unwrap_or(0);
        self.turn_order[(idx + steps) % PLAYERS]
    }

    /// Expected declarer given how many declarations are already in.
    pub fn expected_declarer(&self) -> PlayerId {
        let count = self.round.declarations.iter().filter(|d| d.is_some()).count();
        self.turn_order[count % PLAYERS]
    }

    /// Expected actor during a trick: the leader, advanced by the number of
    /// committed plays.
    pub fn expected_trick_actor(&self) -> Option<PlayerId> {
        let leader = self.round.trick_leader?;
        Some(self.seat_after(leader, self.round.turn_plays.len()))
    }

    pub fn hand_sizes(&self) -> [usize; PLAYERS] {
        [
            self.hands[0].len(),
            self.hands[1].len(),
            self.hands[2].len(),
            self.hands[3].len(),
        ]
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn require_trick_leader(state: &GameState, ctx: &'static str) -> Result<PlayerId, DomainError> {
    state.round.trick_leader.ok_or_else(|| {
        DomainError::validation_other(format!("Invariant violated: trick leader must be set ({ctx})"))
    })
}

pub fn require_required_count(state: &GameState, ctx: &'static str) -> Result<u8, DomainError> {
    state.round.required_count.ok_or_else(|| {
        DomainError::validation_other(format!(
            "Invariant violated: required piece count must be set ({ctx})"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_order_to_matches_redeal_example() {
        let mut state = GameState::new();
        state.rotate_order_to(2);
        assert_eq!(state.turn_order, [2, 3, 0, 1]);
    }

    #[test]
    fn seat_after_wraps_in_rotated_order() {
        let mut state = GameState::new();
        state.rotate_order_to(1);
        assert_eq!(state.seat_after(1, 0), 1);
        assert_eq!(state.seat_after(1, 3), 0);
        assert_eq!(state.seat_after(0, 1), 1);
    }

    #[test]
    fn expected_declarer_advances_with_declarations() {
        let mut state = GameState::new();
        state.rotate_order_to(3);
        assert_eq!(state.expected_declarer(), 3);
        state.round.declarations[3] = Some(2);
        assert_eq!(state.expected_declarer(), 0);
    }
}
