//! Preparation phase: dealing and the weak-hand redeal negotiation.

use rand::Rng;
use tracing::debug;

use super::dealing::{deal_hands, highest_piece_holder, is_weak_hand};
use super::state::{GameState, Phase, PlayerId};
use crate::errors::domain::{DomainError, ValidationKind};

/// Result of a redeal decision, describing what state changes occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedealOutcome {
    pub accepted: bool,
    /// Multiplier after the decision.
    pub redeal_multiplier: u8,
    /// Weak-hand holder asked next, if the negotiation continues.
    pub next_decider: Option<PlayerId>,
    /// Whether Preparation finished and the round moved to Declaration.
    pub preparation_complete: bool,
}

/// Deal the round and open the weak-hand negotiation.
///
/// For round 1 the holder of the highest piece starts the round; later
/// rounds inherit the starter chosen by scoring (the previous final-trick
/// winner). If no hand is weak, Preparation completes immediately.
pub fn enter_round<R: Rng>(state: &mut GameState, rng: &mut R) {
    state.phase = Phase::Preparation;
    state.hands = deal_hands(rng);

    if state.round_no == 1 {
        if let Some(holder) = highest_piece_holder(&state.hands) {
            state.round_starter = holder;
        }
    }
    state.rotate_order_to(state.round_starter);

    rebuild_weak_queue(state);
    debug!(
        round_no = state.round_no,
        starter = state.round_starter,
        weak = ?state.round.weak_queue,
        "Round dealt"
    );

    if state.round.weak_queue.is_empty() {
        finish_preparation(state);
    }
}

/// Apply one weak-hand holder's redeal decision.
///
/// Accepting reshuffles all hands, bumps the multiplier, makes the accepter
/// the round starter, and restarts weak detection on the new hands; there is
/// no limit on redeal cycles. Declining passes the question to the next weak
/// holder, if any.
pub fn redeal_decision<R: Rng>(
    state: &mut GameState,
    who: PlayerId,
    accept: bool,
    rng: &mut R,
) -> Result<RedealOutcome, DomainError> {
    if state.phase != Phase::Preparation {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            "Redeal decisions are only accepted during Preparation",
        ));
    }

    let Some(&decider) = state.round.weak_queue.first() else {
        return Err(DomainError::validation(
            ValidationKind::NotWeakDecider,
            "No redeal decision is pending",
        ));
    };
    if decider != who {
        return Err(DomainError::validation(
            ValidationKind::NotWeakDecider,
            format!("Player {decider} is deciding on a redeal, not player {who}"),
        ));
    }

    if accept {
        state.redeal_multiplier += 1;
        state.round_starter = who;
        state.rotate_order_to(who);
        state.hands = deal_hands(rng);
        rebuild_weak_queue(state);
        debug!(
            round_no = state.round_no,
            accepter = who,
            multiplier = state.redeal_multiplier,
            weak = ?state.round.weak_queue,
            "Redeal accepted"
        );
    } else {
        state.round.weak_queue.remove(0);
        debug!(round_no = state.round_no, decliner = who, "Redeal declined");
    }

    let preparation_complete = state.round.weak_queue.is_empty();
    if preparation_complete {
        finish_preparation(state);
    }

    Ok(RedealOutcome {
        accepted: accept,
        redeal_multiplier: state.redeal_multiplier,
        next_decider: state.round.weak_queue.first().copied(),
        preparation_complete,
    })
}

/// Weak-hand holders owed a decision, in turn order from the starter.
fn rebuild_weak_queue(state: &mut GameState) {
    state.round.weak_queue = state
        .turn_order
        .iter()
        .copied()
        .filter(|&seat| is_weak_hand(&state.hands[seat as usize]))
        .collect();
}

fn finish_preparation(state: &mut GameState) {
    state.phase = Phase::Declaration;
}
