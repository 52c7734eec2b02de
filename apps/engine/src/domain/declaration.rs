//! Declaration phase: collecting pile targets in turn order.

use tracing::debug;

use super::rules::{valid_declaration_range, FORBIDDEN_DECLARATION_TOTAL, PLAYERS};
use super::state::{GameState, Phase, PlayerId};
use crate::errors::domain::{DomainError, ValidationKind};

/// Result of a declaration, describing what state changes occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclareResult {
    /// Whether all four declarations are in and the round moved to Turn.
    pub declarations_complete: bool,
}

/// Record one player's pile target for the round.
pub fn declare(
    state: &mut GameState,
    who: PlayerId,
    value: u8,
) -> Result<DeclareResult, DomainError> {
    if state.phase != Phase::Declaration {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            "Declarations are only accepted during the Declaration phase",
        ));
    }

    let expected = state.expected_declarer();
    if expected != who {
        return Err(DomainError::validation(
            ValidationKind::OutOfTurn,
            format!("Player {expected} declares next, not player {who}"),
        ));
    }

    if !valid_declaration_range().contains(&value) {
        return Err(DomainError::validation(
            ValidationKind::InvalidDeclaration,
            format!("Declaration must be in range {:?}", valid_declaration_range()),
        ));
    }

    if value == 0 && state.zero_streaks[who as usize] >= 2 {
        return Err(DomainError::validation(
            ValidationKind::ForcedNonZeroDeclaration,
            "Declared zero in the last two rounds; a nonzero declaration is required",
        ));
    }

    let declared_count = state.round.declarations.iter().filter(|d| d.is_some()).count();
    if declared_count == PLAYERS - 1 {
        let total: u8 = state
            .round
            .declarations
            .iter()
            .flatten()
            .sum::<u8>()
            + value;
        if total == FORBIDDEN_DECLARATION_TOTAL {
            return Err(DomainError::validation(
                ValidationKind::ForbiddenDeclarationTotal,
                format!(
                    "Cannot declare {value}: declarations would total exactly {FORBIDDEN_DECLARATION_TOTAL}"
                ),
            ));
        }
    }

    state.round.declarations[who as usize] = Some(value);
    debug!(seat = who, value, "Declaration recorded");

    let declarations_complete = declared_count + 1 == PLAYERS;
    if declarations_complete {
        state.phase = Phase::Turn { turn_no: 1 };
        state.round.trick_leader = Some(state.round_starter);
        state.round.required_count = None;
        debug!(
            round_no = state.round_no,
            leader = state.round_starter,
            "Declarations complete, starting trick play"
        );
    }

    Ok(DeclareResult {
        declarations_complete,
    })
}

/// Values the current declarer may not choose.
///
/// Empty when nobody is expected to declare. Used in snapshots so clients
/// and bots see the constraint instead of re-deriving it.
pub fn forbidden_values(state: &GameState) -> Vec<u8> {
    if state.phase != Phase::Declaration {
        return Vec::new();
    }
    let who = state.expected_declarer();
    let mut forbidden = Vec::new();

    if state.zero_streaks[who as usize] >= 2 {
        forbidden.push(0);
    }

    let declared_count = state.round.declarations.iter().filter(|d| d.is_some()).count();
    if declared_count == PLAYERS - 1 {
        let total: u8 = state.round.declarations.iter().flatten().sum();
        if let Some(completing) = FORBIDDEN_DECLARATION_TOTAL.checked_sub(total) {
            if valid_declaration_range().contains(&completing) && !forbidden.contains(&completing) {
                forbidden.push(completing);
            }
        }
    }

    forbidden
}

/// Values the current declarer may legally choose.
pub fn legal_values(state: &GameState) -> Vec<u8> {
    let forbidden = forbidden_values(state);
    valid_declaration_range()
        .filter(|v| !forbidden.contains(v))
        .collect()
}
