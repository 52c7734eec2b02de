//! Error codes surfaced with action rejections.
//!
//! Add new codes here; never pass ad-hoc strings as error codes. All codes
//! are SCREAMING_SNAKE_CASE and map 1:1 to the strings the transport layer
//! forwards to clients.

use core::fmt;

use super::domain::{DomainError, ValidationKind};

/// Centralized error codes for action outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Action kind not accepted by the current phase
    PhaseMismatch,
    /// Out of turn
    OutOfTurn,
    /// Not the weak-hand holder currently deciding
    NotWeakDecider,
    /// Already committed a play this trick
    AlreadyPlayed,
    /// Declaration outside 0..=8
    InvalidDeclaration,
    /// Declarations may not total exactly eight
    ForbiddenDeclarationTotal,
    /// Nonzero declaration forced after two zero rounds
    ForcedNonZeroDeclaration,
    /// Wrong number of pieces for this trick
    WrongPieceCount,
    /// Piece not held by the actor
    PieceNotInHand,
    /// Leading play is not a recognized combination
    UnrecognizedLead,
    /// Session halted after an internal error
    SessionHalted,
    /// Piece token could not be parsed
    ParsePiece,
    /// General validation error
    ValidationError,
    /// Internal consistency violation
    InternalError,
}

impl ErrorCode {
    /// The canonical string for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::PhaseMismatch => "PHASE_MISMATCH",
            ErrorCode::OutOfTurn => "OUT_OF_TURN",
            ErrorCode::NotWeakDecider => "NOT_WEAK_DECIDER",
            ErrorCode::AlreadyPlayed => "ALREADY_PLAYED",
            ErrorCode::InvalidDeclaration => "INVALID_DECLARATION",
            ErrorCode::ForbiddenDeclarationTotal => "FORBIDDEN_DECLARATION_TOTAL",
            ErrorCode::ForcedNonZeroDeclaration => "FORCED_NONZERO_DECLARATION",
            ErrorCode::WrongPieceCount => "WRONG_PIECE_COUNT",
            ErrorCode::PieceNotInHand => "PIECE_NOT_IN_HAND",
            ErrorCode::UnrecognizedLead => "UNRECOGNIZED_LEAD",
            ErrorCode::SessionHalted => "SESSION_HALTED",
            ErrorCode::ParsePiece => "PARSE_PIECE",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&DomainError> for ErrorCode {
    fn from(err: &DomainError) -> Self {
        match err {
            DomainError::Validation(kind, _) => match kind {
                ValidationKind::PhaseMismatch => ErrorCode::PhaseMismatch,
                ValidationKind::OutOfTurn => ErrorCode::OutOfTurn,
                ValidationKind::NotWeakDecider => ErrorCode::NotWeakDecider,
                ValidationKind::AlreadyPlayed => ErrorCode::AlreadyPlayed,
                ValidationKind::InvalidDeclaration => ErrorCode::InvalidDeclaration,
                ValidationKind::ForbiddenDeclarationTotal => ErrorCode::ForbiddenDeclarationTotal,
                ValidationKind::ForcedNonZeroDeclaration => ErrorCode::ForcedNonZeroDeclaration,
                ValidationKind::WrongPieceCount => ErrorCode::WrongPieceCount,
                ValidationKind::PieceNotInHand => ErrorCode::PieceNotInHand,
                ValidationKind::UnrecognizedLead => ErrorCode::UnrecognizedLead,
                ValidationKind::SessionHalted => ErrorCode::SessionHalted,
                ValidationKind::ParsePiece => ErrorCode::ParsePiece,
                _ => ErrorCode::ValidationError,
            },
            DomainError::Fatal(_, _) => ErrorCode::InternalError,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn codes_are_unique() {
        let all = [
            ErrorCode::PhaseMismatch,
            ErrorCode::OutOfTurn,
            ErrorCode::NotWeakDecider,
            ErrorCode::AlreadyPlayed,
            ErrorCode::InvalidDeclaration,
            ErrorCode::ForbiddenDeclarationTotal,
            ErrorCode::ForcedNonZeroDeclaration,
            ErrorCode::WrongPieceCount,
            ErrorCode::PieceNotInHand,
            ErrorCode::UnrecognizedLead,
            ErrorCode::SessionHalted,
            ErrorCode::ParsePiece,
            ErrorCode::ValidationError,
            ErrorCode::InternalError,
        ];
        let strings: HashSet<&str> = all.iter().map(|c| c.as_str()).collect();
        assert_eq!(strings.len(), all.len());
    }

    #[test]
    fn fatal_maps_to_internal() {
        use crate::errors::domain::FatalKind;
        let err = DomainError::fatal(FatalKind::HandSizeDivergence, "divergence");
        assert_eq!(ErrorCode::from(&err), ErrorCode::InternalError);
    }
}
