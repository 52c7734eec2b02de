//! Domain-level error type used across the engine.
//!
//! Two failure classes exist and must never be confused: a `Validation`
//! rejection refuses one action and leaves session state untouched, while a
//! `Fatal` error means the state machine's own invariants were broken and the
//! session must halt.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Validation rejection kinds (recoverable; the submitter may retry).
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    /// Action kind does not match the current phase.
    PhaseMismatch,
    /// Actor is not the player expected to act.
    OutOfTurn,
    /// Actor is not the weak-hand holder currently asked to decide.
    NotWeakDecider,
    /// Actor already committed a play to the current trick.
    AlreadyPlayed,
    /// Declaration value outside the allowed range.
    InvalidDeclaration,
    /// Last declarer may not bring the declaration total to exactly eight.
    ForbiddenDeclarationTotal,
    /// Two consecutive zero declarations force a nonzero one.
    ForcedNonZeroDeclaration,
    /// Play does not contain the required number of pieces.
    WrongPieceCount,
    /// Actor does not hold one of the named pieces.
    PieceNotInHand,
    /// Leading play does not classify to a recognized play type.
    UnrecognizedLead,
    /// Session has halted after a fatal error; nothing is accepted.
    SessionHalted,
    /// Piece token could not be parsed.
    ParsePiece,
    Other(String),
}

/// Fatal consistency violation kinds (unrecoverable; the session halts).
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FatalKind {
    /// Hand sizes diverged by more than one piece mid-round.
    HandSizeDivergence,
    /// Piece conservation across hands and captured piles was broken.
    PieceConservation,
    Other(String),
}

/// Central domain error type.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input/business rule violation; the action is refused, no state changes.
    Validation(ValidationKind, String),
    /// Internal invariant violation; the session is halted and terminated.
    Fatal(FatalKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation {kind:?}: {d}"),
            DomainError::Fatal(kind, d) => write!(f, "fatal {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }

    pub fn validation_other(detail: impl Into<String>) -> Self {
        Self::Validation(ValidationKind::Other("VALIDATION_ERROR".into()), detail.into())
    }

    pub fn fatal(kind: FatalKind, detail: impl Into<String>) -> Self {
        Self::Fatal(kind, detail.into())
    }

    /// Whether this error must halt the session.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DomainError::Fatal(_, _))
    }

    /// The human-readable detail string, for rejections surfaced to clients.
    pub fn detail(&self) -> &str {
        match self {
            DomainError::Validation(_, d) | DomainError::Fatal(_, d) => d,
        }
    }
}
