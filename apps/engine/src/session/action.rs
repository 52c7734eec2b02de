//! Inbound actions and outbound events.
//!
//! Actions are the only way to mutate session state; they are immutable once
//! created and carry their submission time for per-session ordering audits.

use time::OffsetDateTime;

use crate::domain::snapshot::GameSnapshot;
use crate::domain::{Piece, PlayerId};

/// What an action asks the session to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// Accept or decline a redeal (Preparation). Covers both the
    /// player-initiated request and the prompted response; either way only
    /// the current weak-hand decider's decision validates.
    RedealDecision { accept: bool },
    /// Commit a pile target for the round (Declaration).
    Declare { value: u8 },
    /// Commit pieces to the current trick (Turn).
    PlayPieces { pieces: Vec<Piece> },
}

/// An immutable command submitted by one participant.
#[derive(Debug, Clone)]
pub struct GameAction {
    pub actor: PlayerId,
    pub kind: ActionKind,
    pub submitted_at: OffsetDateTime,
}

impl GameAction {
    pub fn new(actor: PlayerId, kind: ActionKind) -> Self {
        Self {
            actor,
            kind,
            submitted_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn redeal_decision(actor: PlayerId, accept: bool) -> Self {
        Self::new(actor, ActionKind::RedealDecision { accept })
    }

    pub fn declare(actor: PlayerId, value: u8) -> Self {
        Self::new(actor, ActionKind::Declare { value })
    }

    pub fn play_pieces(actor: PlayerId, pieces: Vec<Piece>) -> Self {
        Self::new(actor, ActionKind::PlayPieces { pieces })
    }
}

/// Result of a committed action: the post-commit snapshot plus the broadcast
/// sequence number and reason string it was announced with.
#[derive(Debug, Clone)]
pub struct Committed {
    pub seq: u64,
    pub snapshot: GameSnapshot,
    pub reason: String,
}

/// Events emitted to session subscribers.
///
/// Exactly one `Phase` event follows every committed mutation; a single
/// `CriticalError` marks the fatal path, after which no further phase events
/// occur for the session.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Phase {
        /// Monotonically increasing per session; lets subscribers apply
        /// last-write-wins on any dropped event.
        seq: u64,
        snapshot: GameSnapshot,
        reason: String,
    },
    CriticalError {
        detail: String,
    },
}
