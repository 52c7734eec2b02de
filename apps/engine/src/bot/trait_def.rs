//! Bot player trait definition and the view bots decide from.

use thiserror::Error;

use crate::domain::play_type::legal_plays;
use crate::domain::rules::valid_declaration_range;
use crate::domain::snapshot::{GameSnapshot, PhaseSnapshot};
use crate::domain::{Piece, Seat};

/// Errors that can occur during bot decision-making.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("bot has no legal option to choose from")]
    NoLegalOption,
    #[error("bot internal error: {0}")]
    Internal(String),
}

/// What a bot sees when asked to act: the phase snapshot offered to every
/// participant, plus its own seat.
#[derive(Debug, Clone)]
pub struct BotView {
    pub seat: Seat,
    pub snapshot: GameSnapshot,
}

impl BotView {
    pub fn new(seat: Seat, snapshot: GameSnapshot) -> Self {
        Self { seat, snapshot }
    }

    pub fn hand(&self) -> &[Piece] {
        &self.snapshot.game.hands[self.seat as usize]
    }

    /// Declaration values this seat may legally choose right now.
    pub fn legal_declarations(&self) -> Vec<u8> {
        match &self.snapshot.phase {
            PhaseSnapshot::Declaration(decl) if decl.to_act == self.seat => {
                valid_declaration_range()
                    .filter(|v| !decl.forbidden_values.contains(v))
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    /// Candidate plays this seat may legally commit right now.
    pub fn legal_plays(&self) -> Vec<Vec<Piece>> {
        match &self.snapshot.phase {
            PhaseSnapshot::Turn(t) if t.to_act == Some(self.seat) => {
                legal_plays(self.hand(), t.required_count)
            }
            _ => Vec::new(),
        }
    }
}

/// Trait for automated participants.
///
/// Implementations receive the phase snapshot and must produce a
/// syntactically valid action of the kind the phase accepts; the engine
/// re-validates every submission regardless, and never evaluates play
/// quality.
pub trait BotPlayer: Send + Sync {
    /// Accept or decline a redeal when asked as a weak-hand holder.
    fn choose_redeal(&self, view: &BotView) -> Result<bool, BotError>;

    /// Choose a pile target. Query `view.legal_declarations()` for options.
    fn choose_declaration(&self, view: &BotView) -> Result<u8, BotError>;

    /// Choose pieces to commit. Query `view.legal_plays()` for options.
    fn choose_play(&self, view: &BotView) -> Result<Vec<Piece>, BotError>;
}
