//! Random bot - makes random legal moves.
//!
//! Reference implementation of the [`BotPlayer`] trait: chooses uniformly
//! among legal options in every phase, never panics, and supports optional
//! seeding for reproducible behavior.

use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::trait_def::{BotError, BotPlayer, BotView};
use crate::domain::Piece;

pub struct RandomBot {
    // Interior mutability: trait methods take &self but the RNG advances.
    rng: Mutex<ChaCha8Rng>,
}

impl RandomBot {
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

impl BotPlayer for RandomBot {
    fn choose_redeal(&self, _view: &BotView) -> Result<bool, BotError> {
        Ok(self.rng.lock().random_bool(0.5))
    }

    fn choose_declaration(&self, view: &BotView) -> Result<u8, BotError> {
        let options = view.legal_declarations();
        if options.is_empty() {
            return Err(BotError::NoLegalOption);
        }
        let idx = self.rng.lock().random_range(0..options.len());
        Ok(options[idx])
    }

    fn choose_play(&self, view: &BotView) -> Result<Vec<Piece>, BotError> {
        let options = view.legal_plays();
        if options.is_empty() {
            return Err(BotError::NoLegalOption);
        }
        let idx = self.rng.lock().random_range(0..options.len());
        Ok(options[idx].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snapshot::{
        DeclarationSnapshot, GameHeader, GameSnapshot, PhaseSnapshot, SeatPublic,
    };

    fn declaration_view(seat: u8, forbidden: Vec<u8>) -> BotView {
        let snapshot = GameSnapshot {
            game: GameHeader {
                round_no: 1,
                turn_order: [0, 1, 2, 3],
                round_starter: 0,
                redeal_multiplier: 1,
                seating: [
                    SeatPublic::bot(0, "Bot 1"),
                    SeatPublic::bot(1, "Bot 2"),
                    SeatPublic::bot(2, "Bot 3"),
                    SeatPublic::bot(3, "Bot 4"),
                ],
                scores_total: [0; 4],
                declarations: [None; 4],
                piles_won: [0; 4],
                hands: Default::default(),
                last_round: None,
            },
            phase: PhaseSnapshot::Declaration(DeclarationSnapshot {
                to_act: seat,
                declarations: [None; 4],
                forbidden_values: forbidden,
            }),
        };
        BotView::new(seat, snapshot)
    }

    #[test]
    fn seeded_bot_is_deterministic() {
        let view = declaration_view(0, vec![]);
        let a = RandomBot::new(Some(7)).choose_declaration(&view).unwrap();
        let b = RandomBot::new(Some(7)).choose_declaration(&view).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn declaration_respects_forbidden_values() {
        let view = declaration_view(2, vec![0, 5]);
        let bot = RandomBot::new(Some(11));
        for _ in 0..50 {
            let value = bot.choose_declaration(&view).unwrap();
            assert!(value <= 8);
            assert!(value != 0 && value != 5);
        }
    }

    #[test]
    fn no_options_is_an_error_not_a_panic() {
        // Viewed from a seat that is not to act, there are no legal options.
        let view = declaration_view(1, vec![]);
        let off_turn = BotView::new(3, view.snapshot);
        assert!(matches!(
            RandomBot::new(Some(1)).choose_declaration(&off_turn),
            Err(BotError::NoLegalOption)
        ));
    }
}
