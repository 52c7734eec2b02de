//! Greedy bot - chases piles with simple heuristics.
//!
//! Declares from hand strength, leads its biggest combination, and follows
//! with the cheapest winning candidate when one exists, dumping its lowest
//! pieces otherwise.

use super::trait_def::{BotError, BotPlayer, BotView};
use crate::domain::play_type::{classify, play_value};
use crate::domain::snapshot::PhaseSnapshot;
use crate::domain::Piece;

pub struct GreedyBot;

impl GreedyBot {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GreedyBot {
    fn default() -> Self {
        Self::new()
    }
}

impl BotPlayer for GreedyBot {
    fn choose_redeal(&self, _view: &BotView) -> Result<bool, BotError> {
        // A weak hand cannot chase piles; trade it for a fresh one and a
        // bigger multiplier.
        Ok(true)
    }

    fn choose_declaration(&self, view: &BotView) -> Result<u8, BotError> {
        let options = view.legal_declarations();
        if options.is_empty() {
            return Err(BotError::NoLegalOption);
        }
        // Rough pile estimate: one per commanding piece in hand.
        let strong = view.hand().iter().filter(|p| p.rank() >= 11).count() as u8;
        let target = options
            .iter()
            .copied()
            .min_by_key(|&v| v.abs_diff(strong))
            .unwrap_or(options[0]);
        Ok(target)
    }

    fn choose_play(&self, view: &BotView) -> Result<Vec<Piece>, BotError> {
        let options = view.legal_plays();
        if options.is_empty() {
            return Err(BotError::NoLegalOption);
        }

        let PhaseSnapshot::Turn(turn) = &view.snapshot.phase else {
            return Err(BotError::Internal("not in the Turn phase".to_string()));
        };

        // Leading: commit the biggest combination available.
        let Some(lead) = turn.plays.first() else {
            return options
                .into_iter()
                .max_by_key(|p| (p.len(), play_value(p)))
                .ok_or(BotError::NoLegalOption);
        };

        // Following: the cheapest candidate that currently wins the trick,
        // else the cheapest dump.
        let best_eligible = turn
            .plays
            .iter()
            .filter(|p| p.play_type == lead.play_type)
            .map(|p| p.value)
            .max()
            .unwrap_or(0);
        let winning = options
            .iter()
            .filter(|p| classify(p) == lead.play_type && play_value(p) > best_eligible)
            .min_by_key(|p| play_value(p))
            .cloned();
        match winning {
            Some(play) => Ok(play),
            None => options
                .into_iter()
                .min_by_key(|p| play_value(p))
                .ok_or(BotError::NoLegalOption),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snapshot::{
        GameHeader, GameSnapshot, PhaseSnapshot, PlaySnapshot, SeatPublic, TurnSnapshot,
    };
    use crate::domain::try_parse_pieces;

    fn pieces(tokens: &[&str]) -> Vec<Piece> {
        try_parse_pieces(tokens).expect("hardcoded valid piece tokens")
    }

    fn turn_view(seat: u8, hand: Vec<Piece>, plays: Vec<PlaySnapshot>, required: Option<u8>) -> BotView {
        let mut hands: [Vec<Piece>; 4] = Default::default();
        hands[seat as usize] = hand;
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
                declarations: [Some(2); 4],
                piles_won: [0; 4],
                hands,
                last_round: None,
            },
            phase: PhaseSnapshot::Turn(TurnSnapshot {
                turn_no: 1,
                leader: Some(0),
                to_act: Some(seat),
                required_count: required,
                plays,
                piles_won: [0; 4],
            }),
        };
        BotView::new(seat, snapshot)
    }

    #[test]
    fn leads_the_biggest_combination() {
        let hand = pieces(&["RR", "HR", "CR", "GB", "SB"]);
        let view = turn_view(0, hand, vec![], None);
        let play = GreedyBot::new().choose_play(&view).unwrap();
        // The red straight outranks any single.
        assert_eq!(play.len(), 3);
        assert_eq!(play_value(&play), 18);
    }

    #[test]
    fn follows_with_the_cheapest_winning_piece() {
        let lead = PlaySnapshot {
            seat: 0,
            pieces: pieces(&["CB"]),
            play_type: classify(&pieces(&["CB"])),
            value: 3,
        };
        let hand = pieces(&["GR", "AR", "HB", "SB"]);
        let view = turn_view(1, hand, vec![lead], Some(1));
        let play = GreedyBot::new().choose_play(&view).unwrap();
        // The black horse (5) wins more cheaply than the general (14).
        assert_eq!(play, pieces(&["HB"]));
    }

    #[test]
    fn dumps_low_when_it_cannot_win() {
        let lead = PlaySnapshot {
            seat: 0,
            pieces: pieces(&["GR"]),
            play_type: classify(&pieces(&["GR"])),
            value: 14,
        };
        let hand = pieces(&["AR", "HB", "SB"]);
        let view = turn_view(1, hand, vec![lead], Some(1));
        let play = GreedyBot::new().choose_play(&view).unwrap();
        assert_eq!(play, pieces(&["SB"]));
    }
}
