//! Property tests for trick play and declarations (pure domain, no queue).
//!
//! Properties tested:
//! - A winner's pile award always equals the winning play's piece count
//! - The winning play always matches the leader's play type
//! - Hand sizes never diverge by more than one across a scripted round
//! - Declaration totals never land on exactly eight
//! - Classified plays always carry their type's piece count

use proptest::prelude::*;

use crate::domain::declaration::{declare, legal_values};
use crate::domain::pieces_types::Piece;
use crate::domain::play_type::classify;
use crate::domain::state::Phase;
use crate::domain::test_gens;
use crate::domain::test_state_helpers::declaration_state;
use crate::domain::turn::{legal_plays, play_pieces};

proptest! {
    /// Property: classified plays carry their type's piece count.
    #[test]
    fn prop_classification_matches_piece_count(
        pieces in prop::collection::vec(test_gens::piece(), 1..=6),
    ) {
        if let Some(play_type) = classify(&pieces) {
            prop_assert_eq!(play_type.piece_count(), pieces.len());
        }
    }

    /// Property: however declarers pick among their legal values, the
    /// completed declarations never total exactly eight.
    #[test]
    fn prop_declaration_total_never_eight(
        hands in test_gens::dealt_hands(),
        picks in [0usize..64, 0usize..64, 0usize..64, 0usize..64],
    ) {
        let mut state = declaration_state(hands, 0);
        for pick in picks {
            let declarer = state.expected_declarer();
            let options = legal_values(&state);
            prop_assert!(!options.is_empty());
            let value = options[pick % options.len()];
            prop_assert!(declare(&mut state, declarer, value).is_ok());
        }
        let total: u8 = state.round.declarations.iter().flatten().sum();
        prop_assert_ne!(total, 8);
        prop_assert_eq!(state.phase, Phase::Turn { turn_no: 1 });
    }

    /// Property: across a whole round of arbitrary legal plays, pile awards
    /// equal winning-play sizes, winners match the leader's type, and hand
    /// sizes stay within one piece of each other.
    #[test]
    fn prop_round_invariants_hold_for_arbitrary_legal_plays(
        hands in test_gens::dealt_hands(),
        seed in any::<u32>(),
    ) {
        let mut state = declaration_state(hands, 0);
        for value in [1u8, 2, 2, 2] {
            let declarer = state.expected_declarer();
            declare(&mut state, declarer, value).unwrap();
        }

        let mut pick = seed as usize;
        let mut trick: Vec<(u8, Vec<Piece>)> = Vec::new();
        while let Phase::Turn { .. } = state.phase {
            let actor = state.expected_trick_actor().unwrap();
            let options = legal_plays(&state, actor);
            prop_assert!(!options.is_empty(), "an actor always has a legal play");
            // Rotate deterministically through the options per play.
            pick = pick.wrapping_mul(31).wrapping_add(17);
            let play = options[pick % options.len()].clone();
            let play_len = play.len() as u8;

            let result = play_pieces(&mut state, actor, &play).unwrap();
            trick.push((actor, play));

            if let Some(winner) = result.trick_winner {
                prop_assert_eq!(result.piles_awarded, play_len);

                let leader_type = classify(&trick[0].1);
                prop_assert!(leader_type.is_some(), "leads always classify");
                let (_, winning_play) = trick
                    .iter()
                    .find(|(seat, _)| *seat == winner)
                    .expect("winner committed a play");
                prop_assert_eq!(classify(winning_play), leader_type);

                let sizes = state.hand_sizes();
                prop_assert!(sizes.iter().max().unwrap() - sizes.iter().min().unwrap() <= 1);
                trick.clear();
            }
        }
        prop_assert_eq!(state.phase, Phase::Scoring);
    }
}
