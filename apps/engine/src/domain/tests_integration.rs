//! A full scripted round through the pure domain layer.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::dealing::deal_hands;
use crate::domain::declaration::declare;
use crate::domain::rules::DECK_SIZE;
use crate::domain::scoring::apply_round_scoring;
use crate::domain::state::Phase;
use crate::domain::test_state_helpers::declaration_state;
use crate::domain::turn::play_pieces;

#[test]
fn a_full_round_of_single_piece_tricks_plays_out() {
    let hands = deal_hands(&mut ChaCha8Rng::seed_from_u64(5));
    let mut state = declaration_state(hands, 0);

    // Declarations in turn order, totalling 9 (anything but 8).
    for (i, value) in [2u8, 2, 2, 3].into_iter().enumerate() {
        let declarer = state.turn_order[i];
        declare(&mut state, declarer, value).unwrap();
    }
    assert_eq!(state.phase, Phase::Turn { turn_no: 1 });

    // Everyone plays their lowest piece; leads of one piece force
    // one-piece tricks throughout.
    let mut tricks = 0;
    let mut final_winner = None;
    while let Phase::Turn { .. } = state.phase {
        let actor = state.expected_trick_actor().unwrap();
        let piece = *state.hands[actor as usize].last().unwrap();
        let result = play_pieces(&mut state, actor, &[piece]).unwrap();

        if result.trick_completed {
            tricks += 1;
            let winner = result.trick_winner.unwrap();
            final_winner = Some(winner);
            assert_eq!(result.piles_awarded, 1);
            // The winner of a trick leads the next one.
            if !result.round_completed {
                assert_eq!(state.round.trick_leader, Some(winner));
            }
            let sizes = state.hand_sizes();
            assert!(sizes.iter().max().unwrap() - sizes.iter().min().unwrap() <= 1);
        }
    }

    assert_eq!(tricks, 8);
    assert_eq!(state.phase, Phase::Scoring);
    assert_eq!(state.round.piles_won.iter().map(|&p| p as usize).sum::<usize>(), 8);
    let captured: usize = state.round.captured.iter().map(|c| c.len()).sum();
    assert_eq!(captured, DECK_SIZE);

    // Scoring rolls the session into round 2, led by the final-trick winner.
    let outcome = apply_round_scoring(&mut state, 50).unwrap();
    assert!(!outcome.game_over);
    assert_eq!(state.round_no, 2);
    assert_eq!(state.phase, Phase::Preparation);
    assert_eq!(Some(state.round_starter), final_winner);
    assert!(state.last_round.is_some());
}
