//! Dealing logic: the fixed 32-piece set, shuffling, and weak-hand detection.

use rand::seq::SliceRandom;
use rand::Rng;

use super::pieces_types::{Piece, PieceColor, PieceKind, HIGHEST_PIECE};
use super::rules::{DECK_SIZE, HAND_SIZE, PLAYERS, WEAK_HAND_THRESHOLD};
use super::state::PlayerId;

/// Generate the full 32-piece set in a fixed order.
pub fn full_deck() -> Vec<Piece> {
    let kinds = [
        PieceKind::General,
        PieceKind::Advisor,
        PieceKind::Elephant,
        PieceKind::Chariot,
        PieceKind::Horse,
        PieceKind::Cannon,
        PieceKind::Soldier,
    ];

    let mut deck = Vec::with_capacity(DECK_SIZE);
    for color in [PieceColor::Red, PieceColor::Black] {
        for kind in kinds {
            let piece = Piece::new(kind, color);
            for _ in 0..piece.copies() {
                deck.push(piece);
            }
        }
    }
    deck
}

/// Shuffle the full set and deal 8 pieces to each of the 4 players.
///
/// Hands are sorted descending by rank for stable snapshots and logs.
pub fn deal_hands<R: Rng>(rng: &mut R) -> [Vec<Piece>; PLAYERS] {
    let mut deck = full_deck();
    deck.shuffle(rng);

    let mut hands: [Vec<Piece>; PLAYERS] = Default::default();
    for (player, hand_slot) in hands.iter_mut().enumerate() {
        let start = player * HAND_SIZE;
        let mut hand = deck[start..start + HAND_SIZE].to_vec();
        hand.sort_by(|a, b| b.rank().cmp(&a.rank()));
        *hand_slot = hand;
    }
    hands
}

/// A hand is weak when its best piece does not exceed the threshold.
pub fn is_weak_hand(hand: &[Piece]) -> bool {
    hand.iter()
        .map(|p| p.rank())
        .max()
        .is_some_and(|best| best <= WEAK_HAND_THRESHOLD)
}

/// The seat holding the unique highest piece (decides the round-1 starter).
pub fn highest_piece_holder(hands: &[Vec<Piece>; PLAYERS]) -> Option<PlayerId> {
    hands
        .iter()
        .position(|hand| hand.contains(&HIGHEST_PIECE))
        .map(|seat| seat as PlayerId)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn full_deck_has_fixed_multiset() {
        let deck = full_deck();
        assert_eq!(deck.len(), DECK_SIZE);
        for piece in &deck {
            let copies = deck.iter().filter(|p| *p == piece).count();
            assert_eq!(copies, piece.copies(), "wrong copy count for {piece}");
        }
    }

    #[test]
    fn deal_is_deterministic_for_a_seed() {
        let h1 = deal_hands(&mut ChaCha8Rng::seed_from_u64(12345));
        let h2 = deal_hands(&mut ChaCha8Rng::seed_from_u64(12345));
        assert_eq!(h1, h2);

        let h3 = deal_hands(&mut ChaCha8Rng::seed_from_u64(54321));
        assert_ne!(h1, h3);
    }

    #[test]
    fn deal_covers_the_whole_set() {
        let hands = deal_hands(&mut ChaCha8Rng::seed_from_u64(42));
        let mut all: Vec<Piece> = hands.iter().flatten().copied().collect();
        assert_eq!(all.len(), DECK_SIZE);
        let mut deck = full_deck();
        all.sort();
        deck.sort();
        assert_eq!(all, deck);
    }

    #[test]
    fn hands_are_sorted_descending() {
        let hands = deal_hands(&mut ChaCha8Rng::seed_from_u64(7));
        for hand in &hands {
            assert!(hand.windows(2).all(|w| w[0].rank() >= w[1].rank()));
        }
    }

    #[test]
    fn weak_hand_threshold_boundary() {
        let weak: Vec<Piece> = vec!["EB", "RB", "HB", "CB", "SB", "SB", "SR", "SR"]
            .into_iter()
            .map(|t| t.parse().unwrap())
            .collect();
        assert!(is_weak_hand(&weak));

        // A red elephant (rank 10) lifts the hand above the threshold
        let strong: Vec<Piece> = vec!["ER", "RB", "HB", "CB", "SB", "SB", "SR", "SR"]
            .into_iter()
            .map(|t| t.parse().unwrap())
            .collect();
        assert!(!is_weak_hand(&strong));
    }

    #[test]
    fn highest_piece_holder_is_found() {
        let hands = deal_hands(&mut ChaCha8Rng::seed_from_u64(99));
        let holder = highest_piece_holder(&hands).expect("red general is always dealt");
        assert!(hands[holder as usize].contains(&HIGHEST_PIECE));
    }
}
