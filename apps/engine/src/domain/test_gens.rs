// Proptest generators for domain types.

use proptest::prelude::*;

use crate::domain::pieces_types::{Piece, PieceColor, PieceKind};

pub fn kind() -> impl Strategy<Value = PieceKind> {
    prop_oneof![
        Just(PieceKind::General),
        Just(PieceKind::Advisor),
        Just(PieceKind::Elephant),
        Just(PieceKind::Chariot),
        Just(PieceKind::Horse),
        Just(PieceKind::Cannon),
        Just(PieceKind::Soldier),
    ]
}

pub fn color() -> impl Strategy<Value = PieceColor> {
    prop_oneof![Just(PieceColor::Red), Just(PieceColor::Black)]
}

pub fn piece() -> impl Strategy<Value = Piece> {
    (kind(), color()).prop_map(|(kind, color)| Piece::new(kind, color))
}

/// A seeded shuffle of the full 32-piece set split into four 8-piece hands.
pub fn dealt_hands() -> impl Strategy<Value = [Vec<Piece>; 4]> {
    any::<u64>().prop_map(|seed| {
        use rand::SeedableRng;
        crate::domain::dealing::deal_hands(&mut rand_chacha::ChaCha8Rng::seed_from_u64(seed))
    })
}
