//! Play classification: recognizing combinations and comparing their values.

use serde::{Deserialize, Serialize};

use super::pieces_types::{Piece, PieceColor, PieceKind};
use super::rules::MAX_LEAD_SIZE;

/// Structural classification of a committed set of pieces. Only plays whose
/// type matches the leader's are eligible to win a trick.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayType {
    Single,
    Pair,
    ThreeOfAKind,
    Straight,
    FourOfAKind,
    ExtendedStraight,
    FiveOfAKind,
    DoubleStraight,
}

impl PlayType {
    /// Number of pieces a play of this type commits.
    pub fn piece_count(&self) -> usize {
        match self {
            PlayType::Single => 1,
            PlayType::Pair => 2,
            PlayType::ThreeOfAKind | PlayType::Straight => 3,
            PlayType::FourOfAKind | PlayType::ExtendedStraight => 4,
            PlayType::FiveOfAKind => 5,
            PlayType::DoubleStraight => 6,
        }
    }
}

/// Classify a set of pieces, returning `None` for unrecognized combinations.
///
/// All multi-piece types are single-color. Soldier groups (pair through five
/// of a kind) count identical soldiers; straights are built from chariot,
/// horse, and cannon of one color.
pub fn classify(pieces: &[Piece]) -> Option<PlayType> {
    match pieces.len() {
        1 => Some(PlayType::Single),
        2 => (pieces[0] == pieces[1]).then_some(PlayType::Pair),
        3 => {
            if all_soldiers_one_color(pieces) {
                Some(PlayType::ThreeOfAKind)
            } else if is_straight(pieces) {
                Some(PlayType::Straight)
            } else {
                None
            }
        }
        4 => {
            if all_soldiers_one_color(pieces) {
                Some(PlayType::FourOfAKind)
            } else if is_extended_straight(pieces) {
                Some(PlayType::ExtendedStraight)
            } else {
                None
            }
        }
        5 => all_soldiers_one_color(pieces).then_some(PlayType::FiveOfAKind),
        6 => is_double_straight(pieces).then_some(PlayType::DoubleStraight),
        _ => None,
    }
}

/// Aggregate value of a play: the sum of piece ranks.
pub fn play_value(pieces: &[Piece]) -> u16 {
    pieces.iter().map(|p| p.rank() as u16).sum()
}

fn one_color(pieces: &[Piece]) -> Option<PieceColor> {
    let color = pieces.first()?.color;
    pieces.iter().all(|p| p.color == color).then_some(color)
}

fn all_soldiers_one_color(pieces: &[Piece]) -> bool {
    one_color(pieces).is_some() && pieces.iter().all(|p| p.kind == PieceKind::Soldier)
}

fn straight_kind_counts(pieces: &[Piece]) -> Option<[usize; 3]> {
    one_color(pieces)?;
    let mut counts = [0usize; 3];
    for p in pieces {
        match p.kind {
            PieceKind::Chariot => counts[0] += 1,
            PieceKind::Horse => counts[1] += 1,
            PieceKind::Cannon => counts[2] += 1,
            _ => return None,
        }
    }
    Some(counts)
}

/// Chariot + horse + cannon of one color, one each.
fn is_straight(pieces: &[Piece]) -> bool {
    straight_kind_counts(pieces) == Some([1, 1, 1])
}

/// Four of {chariot, horse, cannon} of one color with all three kinds present.
fn is_extended_straight(pieces: &[Piece]) -> bool {
    matches!(straight_kind_counts(pieces), Some(counts) if counts.iter().all(|&c| c >= 1))
}

/// Both chariots, both horses, and both cannons of one color.
fn is_double_straight(pieces: &[Piece]) -> bool {
    straight_kind_counts(pieces) == Some([2, 2, 2])
}

/// Whether `hand` contains `pieces` as a sub-multiset (duplicates counted).
pub fn hand_contains(hand: &[Piece], pieces: &[Piece]) -> bool {
    let mut remaining = hand.to_vec();
    for piece in pieces {
        match remaining.iter().position(|p| p == piece) {
            Some(idx) => {
                remaining.swap_remove(idx);
            }
            None => return false,
        }
    }
    true
}

/// Remove `pieces` from `hand`, one instance per named piece.
///
/// Callers must have checked containment first; missing pieces are a
/// validation error, not a panic.
pub fn remove_from_hand(hand: &mut Vec<Piece>, pieces: &[Piece]) -> bool {
    for piece in pieces {
        match hand.iter().position(|p| p == piece) {
            Some(idx) => {
                hand.remove(idx);
            }
            None => return false,
        }
    }
    true
}

/// Candidate plays for a hand, independent of turn enforcement.
///
/// With a required count set (follower), every subset of that size is a
/// candidate — followers may discard unclassifiable sets. Without one
/// (leader), every classifiable subset of up to [`MAX_LEAD_SIZE`] pieces is a
/// candidate. Candidates are deduplicated as multisets.
pub fn legal_plays(hand: &[Piece], required_count: Option<u8>) -> Vec<Vec<Piece>> {
    let sizes: Vec<usize> = match required_count {
        Some(n) => vec![n as usize],
        None => (1..=MAX_LEAD_SIZE.min(hand.len())).collect(),
    };

    let mut candidates = Vec::new();
    for size in sizes {
        if size == 0 || size > hand.len() {
            continue;
        }
        let mut subset = Vec::with_capacity(size);
        collect_subsets(hand, size, 0, &mut subset, &mut |pieces: &[Piece]| {
            if required_count.is_some() || classify(pieces).is_some() {
                let mut play = pieces.to_vec();
                play.sort();
                candidates.push(play);
            }
        });
    }
    candidates.sort();
    candidates.dedup();
    candidates
}

fn collect_subsets(
    hand: &[Piece],
    size: usize,
    start: usize,
    subset: &mut Vec<Piece>,
    visit: &mut impl FnMut(&[Piece]),
) {
    if subset.len() == size {
        visit(subset);
        return;
    }
    for i in start..hand.len() {
        subset.push(hand[i]);
        collect_subsets(hand, size, i + 1, subset, visit);
        subset.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pieces_parsing::try_parse_pieces;

    fn pieces(tokens: &[&str]) -> Vec<Piece> {
        try_parse_pieces(tokens).expect("hardcoded valid piece tokens")
    }

    #[test]
    fn classifies_singles_and_pairs() {
        assert_eq!(classify(&pieces(&["GR"])), Some(PlayType::Single));
        assert_eq!(classify(&pieces(&["AR", "AR"])), Some(PlayType::Pair));
        // Same kind, different color is not a pair
        assert_eq!(classify(&pieces(&["AR", "AB"])), None);
    }

    #[test]
    fn classifies_soldier_groups() {
        assert_eq!(
            classify(&pieces(&["SR", "SR", "SR"])),
            Some(PlayType::ThreeOfAKind)
        );
        assert_eq!(
            classify(&pieces(&["SB", "SB", "SB", "SB"])),
            Some(PlayType::FourOfAKind)
        );
        assert_eq!(
            classify(&pieces(&["SR", "SR", "SR", "SR", "SR"])),
            Some(PlayType::FiveOfAKind)
        );
        // Mixed-color soldiers never group
        assert_eq!(classify(&pieces(&["SR", "SR", "SB"])), None);
    }

    #[test]
    fn classifies_straights() {
        assert_eq!(classify(&pieces(&["RR", "HR", "CR"])), Some(PlayType::Straight));
        assert_eq!(
            classify(&pieces(&["RB", "RB", "HB", "CB"])),
            Some(PlayType::ExtendedStraight)
        );
        assert_eq!(
            classify(&pieces(&["RR", "RR", "HR", "HR", "CR", "CR"])),
            Some(PlayType::DoubleStraight)
        );
        // Missing a kind
        assert_eq!(classify(&pieces(&["RR", "RR", "HR", "HR"])), None);
        // Mixed colors
        assert_eq!(classify(&pieces(&["RR", "HB", "CR"])), None);
    }

    #[test]
    fn rejects_degenerate_sets() {
        assert_eq!(classify(&[]), None);
        assert_eq!(classify(&pieces(&["GR", "AB"])), None);
        assert_eq!(classify(&pieces(&["GR", "AR", "ER", "RR", "HR", "CR", "SR"])), None);
    }

    #[test]
    fn play_value_sums_ranks() {
        // Red chariot 8 + red horse 6 + red cannon 4
        assert_eq!(play_value(&pieces(&["RR", "HR", "CR"])), 18);
    }

    #[test]
    fn hand_contains_counts_duplicates() {
        let hand = pieces(&["SR", "SR", "GB"]);
        assert!(hand_contains(&hand, &pieces(&["SR", "SR"])));
        assert!(!hand_contains(&hand, &pieces(&["SR", "SR", "SR"])));
        assert!(!hand_contains(&hand, &pieces(&["GR"])));
    }

    #[test]
    fn remove_from_hand_takes_one_instance_each() {
        let mut hand = pieces(&["SR", "SR", "GB"]);
        assert!(remove_from_hand(&mut hand, &pieces(&["SR"])));
        assert_eq!(hand, pieces(&["SR", "GB"]));
        assert!(!remove_from_hand(&mut hand, &pieces(&["HR"])));
    }

    #[test]
    fn legal_plays_for_leader_are_all_classifiable() {
        let hand = pieces(&["GR", "SR", "SR", "SR", "RB", "HB", "CB", "AB"]);
        let plays = legal_plays(&hand, None);
        assert!(plays.iter().all(|p| classify(p).is_some()));
        // Singles for each distinct piece
        assert!(plays.iter().filter(|p| p.len() == 1).count() >= 6);
        // The soldier trio and the black straight are found
        assert!(plays.contains(&{
            let mut v = pieces(&["SR", "SR", "SR"]);
            v.sort();
            v
        }));
        assert!(plays.contains(&{
            let mut v = pieces(&["RB", "HB", "CB"]);
            v.sort();
            v
        }));
    }

    #[test]
    fn legal_plays_for_follower_are_any_subset_of_required_size() {
        let hand = pieces(&["GR", "AB", "SR"]);
        let plays = legal_plays(&hand, Some(2));
        assert_eq!(plays.len(), 3);
        assert!(plays.iter().all(|p| p.len() == 2));
    }
}
