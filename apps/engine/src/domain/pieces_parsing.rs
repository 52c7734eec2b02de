//! Piece parsing from string tokens (e.g., "GR", "SB")

use std::fmt;
use std::str::FromStr;

use super::pieces_types::{Piece, PieceColor, PieceKind};
use crate::errors::domain::{DomainError, ValidationKind};

impl FromStr for Piece {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(kind_ch), Some(color_ch), None) = (chars.next(), chars.next(), chars.next())
        else {
            return Err(DomainError::validation(
                ValidationKind::ParsePiece,
                format!("Parse piece: {s}"),
            ));
        };
        // Chariot uses 'R' so that 'C' stays free for the cannon.
        let kind = match kind_ch {
            'G' => PieceKind::General,
            'A' => PieceKind::Advisor,
            'E' => PieceKind::Elephant,
            'R' => PieceKind::Chariot,
            'H' => PieceKind::Horse,
            'C' => PieceKind::Cannon,
            'S' => PieceKind::Soldier,
            _ => {
                return Err(DomainError::validation(
                    ValidationKind::ParsePiece,
                    format!("Parse piece: {s}"),
                ))
            }
        };
        let color = match color_ch {
            'R' => PieceColor::Red,
            'B' => PieceColor::Black,
            _ => {
                return Err(DomainError::validation(
                    ValidationKind::ParsePiece,
                    format!("Parse piece: {s}"),
                ))
            }
        };
        Ok(Piece { kind, color })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            PieceKind::General => 'G',
            PieceKind::Advisor => 'A',
            PieceKind::Elephant => 'E',
            PieceKind::Chariot => 'R',
            PieceKind::Horse => 'H',
            PieceKind::Cannon => 'C',
            PieceKind::Soldier => 'S',
        };
        let color = match self.color {
            PieceColor::Red => 'R',
            PieceColor::Black => 'B',
        };
        write!(f, "{kind}{color}")
    }
}

/// Non-panicking helper to parse piece tokens (e.g., "GR", "SB") into Piece
/// instances. Fails if any token is invalid.
pub fn try_parse_pieces<I, S>(tokens: I) -> Result<Vec<Piece>, DomainError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|s| s.as_ref().parse::<Piece>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_round_trip() {
        for tok in [
            "GR", "GB", "AR", "AB", "ER", "EB", "RR", "RB", "HR", "HB", "CR", "CB", "SR", "SB",
        ] {
            let piece: Piece = tok.parse().unwrap();
            assert_eq!(piece.to_string(), tok);
        }
    }

    #[test]
    fn rejects_invalid_tokens() {
        for tok in ["", "G", "GRR", "XR", "GX", "gr", "1B"] {
            assert!(tok.parse::<Piece>().is_err(), "accepted {tok:?}");
        }
    }

    #[test]
    fn try_parse_pieces_collects() {
        let pieces = try_parse_pieces(["GR", "SB", "CR"]).unwrap();
        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces[0].rank(), 14);

        assert!(try_parse_pieces(["GR", "??"]).is_err());
    }
}
