//! Serialization for piece types.
//!
//! A piece crosses the snapshot boundary as its two-character token ("GR",
//! "SB"), keeping broadcasts compact and human-scannable in logs.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::pieces_types::Piece;

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Piece>()
            .map_err(|_| serde::de::Error::custom(format!("Invalid piece token: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pieces_types::{PieceColor, PieceKind};

    #[test]
    fn piece_serializes_as_token() {
        let piece = Piece::new(PieceKind::Cannon, PieceColor::Black);
        assert_eq!(serde_json::to_string(&piece).unwrap(), "\"CB\"");
    }

    #[test]
    fn piece_deserializes_from_token() {
        let piece: Piece = serde_json::from_str("\"HR\"").unwrap();
        assert_eq!(piece, Piece::new(PieceKind::Horse, PieceColor::Red));
    }

    #[test]
    fn rejects_invalid_tokens() {
        for tok in ["\"1H\"", "\"GRB\"", "\"\"", "\"gr\""] {
            let res: Result<Piece, _> = serde_json::from_str(tok);
            assert!(res.is_err());
        }
    }
}
