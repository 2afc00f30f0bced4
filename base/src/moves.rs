/*
  Zugzwang, a UCI-compatible chess engine.
  Copyright (C) 2022 The Zugzwang Authors (see AUTHORS.md file)

  Zugzwang is free software: you can redistribute it and/or modify
  it under the terms of the GNU General Public License as published by
  the Free Software Foundation, either version 3 of the License, or
  (at your option) any later version.

  Zugzwang is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/

//! Moves, which describe a piece traveling from one square to another.

use super::{ParseError, Piece, Square};

use std::{
    convert::TryFrom,
    fmt::{Display, Formatter},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// The information of one move, containing its from- and to-squares, as well
/// as its promotion type.
///
/// Internally, moves are represented as packed structures in a single
/// unsigned 16-bit integer. From MSB to LSB, the bits inside of a `Move` are
/// as follows:
/// * 1 unused bit
/// * 1 bit: is this move a promotion?
/// * 2 bits: promotion type (0 knight, 1 bishop, 2 rook, 3 queen)
/// * 6 bits: to-square
/// * 6 bits: from-square
///
/// Castling is written as the king's two-square step and en passant as the
/// pawn's diagonal step, so two moves are equal exactly when their squares and
/// promotion types are.
pub struct Move(u16);

impl Move {
    /// The sentinel move. It has no meaningful from- or to-square and is
    /// never legal; it stands for "no move".
    pub const NULL: Move = Move(0);

    /// The flag marking a promotion.
    const PROMOTE_FLAG: u16 = 1 << 14;

    #[inline(always)]
    #[must_use]
    /// Create a `Move` with no promotion type.
    pub const fn normal(from_square: Square, to_square: Square) -> Move {
        Move(((to_square as u16) << 6) | from_square as u16)
    }

    #[inline(always)]
    #[must_use]
    /// Create a `Move` which promotes to `promote_type`. Requires that the
    /// promotion type is a knight, bishop, rook, or queen.
    pub const fn promoting(from_square: Square, to_square: Square, promote_type: Piece) -> Move {
        Move(
            Move::normal(from_square, to_square).0
                | Move::PROMOTE_FLAG
                | ((promote_type as u16 & 3) << 12),
        )
    }

    #[inline(always)]
    #[must_use]
    /// Create a `Move` with an optional promotion type.
    pub const fn new(from_square: Square, to_square: Square, promote_type: Option<Piece>) -> Move {
        match promote_type {
            None => Move::normal(from_square, to_square),
            Some(pt) => Move::promoting(from_square, to_square, pt),
        }
    }

    #[inline(always)]
    #[must_use]
    /// Get the square that a piece moves from to execute this move.
    pub fn from_square(self) -> Square {
        // masking to six bits always gives a valid square
        Square::try_from((self.0 & 63) as u8).unwrap_or(Square::A1)
    }

    #[inline(always)]
    #[must_use]
    /// Get the target square of this move.
    pub fn to_square(self) -> Square {
        Square::try_from(((self.0 >> 6) & 63) as u8).unwrap_or(Square::A1)
    }

    #[inline(always)]
    #[must_use]
    /// Get the promotion type of this move.
    pub const fn promote_type(self) -> Option<Piece> {
        match self.0 & Move::PROMOTE_FLAG {
            0 => None,
            _ => Some(Piece::from_promote_bits(self.0 >> 12)),
        }
    }

    #[inline(always)]
    #[must_use]
    /// Is this the sentinel move?
    pub const fn is_null(self) -> bool {
        self.0 == Move::NULL.0
    }

    /// Convert a move from its UCI representation (such as "e2e4" or
    /// "e7e8q"). Legality is not checked.
    ///
    /// # Errors
    ///
    /// This function will return an `Err` if the string is not a coordinate
    /// move.
    pub fn from_uci(s: &str) -> Result<Move, ParseError> {
        if s == "0000" {
            return Ok(Move::NULL);
        }
        if !(4..=5).contains(&s.len()) || !s.is_ascii() {
            return Err(ParseError::Move(s.to_string()));
        }
        let from_sq = Square::from_algebraic(&s[0..2])?;
        let to_sq = Square::from_algebraic(&s[2..4])?;
        let promote_type = match s.chars().nth(4) {
            None => None,
            Some(c) => match Piece::from_code(c.to_ascii_uppercase()) {
                Some(pt @ (Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen)) => Some(pt),
                _ => return Err(ParseError::Promotion(c)),
            },
        };

        Ok(Move::new(from_sq, to_sq, promote_type))
    }

    #[must_use]
    /// Convert this move to its UCI representation. The sentinel move is
    /// written as "0000".
    pub fn to_uci(self) -> String {
        if self.is_null() {
            return "0000".into();
        }
        match self.promote_type() {
            None => format!("{}{}", self.from_square(), self.to_square()),
            Some(pt) => format!(
                "{}{}{}",
                self.from_square(),
                self.to_square(),
                pt.code().to_ascii_lowercase()
            ),
        }
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Test that a normal move is parsed from its UCI notation.
    fn test_uci_move_normal() {
        let m = Move::from_uci("e2e4").unwrap();
        assert_eq!(m, Move::normal(Square::E2, Square::E4));
        assert_eq!(m.from_square(), Square::E2);
        assert_eq!(m.to_square(), Square::E4);
        assert_eq!(m.promote_type(), None);
    }

    #[test]
    /// Test that promotions survive conversion in both directions.
    fn test_uci_move_promotion() {
        let m = Move::from_uci("b7b8n").unwrap();
        assert_eq!(m, Move::promoting(Square::B7, Square::B8, Piece::Knight));
        assert_eq!(m.to_uci(), "b7b8n");
        assert_eq!(Move::promoting(Square::E2, Square::E1, Piece::Queen).to_uci(), "e2e1q");
    }

    #[test]
    /// Test that the sentinel move is written as four zeros.
    fn test_null_move() {
        assert_eq!(Move::NULL.to_uci(), "0000");
        assert_eq!(Move::from_uci("0000"), Ok(Move::NULL));
        assert!(Move::NULL.is_null());
        assert!(!Move::normal(Square::A1, Square::A2).is_null());
    }

    #[test]
    /// Test that malformed move strings are rejected.
    fn test_uci_move_bad() {
        assert!(Move::from_uci("e2").is_err());
        assert!(Move::from_uci("e2e9").is_err());
        assert!(Move::from_uci("e7e8k").is_err());
        assert!(Move::from_uci("e7e8qq").is_err());
    }
}
