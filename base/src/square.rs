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

//! Squares, which are positions on a board.

use super::{Direction, ParseError};

use std::{
    convert::TryFrom,
    fmt::{Display, Formatter},
    mem::transmute,
    ops::{Add, AddAssign},
};

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// A square: one of 64 spots on a `Board` that a `Piece` can occupy.
///
/// Internally, a `Square` is a single byte. From MSB to LSB:
/// * 2 unused bits
/// * 3 bits for the rank
/// * 3 bits for the file
pub enum Square {
    A1 = 0,
    B1,
    C1,
    D1,
    E1,
    F1,
    G1,
    H1,
    A2,
    B2,
    C2,
    D2,
    E2,
    F2,
    G2,
    H2,
    A3,
    B3,
    C3,
    D3,
    E3,
    F3,
    G3,
    H3,
    A4,
    B4,
    C4,
    D4,
    E4,
    F4,
    G4,
    H4,
    A5,
    B5,
    C5,
    D5,
    E5,
    F5,
    G5,
    H5,
    A6,
    B6,
    C6,
    D6,
    E6,
    F6,
    G6,
    H6,
    A7,
    B7,
    C7,
    D7,
    E7,
    F7,
    G7,
    H7,
    A8,
    B8,
    C8,
    D8,
    E8,
    F8,
    G8,
    H8,
}

impl Square {
    #[inline(always)]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    /// Create a `Square` from the given rank and file. Ranks run from 0 to 7
    /// (instead of 1 through 8), and files run from 0 (A) to 7 (H).
    pub fn new(rank: usize, file: usize) -> Option<Square> {
        if rank >= 8 || file >= 8 {
            return None;
        }
        Square::try_from(((rank << 3) | file) as u8).ok()
    }

    #[inline(always)]
    #[must_use]
    /// Get the integer representing the rank (0 -> 1, ...) of this square.
    pub const fn rank(self) -> usize {
        (self as u8 >> 3u8) as usize
    }

    #[inline(always)]
    #[must_use]
    /// Get the integer representing the file (0 -> A, ...) of this square.
    pub const fn file(self) -> usize {
        (self as u8 & 7u8) as usize
    }

    #[inline(always)]
    #[must_use]
    /// Get the Chebyshev distance to another square.
    pub fn chebyshev_to(self, rhs: Square) -> usize {
        let rankdiff = self.rank().abs_diff(rhs.rank());
        let filediff = self.file().abs_diff(rhs.file());
        rankdiff.max(filediff)
    }

    #[inline(always)]
    #[must_use]
    /// Get what this square would appear to be from the point of view of the
    /// opposing player, i.e. the same file on the mirrored rank.
    ///
    /// # Examples
    ///
    /// ```
    /// use zugzwang_base::Square;
    /// assert_eq!(Square::A1.opposite(), Square::A8);
    /// assert_eq!(Square::E2.opposite(), Square::E7);
    /// ```
    pub fn opposite(self) -> Square {
        // xor with 56 flips the rank bits and keeps the value in 0..64
        unsafe { transmute(self as u8 ^ 56) }
    }

    /// Convert an algebraic string (such as "e7") to a square. The file must
    /// be lowercase.
    ///
    /// # Errors
    ///
    /// This function will return an `Err` if `s` is not a legal algebraic
    /// square.
    pub fn from_algebraic(s: &str) -> Result<Square, ParseError> {
        let bad_square = || ParseError::Square(s.to_string());
        let mut chars = s.chars();
        let (Some(file_char), Some(rank_char), None) = (chars.next(), chars.next(), chars.next())
        else {
            return Err(bad_square());
        };
        let file = "abcdefgh".find(file_char).ok_or_else(bad_square)?;
        let rank = rank_char
            .to_digit(10)
            .filter(|r| (1..=8).contains(r))
            .ok_or_else(bad_square)?;
        Square::new(rank as usize - 1, file).ok_or_else(bad_square)
    }

    #[must_use]
    /// Get the name of the file of this square. For instance, the square
    /// representing A1 will have the name "a".
    pub fn file_name(self) -> &'static str {
        ["a", "b", "c", "d", "e", "f", "g", "h"][self.file()]
    }
}

impl TryFrom<u8> for Square {
    type Error = ParseError;

    #[inline(always)]
    fn try_from(value: u8) -> Result<Square, ParseError> {
        match value {
            // every value in 0..64 is a discriminant of `Square`
            0..=63 => Ok(unsafe { transmute(value) }),
            _ => Err(ParseError::Square(value.to_string())),
        }
    }
}

impl Add<Direction> for Square {
    type Output = Square;
    #[inline(always)]
    #[allow(clippy::cast_sign_loss)]
    /// Step this square by a direction. The result wraps around the edges of
    /// the board, so callers must check that the step was valid.
    fn add(self, rhs: Direction) -> Self::Output {
        // the mask keeps the result in 0..64
        unsafe { transmute(((self as i8) + rhs.0) as u8 & 63) }
    }
}

impl AddAssign<Direction> for Square {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Direction) {
        *self = *self + rhs;
    }
}

impl Display for Square {
    #[inline(always)]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file_name(), self.rank() + 1)
    }
}
