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

//! Representation of player colors.

use super::{Bitboard, Direction};

use std::ops::Not;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// An enum representing the possible colors that a piece or player can be.
pub enum Color {
    /// The white player, a.k.a. the first player to move in a game.
    White = 0,
    /// The black player, a.k.a. the second player to move in a game.
    Black = 1,
}

impl Color {
    #[inline(always)]
    /// Get the direction that a pawn of the given color normally moves.
    pub const fn pawn_direction(self) -> Direction {
        match self {
            Color::White => Direction::NORTH,
            Color::Black => Direction::SOUTH,
        }
    }

    #[inline(always)]
    /// Get the promotion rank of a given color.
    pub const fn pawn_promote_rank(self) -> Bitboard {
        match self {
            Color::White => Bitboard::new(0xFF00_0000_0000_0000),
            Color::Black => Bitboard::new(0x0000_0000_0000_00FF),
        }
    }

    #[inline(always)]
    /// Get a `Bitboard` with 1's on the start rank of the pawn of the given
    /// color.
    pub const fn pawn_start_rank(self) -> Bitboard {
        match self {
            Color::White => Bitboard::new(0x0000_0000_0000_FF00),
            Color::Black => Bitboard::new(0x00FF_0000_0000_0000),
        }
    }
}

impl Not for Color {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}
