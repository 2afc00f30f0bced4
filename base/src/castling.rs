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

//! Castling rights management.

use super::{Color, Square};

use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// A simple struct to store a player's castling rights.
/// The internal bits are used to represent castling rights.
/// From MSB to LSB:
/// * 4 unused bits
/// * Black queenside castling
/// * Black kingside castling
/// * White queenside castling
/// * White kingside castling
pub struct CastleRights(pub u8);

impl CastleRights {
    /// A `CastleRights` where all rights are available.
    pub const ALL_RIGHTS: CastleRights = CastleRights(15);

    /// A `CastleRights` where no rights are available.
    pub const NO_RIGHTS: CastleRights = CastleRights(0);

    /// Create a `CastleRights` for kingside castling on one side.
    #[inline(always)]
    pub const fn king_castle(color: Color) -> CastleRights {
        match color {
            Color::White => CastleRights(1),
            Color::Black => CastleRights(4),
        }
    }

    /// Create a `CastleRights` for queenside castling on one side.
    #[inline(always)]
    pub const fn queen_castle(color: Color) -> CastleRights {
        match color {
            Color::White => CastleRights(2),
            Color::Black => CastleRights(8),
        }
    }

    /// Get the full rights for one color.
    pub const fn color_rights(color: Color) -> CastleRights {
        match color {
            Color::White => CastleRights(3),
            Color::Black => CastleRights(12),
        }
    }

    /// Get the rights which are lost when a piece moves from or to `sq`.
    /// Moving a king or a rook off its home square, or capturing a rook on
    /// its home square, removes the corresponding rights.
    pub const fn lost_by_touching(sq: Square) -> CastleRights {
        match sq {
            Square::E1 => CastleRights::color_rights(Color::White),
            Square::H1 => CastleRights::king_castle(Color::White),
            Square::A1 => CastleRights::queen_castle(Color::White),
            Square::E8 => CastleRights::color_rights(Color::Black),
            Square::H8 => CastleRights::king_castle(Color::Black),
            Square::A8 => CastleRights::queen_castle(Color::Black),
            _ => CastleRights::NO_RIGHTS,
        }
    }

    #[inline(always)]
    /// Can the given color legally castle kingside?
    pub fn is_kingside_castle_legal(self, color: Color) -> bool {
        self & CastleRights::king_castle(color) != CastleRights::NO_RIGHTS
    }

    #[inline(always)]
    /// Can the given color legally castle queenside?
    pub fn is_queenside_castle_legal(self, color: Color) -> bool {
        self & CastleRights::queen_castle(color) != CastleRights::NO_RIGHTS
    }
}

impl BitOr<CastleRights> for CastleRights {
    type Output = CastleRights;
    #[inline(always)]
    fn bitor(self, other: CastleRights) -> CastleRights {
        CastleRights(self.0 | other.0)
    }
}

impl BitOrAssign<CastleRights> for CastleRights {
    #[inline(always)]
    fn bitor_assign(&mut self, other: CastleRights) {
        self.0 |= other.0;
    }
}

impl BitAnd<CastleRights> for CastleRights {
    type Output = CastleRights;
    #[inline(always)]
    fn bitand(self, other: CastleRights) -> CastleRights {
        CastleRights(self.0 & other.0)
    }
}

impl BitAndAssign<CastleRights> for CastleRights {
    #[inline(always)]
    fn bitand_assign(&mut self, other: CastleRights) {
        self.0 &= other.0;
    }
}

impl Not for CastleRights {
    type Output = CastleRights;
    #[inline(always)]
    fn not(self) -> CastleRights {
        CastleRights(self.0 ^ 15)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Test that moving a rook off its home square loses only that side's
    /// right.
    fn test_lost_by_touching() {
        let mut rights = CastleRights::ALL_RIGHTS;
        rights &= !CastleRights::lost_by_touching(Square::H1);
        assert!(!rights.is_kingside_castle_legal(Color::White));
        assert!(rights.is_queenside_castle_legal(Color::White));
        assert!(rights.is_kingside_castle_legal(Color::Black));

        rights &= !CastleRights::lost_by_touching(Square::E8);
        assert_eq!(rights, CastleRights::queen_castle(Color::White));
    }
}
