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

//! Directions, which are the differences between squares.

use super::Square;

use std::ops::{Add, Neg};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// A difference between two squares. `Direction`s form a vector field, which
/// allows us to define steps between `Square`s.
pub struct Direction(pub i8);

impl Direction {
    /// A `Direction` corresponding to a move "north" from White's point of
    /// view, in the direction a white pawn would travel.
    pub const NORTH: Direction = Direction(8);

    /// A `Direction` corresponding to a move "east" from White's point of view.
    pub const EAST: Direction = Direction(1);

    /// A `Direction` corresponding to a move "south" from White's point of
    /// view.
    pub const SOUTH: Direction = Direction(-8);

    /// A `Direction` corresponding to a move "west" from White's point of view.
    pub const WEST: Direction = Direction(-1);

    pub const NORTHWEST: Direction = Direction(Direction::NORTH.0 + Direction::WEST.0);
    pub const NORTHEAST: Direction = Direction(Direction::NORTH.0 + Direction::EAST.0);
    pub const SOUTHEAST: Direction = Direction(Direction::SOUTH.0 + Direction::EAST.0);
    pub const SOUTHWEST: Direction = Direction(Direction::SOUTH.0 + Direction::WEST.0);

    /* Knight directions */

    pub const NNW: Direction = Direction(2 * Direction::NORTH.0 + Direction::WEST.0);
    pub const NNE: Direction = Direction(2 * Direction::NORTH.0 + Direction::EAST.0);
    pub const ENE: Direction = Direction(Direction::NORTH.0 + 2 * Direction::EAST.0);
    pub const ESE: Direction = Direction(Direction::SOUTH.0 + 2 * Direction::EAST.0);
    pub const SSE: Direction = Direction(2 * Direction::SOUTH.0 + Direction::EAST.0);
    pub const SSW: Direction = Direction(2 * Direction::SOUTH.0 + Direction::WEST.0);
    pub const WSW: Direction = Direction(Direction::SOUTH.0 + 2 * Direction::WEST.0);
    pub const WNW: Direction = Direction(Direction::NORTH.0 + 2 * Direction::WEST.0);

    /// The directions that a rook can move, along only one step.
    pub const ROOK_DIRECTIONS: [Direction; 4] = [
        Direction::NORTH,
        Direction::SOUTH,
        Direction::EAST,
        Direction::WEST,
    ];

    /// The directions that a bishop can move, along only one step.
    pub const BISHOP_DIRECTIONS: [Direction; 4] = [
        Direction::NORTHWEST,
        Direction::NORTHEAST,
        Direction::SOUTHWEST,
        Direction::SOUTHEAST,
    ];

    /// The steps that a knight can make.
    pub const KNIGHT_STEPS: [Direction; 8] = [
        Direction::NNW,
        Direction::NNE,
        Direction::ENE,
        Direction::ESE,
        Direction::SSE,
        Direction::SSW,
        Direction::WSW,
        Direction::WNW,
    ];

    /// The steps that a king can make.
    pub const KING_STEPS: [Direction; 8] = [
        Direction::NORTH,
        Direction::NORTHEAST,
        Direction::EAST,
        Direction::SOUTHEAST,
        Direction::SOUTH,
        Direction::SOUTHWEST,
        Direction::WEST,
        Direction::NORTHWEST,
    ];

    #[inline(always)]
    #[must_use]
    /// Is stepping from `sq` by this direction a legal step that stays on the
    /// board? `max_dist` is the largest Chebyshev distance a single step in
    /// this direction may cover (1 for kings and sliders, 2 for knights).
    pub fn is_valid_step(self, sq: Square, max_dist: usize) -> bool {
        let target = i16::from(sq as u8) + i16::from(self.0);
        (0..64).contains(&target) && sq.chebyshev_to(sq + self) <= max_dist
    }
}

impl Neg for Direction {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Direction(-self.0)
    }
}

impl Add<Direction> for Direction {
    type Output = Self;
    fn add(self, rhs: Direction) -> Self::Output {
        Direction(self.0 + rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_directions() {
        assert_eq!(-Direction::EAST, Direction::WEST);
        assert_eq!(-Direction::NORTH, Direction::SOUTH);
        assert_eq!(Direction::NORTH + Direction::EAST, Direction::NORTHEAST);
    }

    #[test]
    /// Test that steps which would wrap around the board are rejected.
    fn test_valid_steps() {
        assert!(Direction::NORTH.is_valid_step(Square::A1, 1));
        assert!(!Direction::WEST.is_valid_step(Square::A1, 1));
        assert!(!Direction::SOUTH.is_valid_step(Square::E1, 1));
        assert!(!Direction::EAST.is_valid_step(Square::H4, 1));
        assert!(Direction::NNE.is_valid_step(Square::G1, 2));
        assert!(!Direction::ENE.is_valid_step(Square::G1, 2));
    }
}
