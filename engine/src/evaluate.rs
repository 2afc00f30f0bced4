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

//! Static evaluation of positions.
//!
//! The evaluator sums, from White's point of view, material, piece-square
//! bonuses for knights and pawns, a bishop-pair bonus, a penalty for doubled
//! pawns, the difference in the number of legal moves, and a penalty for a
//! king with no pawn in front of it. The sum is then put into the
//! perspective of the player to move.

use zugzwang_base::{
    movegen::{get_moves, ALL},
    Bitboard, Board, Color, Direction, Eval, Piece, Square,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// The weights of the static evaluator, in centipawns.
pub struct EvalParams {
    /// The value of each piece type, indexed by `Piece as usize`.
    pub piece_values: [i16; Piece::NUM_TYPES],
    /// The bonus for owning at least two bishops.
    pub bishop_pair: i16,
    /// The penalty for each pawn beyond the first on a file.
    pub doubled_pawn: i16,
    /// The bonus for each legal move more than the opponent has.
    pub mobility: i16,
    /// The penalty for a king whose forward square holds no friendly pawn.
    pub king_shield: i16,
}

impl Default for EvalParams {
    fn default() -> Self {
        EvalParams {
            // knight, bishop, rook, queen, pawn, king
            piece_values: [320, 330, 500, 900, 100, 0],
            bishop_pair: 30,
            doubled_pawn: 12,
            mobility: 3,
            king_shield: 15,
        }
    }
}

/// Knight piece-square bonuses from White's point of view, listed from a8 to
/// h1 as a board is drawn.
const KNIGHT_TABLE: [i16; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50, //
    -40, -20, 0, 5, 5, 0, -20, -40, //
    -30, 5, 10, 15, 15, 10, 5, -30, //
    -30, 0, 15, 20, 20, 15, 0, -30, //
    -30, 5, 15, 20, 20, 15, 5, -30, //
    -30, 0, 10, 15, 15, 10, 0, -30, //
    -40, -20, 0, 0, 0, 0, -20, -40, //
    -50, -40, -30, -30, -30, -30, -40, -50, //
];

/// Pawn piece-square bonuses from White's point of view, listed from a8 to h1
/// as a board is drawn.
const PAWN_TABLE: [i16; 64] = [
    0, 0, 0, 0, 0, 0, 0, 0, //
    50, 50, 50, 50, 50, 50, 50, 50, //
    10, 10, 20, 30, 30, 20, 10, 10, //
    5, 5, 10, 25, 25, 10, 5, 5, //
    0, 0, 0, 20, 20, 0, 0, 0, //
    5, -5, -10, 0, 0, -10, -5, 5, //
    5, 10, 10, -20, -20, 10, 10, 5, //
    0, 0, 0, 0, 0, 0, 0, 0, //
];

#[inline(always)]
/// Get the piece-square bonus of a piece of the given type and color on `sq`.
fn pst_value(pt: Piece, color: Color, sq: Square) -> i16 {
    // the tables start at a8, so White's squares are flipped vertically
    let idx = match color {
        Color::White => sq as usize ^ 56,
        Color::Black => sq as usize,
    };
    match pt {
        Piece::Knight => KNIGHT_TABLE[idx],
        Piece::Pawn => PAWN_TABLE[idx],
        _ => 0,
    }
}

#[must_use]
/// Evaluate a position statically, in centipawns from the perspective of the
/// player to move. Mates and draws are not detected here.
pub fn static_evaluate(b: &Board, params: &EvalParams) -> Eval {
    Eval::centipawns(white_score(b, params)).in_perspective(b.player_to_move)
}

/// Compute the evaluation of a position in centipawns, from White's
/// perspective.
fn white_score(b: &Board, params: &EvalParams) -> i16 {
    let mut score = 0;

    for color in [Color::White, Color::Black] {
        let sign = match color {
            Color::White => 1,
            Color::Black => -1,
        };
        let ours = b[color];

        for pt in Piece::ALL_TYPES {
            for sq in b[pt] & ours {
                score += sign * (params.piece_values[pt as usize] + pst_value(pt, color, sq));
            }
        }

        if (b[Piece::Bishop] & ours).more_than_one() {
            score += sign * params.bishop_pair;
        }

        let pawns = b[Piece::Pawn] & ours;
        for file in 0..8 {
            let num_on_file = (pawns & Bitboard::file(file)).len() as i16;
            if num_on_file > 1 {
                score -= sign * params.doubled_pawn * (num_on_file - 1);
            }
        }

        if let Some(king_sq) = b.king_square(color) {
            let (last_rank, forward) = match color {
                Color::White => (7, Direction::NORTH),
                Color::Black => (0, Direction::SOUTH),
            };
            if king_sq.rank() != last_rank && !pawns.contains(king_sq + forward) {
                score -= sign * params.king_shield;
            }
        }
    }

    let white_mobility = get_moves::<ALL>(&b.with_player_to_move(Color::White)).len() as i16;
    let black_mobility = get_moves::<ALL>(&b.with_player_to_move(Color::Black)).len() as i16;
    score += params.mobility * (white_mobility - black_mobility);

    score
}
