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

//! Zobrist hashing, which fingerprints a position as a single 64-bit integer.
//!
//! Every feature of a position (a piece of some color on some square, the
//! player to move, each castling right, and the file of the en passant
//! target) has a pseudo-random key. A position's hash is the exclusive-or of
//! the keys of all of its features, so making a move only needs to toggle the
//! keys of the features it changes.
//!
//! The keys are drawn once from a fixed seed, so hashes are identical across
//! runs of the program.

use super::{Board, CastleRights, Color, Piece, Square};

use once_cell::sync::Lazy;

/// The seed from which all keys are generated.
const KEY_SEED: u64 = 0x5EED_1234_ABCD_0042;

/// The full set of keys used for hashing.
struct ZobristKeys {
    /// Indexed by square, then color, then piece type.
    squares: [[[u64; Piece::NUM_TYPES]; 2]; 64],
    /// Indexed by the bit of the right in `CastleRights`.
    castling: [u64; 4],
    /// Indexed by file.
    en_passant: [u64; 8],
    black_to_move: u64,
}

static KEYS: Lazy<ZobristKeys> = Lazy::new(|| {
    let rng = fastrand::Rng::new();
    rng.seed(KEY_SEED);
    let mut keys = ZobristKeys {
        squares: [[[0; Piece::NUM_TYPES]; 2]; 64],
        castling: [0; 4],
        en_passant: [0; 8],
        black_to_move: 0,
    };
    for square_keys in &mut keys.squares {
        for color_keys in square_keys.iter_mut() {
            for key in color_keys.iter_mut() {
                *key = rng.u64(..);
            }
        }
    }
    for key in &mut keys.castling {
        *key = rng.u64(..);
    }
    for key in &mut keys.en_passant {
        *key = rng.u64(..);
    }
    keys.black_to_move = rng.u64(..);

    keys
});

#[inline(always)]
#[must_use]
/// Get the key for a piece of the given type and color on `sq`.
pub fn square_key(sq: Square, pt: Piece, color: Color) -> u64 {
    KEYS.squares[sq as usize][color as usize][pt as usize]
}

#[must_use]
/// Get the combined key for every right held in `rights`.
pub fn castle_key(rights: CastleRights) -> u64 {
    (0..4)
        .filter(|&bit| rights.0 & (1 << bit) != 0)
        .fold(0, |acc, bit| acc ^ KEYS.castling[bit])
}

#[inline(always)]
#[must_use]
/// Get the key for an en passant target on `sq`. Only the file matters.
pub fn ep_key(sq: Square) -> u64 {
    KEYS.en_passant[sq.file()]
}

#[inline(always)]
#[must_use]
/// Get the key which is present exactly when Black is to move.
pub fn black_to_move_key() -> u64 {
    KEYS.black_to_move
}

#[must_use]
/// Compute the hash of a board from scratch. A board's incrementally updated
/// `hash` field must always equal this value.
pub fn hash(board: &Board) -> u64 {
    let mut hash = 0;
    for pt in Piece::ALL_TYPES {
        for color in [Color::White, Color::Black] {
            for sq in board[pt] & board[color] {
                hash ^= square_key(sq, pt, color);
            }
        }
    }
    hash ^= castle_key(board.castle_rights);
    if let Some(sq) = board.en_passant_square {
        hash ^= ep_key(sq);
    }
    if board.player_to_move == Color::Black {
        hash ^= black_to_move_key();
    }

    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Test that the same position always gets the same hash.
    fn test_deterministic() {
        let b1 = Board::default();
        let b2 = Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
        assert_eq!(hash(&b1), hash(&b2));
    }

    #[test]
    /// Test that positions differing only in side to move get different
    /// hashes.
    fn test_side_to_move() {
        let w = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let b = Board::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        assert_ne!(hash(&w), hash(&b));
    }

    #[test]
    /// Test that positions differing only in castling rights get different
    /// hashes.
    fn test_castling_rights() {
        let all = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let some = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1").unwrap();
        let none = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1").unwrap();
        assert_ne!(hash(&all), hash(&some));
        assert_ne!(hash(&some), hash(&none));
        assert_ne!(hash(&all), hash(&none));
    }

    #[test]
    /// Test that positions differing only in the en passant target get
    /// different hashes.
    fn test_en_passant() {
        let ep = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
        let no_ep = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 2").unwrap();
        assert_ne!(hash(&ep), hash(&no_ep));
    }

    #[test]
    /// Test that the castle keys combine like the rights do.
    fn test_castle_key_combines() {
        let wk = CastleRights::king_castle(Color::White);
        let bq = CastleRights::queen_castle(Color::Black);
        assert_eq!(castle_key(wk | bq), castle_key(wk) ^ castle_key(bq));
        assert_eq!(castle_key(CastleRights::NO_RIGHTS), 0);
    }
}
