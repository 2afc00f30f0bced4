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

//! Generation and verification of legal moves in a position.
//!
//! Moves are first generated pseudo-legally, one piece at a time, from
//! precomputed step tables (knights, kings, pawn captures) and slider rays.
//! Each candidate is then made on a copy of the board and kept only if the
//! mover's king is not attacked afterward.

use super::{Bitboard, Board, Color, Direction, Move, Piece, Square};

use once_cell::sync::Lazy;

/// A generation mode for move generation.
pub type GenMode = u8;

/// Generate all legal moves.
pub const ALL: GenMode = 0;

/// Generate only captures and promotions.
pub const CAPTURES: GenMode = 1;

/// Generate only moves which are neither captures nor promotions.
pub const QUIETS: GenMode = 2;

/// A lookup table for the legal squares a knight can move to from a given
/// square on an empty board.
static KNIGHT_MOVES: Lazy<[Bitboard; 64]> =
    Lazy::new(|| create_step_attacks(&Direction::KNIGHT_STEPS, 2));

/// A lookup table for the legal squares a king can move to from a given
/// square on an empty board.
static KING_MOVES: Lazy<[Bitboard; 64]> =
    Lazy::new(|| create_step_attacks(&Direction::KING_STEPS, 1));

/// A lookup table for the squares that a pawn of each color attacks from a
/// given square. Indexed by color, then square.
static PAWN_ATTACKS: Lazy<[[Bitboard; 64]; 2]> = Lazy::new(|| {
    [
        create_step_attacks(&[Direction::NORTHEAST, Direction::NORTHWEST], 1),
        create_step_attacks(&[Direction::SOUTHEAST, Direction::SOUTHWEST], 1),
    ]
});

/// The directions of slider rays. The first four increase the square index
/// as they travel and the last four decrease it.
const RAY_DIRECTIONS: [Direction; 8] = [
    Direction::NORTH,
    Direction::EAST,
    Direction::NORTHEAST,
    Direction::NORTHWEST,
    Direction::SOUTH,
    Direction::WEST,
    Direction::SOUTHWEST,
    Direction::SOUTHEAST,
];

/// Indices into `RAY_DIRECTIONS` of the rook's directions.
const ROOK_RAYS: [usize; 4] = [0, 1, 4, 5];

/// Indices into `RAY_DIRECTIONS` of the bishop's directions.
const BISHOP_RAYS: [usize; 4] = [2, 3, 6, 7];

/// The squares reached by sliding from a square to the edge of an empty
/// board, excluding the starting square. Indexed by ray direction, then
/// square.
static RAYS: Lazy<[[Bitboard; 64]; 8]> = Lazy::new(|| {
    let mut rays = [[Bitboard::EMPTY; 64]; 8];
    for (dir_idx, &dir) in RAY_DIRECTIONS.iter().enumerate() {
        for sq in Bitboard::ALL {
            let mut current = sq;
            while dir.is_valid_step(current, 1) {
                current += dir;
                rays[dir_idx][sq as usize].insert(current);
            }
        }
    }
    rays
});

/// Get a table of the squares reachable from each square in one of the
/// given steps. `max_dist` is the maximum Chebyshev distance of one step.
fn create_step_attacks(dirs: &[Direction], max_dist: usize) -> [Bitboard; 64] {
    let mut attacks = [Bitboard::EMPTY; 64];
    for sq in Bitboard::ALL {
        for &dir in dirs {
            if dir.is_valid_step(sq, max_dist) {
                attacks[sq as usize].insert(sq + dir);
            }
        }
    }

    attacks
}

#[inline(always)]
/// Get the squares a slider on `sq` attacks along one ray, stopping at (and
/// including) the first occupied square.
fn ray_attacks(occupancy: Bitboard, sq: Square, dir_idx: usize) -> Bitboard {
    let ray = RAYS[dir_idx][sq as usize];
    let blockers = ray & occupancy;
    let nearest = match dir_idx < 4 {
        true => blockers.lowest(),
        false => blockers.highest(),
    };
    match nearest {
        None => ray,
        Some(blocker) => ray ^ RAYS[dir_idx][blocker as usize],
    }
}

#[must_use]
/// Get the squares a rook on `sq` attacks, given the occupied squares.
pub fn rook_attacks(occupancy: Bitboard, sq: Square) -> Bitboard {
    ROOK_RAYS
        .iter()
        .fold(Bitboard::EMPTY, |acc, &d| acc | ray_attacks(occupancy, sq, d))
}

#[must_use]
/// Get the squares a bishop on `sq` attacks, given the occupied squares.
pub fn bishop_attacks(occupancy: Bitboard, sq: Square) -> Bitboard {
    BISHOP_RAYS
        .iter()
        .fold(Bitboard::EMPTY, |acc, &d| acc | ray_attacks(occupancy, sq, d))
}

#[must_use]
/// Get the pieces of `color` which attack `sq`.
pub fn square_attackers(board: &Board, sq: Square, color: Color) -> Bitboard {
    let occupancy = board.occupancy();
    let queens = board[Piece::Queen];
    let rook_movers = board[Piece::Rook] | queens;
    let bishop_movers = board[Piece::Bishop] | queens;

    // a pawn of `color` attacks `sq` exactly when a pawn of the other color on
    // `sq` would attack it
    let attackers = (PAWN_ATTACKS[!color as usize][sq as usize] & board[Piece::Pawn])
        | (KNIGHT_MOVES[sq as usize] & board[Piece::Knight])
        | (KING_MOVES[sq as usize] & board[Piece::King])
        | (rook_attacks(occupancy, sq) & rook_movers)
        | (bishop_attacks(occupancy, sq) & bishop_movers);

    attackers & board[color]
}

#[inline(always)]
#[must_use]
/// Determine whether a square is attacked by the pieces of a given color.
pub fn is_square_attacked_by(board: &Board, sq: Square, color: Color) -> bool {
    !square_attackers(board, sq, color).is_empty()
}

#[must_use]
/// Get the legal moves in a position. The mode `M` selects all moves, only
/// captures and promotions, or only the remaining quiet moves.
pub fn get_moves<const M: GenMode>(b: &Board) -> Vec<Move> {
    let mut moves = Vec::with_capacity(match M {
        CAPTURES => 8,
        _ => 48,
    });
    for sq in b[b.player_to_move] {
        if let Some(pt) = b.type_at_square(sq) {
            append_pseudo_moves::<M>(b, sq, pt, &mut moves);
        }
    }
    moves.retain(|&m| is_safe(b, m));

    moves
}

#[must_use]
/// Determine whether the player to move has any legal move.
pub fn has_moves(b: &Board) -> bool {
    let mut candidates = Vec::with_capacity(28);
    for sq in b[b.player_to_move] {
        if let Some(pt) = b.type_at_square(sq) {
            candidates.clear();
            append_pseudo_moves::<ALL>(b, sq, pt, &mut candidates);
            if candidates.iter().any(|&m| is_safe(b, m)) {
                return true;
            }
        }
    }

    false
}

#[must_use]
/// Determine whether a move is legal in the given position. This is far
/// cheaper than generating every move, and is how moves from untrusted
/// sources (such as a hash table lookup) are checked.
pub fn is_legal(m: Move, b: &Board) -> bool {
    if m.is_null() {
        return false;
    }
    let from_sq = m.from_square();
    if b.color_at_square(from_sq) != Some(b.player_to_move) {
        return false;
    }
    let Some(pt) = b.type_at_square(from_sq) else {
        return false;
    };
    let mut candidates = Vec::with_capacity(28);
    append_pseudo_moves::<ALL>(b, from_sq, pt, &mut candidates);

    candidates.contains(&m) && is_safe(b, m)
}

/// Determine whether making a pseudo-legal move leaves the mover's king safe.
fn is_safe(b: &Board, m: Move) -> bool {
    let mover = b.player_to_move;
    let mut after = *b;
    after.make_move(m);
    match after.king_square(mover) {
        Some(king_sq) => !is_square_attacked_by(&after, king_sq, !mover),
        None => true,
    }
}

/// Append the pseudo-legal moves of the piece of type `pt` on `from_sq`,
/// which must belong to the player to move.
fn append_pseudo_moves<const M: GenMode>(
    b: &Board,
    from_sq: Square,
    pt: Piece,
    moves: &mut Vec<Move>,
) {
    let allies = b[b.player_to_move];
    let enemies = b[!b.player_to_move];
    let occupancy = allies | enemies;
    let targets = match M {
        CAPTURES => enemies,
        QUIETS => !occupancy,
        _ => !allies,
    };

    let attacks = match pt {
        Piece::Pawn => {
            append_pawn_moves::<M>(b, from_sq, moves);
            return;
        }
        Piece::King => {
            if M != CAPTURES {
                append_castles(b, moves);
            }
            KING_MOVES[from_sq as usize]
        }
        Piece::Knight => KNIGHT_MOVES[from_sq as usize],
        Piece::Bishop => bishop_attacks(occupancy, from_sq),
        Piece::Rook => rook_attacks(occupancy, from_sq),
        Piece::Queen => bishop_attacks(occupancy, from_sq) | rook_attacks(occupancy, from_sq),
    };

    moves.extend((attacks & targets).map(|to_sq| Move::normal(from_sq, to_sq)));
}

/// Append the pseudo-legal moves of the pawn on `from_sq`. Promotions are
/// treated as loud moves, like captures.
fn append_pawn_moves<const M: GenMode>(b: &Board, from_sq: Square, moves: &mut Vec<Move>) {
    let player = b.player_to_move;
    let occupancy = b.occupancy();
    let promote_rank = player.pawn_promote_rank();
    let dir = player.pawn_direction();

    let push_sq = from_sq + dir;
    if !occupancy.contains(push_sq) {
        if promote_rank.contains(push_sq) {
            if M != QUIETS {
                append_promotions(from_sq, push_sq, moves);
            }
        } else if M != CAPTURES {
            moves.push(Move::normal(from_sq, push_sq));
            let double_sq = push_sq + dir;
            if player.pawn_start_rank().contains(from_sq) && !occupancy.contains(double_sq) {
                moves.push(Move::normal(from_sq, double_sq));
            }
        }
    }

    if M == QUIETS {
        return;
    }
    let ep_mask = b.en_passant_square.map_or(Bitboard::EMPTY, Bitboard::from);
    let capture_targets = PAWN_ATTACKS[player as usize][from_sq as usize] & (b[!player] | ep_mask);
    for to_sq in capture_targets {
        if promote_rank.contains(to_sq) {
            append_promotions(from_sq, to_sq, moves);
        } else {
            moves.push(Move::normal(from_sq, to_sq));
        }
    }
}

/// Append every promotion of a pawn moving from `from_sq` to `to_sq`.
fn append_promotions(from_sq: Square, to_sq: Square, moves: &mut Vec<Move>) {
    for pt in Piece::PROMOTE_TYPES {
        moves.push(Move::promoting(from_sq, to_sq, pt));
    }
}

/// Append the castling moves available to the player to move. The king may
/// not castle out of check or through an attacked square; landing in check
/// is caught by the ordinary safety test.
fn append_castles(b: &Board, moves: &mut Vec<Move>) {
    let player = b.player_to_move;
    let (king_sq, kingside, queenside) = match player {
        Color::White => (
            Square::E1,
            (Square::G1, Square::F1, Bitboard::new(0x60)),
            (Square::C1, Square::D1, Bitboard::new(0x0E)),
        ),
        Color::Black => (
            Square::E8,
            (Square::G8, Square::F8, Bitboard::new(0x60 << 56)),
            (Square::C8, Square::D8, Bitboard::new(0x0E << 56)),
        ),
    };
    if b.king_square(player) != Some(king_sq) {
        return;
    }
    let rights = b.castle_rights;
    let can_castle = [
        rights.is_kingside_castle_legal(player),
        rights.is_queenside_castle_legal(player),
    ];
    if !can_castle.contains(&true) || b.is_king_checked() {
        return;
    }

    let occupancy = b.occupancy();
    for (allowed, (to_sq, passed_sq, between)) in can_castle.into_iter().zip([kingside, queenside]) {
        if allowed
            && (occupancy & between).is_empty()
            && !is_square_attacked_by(b, passed_sq, !player)
        {
            moves.push(Move::normal(king_sq, to_sq));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fens::*;

    /// Sort and compare two move lists.
    fn assert_same_moves(mut found: Vec<Move>, mut expected: Vec<Move>) {
        let key = |m: &Move| m.to_uci();
        found.sort_by_key(key);
        expected.sort_by_key(key);
        assert_eq!(found, expected);
    }

    #[test]
    /// Test that the start position has exactly the twenty opening moves.
    fn test_opening_moveset() {
        let b = Board::default();
        let moves = get_moves::<ALL>(&b);
        assert_eq!(moves.len(), 20);
        assert!(moves.contains(&Move::normal(Square::E2, Square::E4)));
        assert!(moves.contains(&Move::normal(Square::G1, Square::F3)));
        assert!(get_moves::<CAPTURES>(&b).is_empty());
        assert_eq!(get_moves::<QUIETS>(&b).len(), 20);
    }

    #[test]
    /// Test that captures and quiets partition the full move list.
    fn test_modes_partition() {
        let b = Board::from_fen(KIWIPETE_FEN).unwrap();
        let all = get_moves::<ALL>(&b);
        let captures = get_moves::<CAPTURES>(&b);
        let quiets = get_moves::<QUIETS>(&b);
        assert_eq!(all.len(), 48);
        assert_eq!(captures.len() + quiets.len(), all.len());
        assert!(captures.iter().all(|&m| b.is_move_capture(m) || m.promote_type().is_some()));
        let mut joined = captures;
        joined.extend(quiets);
        assert_same_moves(joined, all);
    }

    #[test]
    /// Test that a pinned piece may only move along its pin.
    fn test_pinned_rook() {
        let b = Board::from_fen("4k3/4r3/8/8/8/8/4R3/4K3 w - - 0 1").unwrap();
        let rook_moves: Vec<Move> = get_moves::<ALL>(&b)
            .into_iter()
            .filter(|m| m.from_square() == Square::E2)
            .collect();
        assert_eq!(rook_moves.len(), 5);
        assert!(rook_moves.iter().all(|m| m.to_square().file() == 4));
    }

    #[test]
    /// Test that castling is forbidden out of check and through attacked
    /// squares.
    fn test_castle_restrictions() {
        let castle = Move::normal(Square::E1, Square::G1);
        let long_castle = Move::normal(Square::E1, Square::C1);

        let free = Board::from_fen("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(is_legal(castle, &free));
        assert!(is_legal(long_castle, &free));

        let through_f1 = Board::from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(!is_legal(castle, &through_f1));
        assert!(is_legal(long_castle, &through_f1));

        let in_check = Board::from_fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(!is_legal(castle, &in_check));
        assert!(!is_legal(long_castle, &in_check));

        // b1 may be attacked, since the king does not cross it
        let b1_attacked = Board::from_fen("1r2k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(is_legal(long_castle, &b1_attacked));
    }

    #[test]
    /// Test that en passant is generated, and refused when it would expose
    /// the king along the rank.
    fn test_en_passant_generation() {
        let b = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
        assert!(is_legal(Move::normal(Square::E5, Square::D6), &b));

        let pinned = Board::from_fen("8/8/8/K2pP2r/8/8/8/4k3 w - d6 0 2").unwrap();
        assert!(!is_legal(Move::normal(Square::E5, Square::D6), &pinned));
    }

    #[test]
    /// Test that a pawn on the seventh rank generates all four promotions.
    fn test_promotions() {
        let b = Board::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
        let promotions: Vec<Move> = get_moves::<CAPTURES>(&b);
        assert_same_moves(
            promotions,
            Piece::PROMOTE_TYPES
                .iter()
                .map(|&pt| Move::promoting(Square::E7, Square::E8, pt))
                .collect(),
        );
    }

    #[test]
    /// Test that checkmate and stalemate positions have no moves.
    fn test_no_moves() {
        // fool's mate
        let mated = Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .unwrap();
        assert!(!has_moves(&mated));
        assert!(mated.is_king_checked());

        let stalemate = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(!has_moves(&stalemate));
        assert!(!stalemate.is_king_checked());
        assert!(get_moves::<ALL>(&stalemate).is_empty());
    }

    #[test]
    /// Test that moves from bad sources are not legal.
    fn test_is_legal_rejects() {
        let b = Board::default();
        assert!(!is_legal(Move::NULL, &b));
        // black piece on white's turn
        assert!(!is_legal(Move::normal(Square::E7, Square::E5), &b));
        // blocked by own pawn
        assert!(!is_legal(Move::normal(Square::F1, Square::C4), &b));
        // empty square
        assert!(!is_legal(Move::normal(Square::E4, Square::E5), &b));
    }

    #[test]
    fn test_attackers() {
        let b = Board::from_fen(KIWIPETE_FEN).unwrap();
        let attackers = square_attackers(&b, Square::F7, Color::White);
        assert_eq!(attackers, Bitboard::from(Square::E5));
        assert!(is_square_attacked_by(&b, Square::E6, Color::White));
        assert!(!is_square_attacked_by(&b, Square::A8, Color::White));
    }
}
