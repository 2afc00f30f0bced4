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

//! State representations of boards, which contain board state (such as piece
//! positions and move clocks), but no history.

use super::{
    movegen::is_square_attacked_by, zobrist, Bitboard, CastleRights, Color, Direction, FenError,
    Move, Piece, Square,
};

use std::{
    default::Default,
    fmt::{Display, Formatter},
    ops::Index,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// A representation of a position. Does not handle repetition, which needs
/// the history kept by a `Game`.
pub struct Board {
    /// The squares occupied by White and Black, respectively.
    sides: [Bitboard; 2],
    /// The squares occupied by (in order) knights, bishops, rooks,
    /// queens, pawns, and kings.
    pieces: [Bitboard; Piece::NUM_TYPES],
    /// The color of the player to move.
    pub player_to_move: Color,
    /// The square which can be moved to by a pawn in en passant. Will be
    /// `None` when a pawn has not moved two squares in the previous move.
    pub en_passant_square: Option<Square>,
    /// The rights of each player for castling.
    pub castle_rights: CastleRights,
    /// The number of plies since the last capture or pawn move.
    pub halfmove_clock: u16,
    /// The number of the full move, starting at 1 and incremented after each
    /// move by Black.
    pub fullmove_number: u16,
    /// A saved internal hash. If the board is valid, this value must ALWAYS
    /// be equal to the output of `zobrist::hash`.
    pub hash: u64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Everything needed to take back a move, returned by `Board::make_move` and
/// consumed by `Board::unmake_move`.
pub struct Undo {
    /// The type of the piece captured by the move, if any.
    capturee: Option<Piece>,
    castle_rights: CastleRights,
    en_passant_square: Option<Square>,
    halfmove_clock: u16,
    hash: u64,
}

impl Board {
    /// Create an empty board with no pieces or castle rights.
    fn empty() -> Board {
        Board {
            sides: [Bitboard::EMPTY; 2],
            pieces: [Bitboard::EMPTY; Piece::NUM_TYPES],
            player_to_move: Color::White,
            en_passant_square: None,
            castle_rights: CastleRights::NO_RIGHTS,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
        }
    }

    /// Create a Board populated from some FEN and load it. The two move clock
    /// fields are optional and default to 0 and 1.
    ///
    /// Castling rights whose king or rook is not on its home square are
    /// dropped.
    ///
    /// # Errors
    ///
    /// This function will return an `Err` if the FEN string is malformed or
    /// describes an illegal position.
    pub fn from_fen(fen: &str) -> Result<Board, FenError> {
        let mut board = Board::empty();
        let mut fields = fen.split_whitespace();

        let placement = fields.next().ok_or(FenError::MissingField("piece placement"))?;
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::RankCount(ranks.len()));
        }
        for (idx, rank_str) in ranks.iter().enumerate() {
            // FEN lists rank 8 first
            let rank = 7 - idx;
            let mut file = 0;
            for c in rank_str.chars() {
                if let Some(n) = c.to_digit(10).filter(|n| (1..=8).contains(n)) {
                    file += n as usize;
                } else {
                    let pt = Piece::from_code(c.to_ascii_uppercase()).ok_or(FenError::Placement(c))?;
                    let color = match c.is_uppercase() {
                        true => Color::White,
                        false => Color::Black,
                    };
                    let sq = Square::new(rank, file).ok_or(FenError::RankLength(rank + 1))?;
                    board.toggle_piece(sq, pt, color);
                    file += 1;
                }
                if file > 8 {
                    return Err(FenError::RankLength(rank + 1));
                }
            }
            if file != 8 {
                return Err(FenError::RankLength(rank + 1));
            }
        }

        board.player_to_move = match fields.next().ok_or(FenError::MissingField("side to move"))? {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        let castling = fields.next().ok_or(FenError::MissingField("castling"))?;
        if castling != "-" {
            for c in castling.chars() {
                board.castle_rights |= match c {
                    'K' => CastleRights::king_castle(Color::White),
                    'Q' => CastleRights::queen_castle(Color::White),
                    'k' => CastleRights::king_castle(Color::Black),
                    'q' => CastleRights::queen_castle(Color::Black),
                    _ => return Err(FenError::Castling(castling.to_string())),
                };
            }
        }
        board.castle_rights &= board.supported_castle_rights();

        board.en_passant_square = match fields.next().ok_or(FenError::MissingField("en passant"))? {
            "-" => None,
            sq => Some(Square::from_algebraic(sq)?),
        };

        if let Some(clock) = fields.next() {
            board.halfmove_clock = clock.parse().map_err(|_| FenError::Clock(clock.to_string()))?;
        }
        if let Some(number) = fields.next() {
            board.fullmove_number = number
                .parse()
                .map_err(|_| FenError::Clock(number.to_string()))?;
        }

        board.validate()?;
        board.hash = zobrist::hash(&board);

        Ok(board)
    }

    /// Get the castle rights which the current placement of kings and rooks
    /// could support.
    fn supported_castle_rights(&self) -> CastleRights {
        let mut rights = CastleRights::NO_RIGHTS;
        for (color, king_sq, kingside_rook, queenside_rook) in [
            (Color::White, Square::E1, Square::H1, Square::A1),
            (Color::Black, Square::E8, Square::H8, Square::A8),
        ] {
            let kings = self[Piece::King] & self[color];
            let rooks = self[Piece::Rook] & self[color];
            if !kings.contains(king_sq) {
                continue;
            }
            if rooks.contains(kingside_rook) {
                rights |= CastleRights::king_castle(color);
            }
            if rooks.contains(queenside_rook) {
                rights |= CastleRights::queen_castle(color);
            }
        }

        rights
    }

    /// Check that this board describes a position which could occur in a game.
    fn validate(&self) -> Result<(), FenError> {
        for color in [Color::White, Color::Black] {
            if (self[Piece::King] & self[color]).len() != 1 {
                return Err(FenError::Illegal("each side must have exactly one king"));
            }
        }
        let back_ranks = Color::White.pawn_promote_rank() | Color::Black.pawn_promote_rank();
        if !(self[Piece::Pawn] & back_ranks).is_empty() {
            return Err(FenError::Illegal("pawns cannot stand on the first or last rank"));
        }
        let waiting = !self.player_to_move;
        if let Some(ep_sq) = self.en_passant_square {
            // the pawn which just moved two squares passed over the target
            let (ep_rank, forward) = match self.player_to_move {
                Color::White => (5, Direction::NORTH),
                Color::Black => (2, Direction::SOUTH),
            };
            let occupancy = self.occupancy();
            let pushed_pawn = self[Piece::Pawn] & self[waiting];
            if ep_sq.rank() != ep_rank
                || occupancy.contains(ep_sq)
                || occupancy.contains(ep_sq + forward)
                || !pushed_pawn.contains(ep_sq + -forward)
            {
                return Err(FenError::Illegal("en passant square has no pawn which just pushed"));
            }
        }
        if let Some(king_sq) = self.king_square(waiting) {
            if is_square_attacked_by(self, king_sq, self.player_to_move) {
                return Err(FenError::Illegal("the side not to move is in check"));
            }
        }

        Ok(())
    }

    #[inline(always)]
    #[must_use]
    /// Get the squares occupied by pieces.
    pub fn occupancy(&self) -> Bitboard {
        self.sides[0] | self.sides[1]
    }

    #[must_use]
    /// Get the type of the piece occupying a given square.
    /// Returns `None` if there are no pieces occupying the square.
    pub fn type_at_square(&self, sq: Square) -> Option<Piece> {
        if !self.occupancy().contains(sq) {
            return None;
        }
        Piece::ALL_TYPES
            .into_iter()
            .find(|&pt| self.pieces[pt as usize].contains(sq))
    }

    #[must_use]
    /// Get the color of a piece occupying a current square.
    /// Returns `None` if there are no pieces occupying the square.
    pub fn color_at_square(&self, sq: Square) -> Option<Color> {
        if self[Color::White].contains(sq) {
            Some(Color::White)
        } else if self[Color::Black].contains(sq) {
            Some(Color::Black)
        } else {
            None
        }
    }

    #[inline(always)]
    #[must_use]
    /// Get the square of the king of the given color.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        (self[Piece::King] & self[color]).lowest()
    }

    #[must_use]
    /// Is the given move a capture in the current state of the board?
    /// En passant captures count.
    pub fn is_move_capture(&self, m: Move) -> bool {
        self[!self.player_to_move].contains(m.to_square()) || self.is_en_passant(m)
    }

    #[inline(always)]
    fn is_en_passant(&self, m: Move) -> bool {
        self.en_passant_square == Some(m.to_square())
            && m.from_square().file() != m.to_square().file()
            && self[Piece::Pawn].contains(m.from_square())
    }

    #[must_use]
    /// Is the king of the player to move in check?
    pub fn is_king_checked(&self) -> bool {
        self.king_square(self.player_to_move)
            .is_some_and(|sq| is_square_attacked_by(self, sq, !self.player_to_move))
    }

    /// Apply the given move to the board, returning the information needed to
    /// take it back. Requires that `m` is legal in this position; the returned
    /// `Undo` must be passed to `unmake_move` with the same move before any
    /// other move is taken back.
    pub fn make_move(&mut self, m: Move) -> Undo {
        let from_sq = m.from_square();
        let to_sq = m.to_square();
        let mover = self.player_to_move;
        let is_ep = self.is_en_passant(m);
        let capturee = match is_ep {
            true => Some(Piece::Pawn),
            false => self.type_at_square(to_sq),
        };
        let undo = Undo {
            capturee,
            castle_rights: self.castle_rights,
            en_passant_square: self.en_passant_square,
            halfmove_clock: self.halfmove_clock,
            hash: self.hash,
        };

        debug_assert!(
            self.color_at_square(from_sq) == Some(mover),
            "no piece of the player to move on {from_sq} for {m}"
        );
        let mover_type = self.type_at_square(from_sq).unwrap_or(Piece::Pawn);

        if let Some(ep_sq) = self.en_passant_square.take() {
            self.hash ^= zobrist::ep_key(ep_sq);
        }

        if let Some(victim) = capturee {
            let capture_sq = match is_ep {
                // the captured pawn sits beside the mover, not on the target
                true => Square::new(from_sq.rank(), to_sq.file()).unwrap_or(to_sq),
                false => to_sq,
            };
            self.toggle_piece(capture_sq, victim, !mover);
        }

        self.toggle_piece(from_sq, mover_type, mover);
        self.toggle_piece(to_sq, m.promote_type().unwrap_or(mover_type), mover);

        if mover_type == Piece::King && from_sq.chebyshev_to(to_sq) == 2 {
            if let Some((rook_from, rook_to)) = castle_rook_squares(to_sq) {
                self.toggle_piece(rook_from, Piece::Rook, mover);
                self.toggle_piece(rook_to, Piece::Rook, mover);
            }
        }

        if mover_type == Piece::Pawn && from_sq.rank().abs_diff(to_sq.rank()) == 2 {
            let ep_sq = Square::new((from_sq.rank() + to_sq.rank()) / 2, from_sq.file());
            if let Some(ep_sq) = ep_sq {
                self.en_passant_square = Some(ep_sq);
                self.hash ^= zobrist::ep_key(ep_sq);
            }
        }

        let lost_rights = CastleRights::lost_by_touching(from_sq) | CastleRights::lost_by_touching(to_sq);
        if self.castle_rights & lost_rights != CastleRights::NO_RIGHTS {
            self.hash ^= zobrist::castle_key(self.castle_rights);
            self.castle_rights &= !lost_rights;
            self.hash ^= zobrist::castle_key(self.castle_rights);
        }

        if mover_type == Piece::Pawn || capturee.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if mover == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }

        self.player_to_move = !mover;
        self.hash ^= zobrist::black_to_move_key();

        debug_assert_eq!(self.hash, zobrist::hash(self));
        undo
    }

    /// Take back a move previously applied by `make_move`, restoring piece
    /// placement, castling rights, the en passant target, move clocks, and
    /// the hash.
    pub fn unmake_move(&mut self, m: Move, undo: Undo) {
        let from_sq = m.from_square();
        let to_sq = m.to_square();
        let mover = !self.player_to_move;
        self.player_to_move = mover;
        if mover == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_sub(1);
        }

        let landed_type = self.type_at_square(to_sq).unwrap_or(Piece::Pawn);
        let mover_type = match m.promote_type() {
            Some(_) => Piece::Pawn,
            None => landed_type,
        };
        self.toggle_piece(to_sq, landed_type, mover);
        self.toggle_piece(from_sq, mover_type, mover);

        if mover_type == Piece::King && from_sq.chebyshev_to(to_sq) == 2 {
            if let Some((rook_from, rook_to)) = castle_rook_squares(to_sq) {
                self.toggle_piece(rook_to, Piece::Rook, mover);
                self.toggle_piece(rook_from, Piece::Rook, mover);
            }
        }

        if let Some(victim) = undo.capturee {
            let was_ep = mover_type == Piece::Pawn
                && undo.en_passant_square == Some(to_sq)
                && from_sq.file() != to_sq.file();
            let capture_sq = match was_ep {
                true => Square::new(from_sq.rank(), to_sq.file()).unwrap_or(to_sq),
                false => to_sq,
            };
            self.toggle_piece(capture_sq, victim, !mover);
        }

        self.castle_rights = undo.castle_rights;
        self.en_passant_square = undo.en_passant_square;
        self.halfmove_clock = undo.halfmove_clock;
        self.hash = undo.hash;
    }

    #[inline(always)]
    /// Flip the presence of a piece of the given type and color on `sq`,
    /// updating the hash to match.
    fn toggle_piece(&mut self, sq: Square, pt: Piece, color: Color) {
        let mask = Bitboard::from(sq);
        self.pieces[pt as usize] ^= mask;
        self.sides[color as usize] ^= mask;
        self.hash ^= zobrist::square_key(sq, pt, color);
    }

    /// Set the player to move, clearing the en passant target if the turn
    /// changes hands. The hash is kept consistent. This produces a position
    /// which may not be reachable, and is meant for evaluation terms which
    /// inspect the options of both players.
    pub fn with_player_to_move(&self, color: Color) -> Board {
        let mut b = *self;
        if b.player_to_move != color {
            if let Some(ep_sq) = b.en_passant_square.take() {
                b.hash ^= zobrist::ep_key(ep_sq);
            }
            b.player_to_move = color;
            b.hash ^= zobrist::black_to_move_key();
        }
        b
    }
}

/// Get the from- and to-squares of the rook which moves when the king castles
/// to `king_to`.
const fn castle_rook_squares(king_to: Square) -> Option<(Square, Square)> {
    match king_to {
        Square::G1 => Some((Square::H1, Square::F1)),
        Square::C1 => Some((Square::A1, Square::D1)),
        Square::G8 => Some((Square::H8, Square::F8)),
        Square::C8 => Some((Square::A8, Square::D8)),
        _ => None,
    }
}

impl Display for Board {
    /// Display the board as a grid, with rank 8 at the top. White pieces are
    /// uppercase and Black pieces lowercase.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for rank in (0..8).rev() {
            for file in 0..8 {
                let Some(sq) = Square::new(rank, file) else {
                    continue;
                };
                let c = match (self.type_at_square(sq), self.color_at_square(sq)) {
                    (Some(pt), Some(Color::White)) => pt.code(),
                    (Some(pt), Some(Color::Black)) => pt.code().to_ascii_lowercase(),
                    _ => '.',
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Index<Piece> for Board {
    type Output = Bitboard;

    #[inline(always)]
    /// Get the squares occupied by the given piece type.
    fn index(&self, index: Piece) -> &Self::Output {
        &self.pieces[index as usize]
    }
}

impl Index<Color> for Board {
    type Output = Bitboard;

    #[inline(always)]
    /// Get the squares occupied by the pieces of a color.
    fn index(&self, index: Color) -> &Self::Output {
        &self.sides[index as usize]
    }
}

impl Default for Board {
    /// The standard starting position.
    fn default() -> Board {
        let mut board = Board {
            sides: [
                Bitboard::new(0x0000_0000_0000_FFFF),
                Bitboard::new(0xFFFF_0000_0000_0000),
            ],
            pieces: [
                Bitboard::new(0x4200_0000_0000_0042), // knights
                Bitboard::new(0x2400_0000_0000_0024), // bishops
                Bitboard::new(0x8100_0000_0000_0081), // rooks
                Bitboard::new(0x0800_0000_0000_0008), // queens
                Bitboard::new(0x00FF_0000_0000_FF00), // pawns
                Bitboard::new(0x1000_0000_0000_0010), // kings
            ],
            castle_rights: CastleRights::ALL_RIGHTS,
            ..Board::empty()
        };
        board.hash = zobrist::hash(&board);
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fens::*;

    #[test]
    /// Test that the default board is the start position.
    fn test_start_fen() {
        assert_eq!(Board::from_fen(START_FEN), Ok(Board::default()));
    }

    #[test]
    /// Test that a board with only two kings is loaded correctly.
    fn test_load_two_kings_fen() {
        let b = Board::from_fen("8/8/8/4k3/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(b.type_at_square(Square::E1), Some(Piece::King));
        assert_eq!(b.color_at_square(Square::E5), Some(Color::Black));
        assert_eq!(b.occupancy().len(), 2);
    }

    #[test]
    /// Test that the move clocks are read off the FEN, and default when
    /// absent.
    fn test_fen_clocks() {
        let b = Board::from_fen("8/8/8/4k3/8/8/8/4K3 b - - 37 80").unwrap();
        assert_eq!(b.halfmove_clock, 37);
        assert_eq!(b.fullmove_number, 80);
        let b = Board::from_fen("8/8/8/4k3/8/8/8/4K3 b - -").unwrap();
        assert_eq!(b.halfmove_clock, 0);
        assert_eq!(b.fullmove_number, 1);
    }

    #[test]
    /// Test that malformed FENs are rejected with a description of the fault.
    fn test_bad_fens() {
        assert_eq!(Board::from_fen(""), Err(FenError::MissingField("piece placement")));
        assert_eq!(
            Board::from_fen("8/8/8/4k3/8/8/4K3 w - - 0 1"),
            Err(FenError::RankCount(7))
        );
        assert_eq!(
            Board::from_fen("8/8/8/4k3/8/8/8/4K4 w - - 0 1"),
            Err(FenError::RankLength(1))
        );
        assert_eq!(
            Board::from_fen("8/8/8/4k3/8/8/8/4X3 w - - 0 1"),
            Err(FenError::Placement('X'))
        );
        assert_eq!(
            Board::from_fen("8/8/8/4k3/8/8/8/4K3 x - - 0 1"),
            Err(FenError::SideToMove("x".into()))
        );
        assert!(matches!(
            Board::from_fen("8/8/8/4k3/8/8/8/4K3 w - z9 0 1"),
            Err(FenError::EnPassant(_))
        ));
        assert!(matches!(
            Board::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenError::Illegal(_))
        ));
        // black is in check but it is white's turn
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/4R1K1 w - - 0 1"),
            Err(FenError::Illegal(_))
        ));
    }

    #[test]
    /// Test that an en passant square is only accepted behind a pawn which
    /// could have just moved two squares.
    fn test_en_passant_square_checked() {
        let b = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
        assert_eq!(b.en_passant_square, Some(Square::D6));
        let b = Board::from_fen("4k3/8/8/8/3Pp3/8/8/4K3 b - d3 0 1").unwrap();
        assert_eq!(b.en_passant_square, Some(Square::D3));

        for fen in [
            // no pawn in front of the target
            "4k3/8/8/4P3/8/8/8/4K3 w - d6 0 1",
            // wrong rank for the side to move
            "4k3/8/8/3pP3/8/8/8/4K3 w - e4 0 1",
            "4k3/8/8/3pP3/8/8/8/4K3 w - d3 0 1",
            // the pawn is our own
            "4k3/8/8/3PP3/8/8/8/4K3 w - d6 0 1",
            // the target is occupied
            "4k3/8/3n4/3pP3/8/8/8/4K3 w - d6 0 1",
            // the square the pawn came from is occupied
            "4k3/3n4/8/3pP3/8/8/8/4K3 w - d6 0 1",
        ] {
            assert!(
                matches!(Board::from_fen(fen), Err(FenError::Illegal(_))),
                "{fen} should be rejected"
            );
        }
    }

    #[test]
    /// Test that castle rights without a king or rook at home are dropped.
    fn test_unsupported_castle_rights() {
        let b = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w KQkq - 0 1").unwrap();
        assert_eq!(b.castle_rights, CastleRights::king_castle(Color::White));
    }

    #[test]
    /// Test that we can play e4 on the first move of the game.
    fn test_play_e4() {
        let mut b = Board::default();
        let m = Move::normal(Square::E2, Square::E4);
        let undo = b.make_move(m);
        assert_eq!(b.type_at_square(Square::E4), Some(Piece::Pawn));
        assert_eq!(b.type_at_square(Square::E2), None);
        assert_eq!(b.en_passant_square, Some(Square::E3));
        assert_eq!(b.player_to_move, Color::Black);
        assert_eq!(b.hash, zobrist::hash(&b));
        b.unmake_move(m, undo);
        assert_eq!(b, Board::default());
    }

    #[test]
    /// Test that en passant removes the captured pawn, and that taking it
    /// back restores it.
    fn test_en_passant() {
        test_fen_helper(
            "rnbqkbnr/ppppp1pp/8/4Pp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
            Move::normal(Square::E5, Square::F6),
            |b| {
                assert_eq!(b.type_at_square(Square::F5), None);
                assert_eq!(b.type_at_square(Square::F6), Some(Piece::Pawn));
                assert_eq!(b.halfmove_clock, 0);
            },
        );
    }

    #[test]
    /// Test that White can castle kingside.
    fn test_white_kingside_castle() {
        test_fen_helper(
            "r1bqk1nr/pppp1ppp/2n5/2b1p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4",
            Move::normal(Square::E1, Square::G1),
            |b| {
                assert_eq!(b.type_at_square(Square::G1), Some(Piece::King));
                assert_eq!(b.type_at_square(Square::F1), Some(Piece::Rook));
                assert_eq!(b.type_at_square(Square::H1), None);
                assert!(!b.castle_rights.is_kingside_castle_legal(Color::White));
                assert!(b.castle_rights.is_kingside_castle_legal(Color::Black));
                assert_eq!(b.halfmove_clock, 5);
            },
        );
    }

    #[test]
    /// Test that Black can castle queenside.
    fn test_black_queenside_castle() {
        test_fen_helper(
            "r3kbnr/pppqpppp/2n5/3p1b2/3P1B2/2N5/PPPQPPPP/R3KBNR b KQkq - 7 5",
            Move::normal(Square::E8, Square::C8),
            |b| {
                assert_eq!(b.type_at_square(Square::C8), Some(Piece::King));
                assert_eq!(b.type_at_square(Square::D8), Some(Piece::Rook));
                assert_eq!(b.type_at_square(Square::A8), None);
                assert_eq!(b.fullmove_number, 6);
            },
        );
    }

    #[test]
    /// Test that a pawn promotes to a queen, and un-promotes on unmake.
    fn test_white_promote_queen() {
        test_fen_helper(
            "8/1P5k/8/8/8/8/8/4K3 w - - 0 1",
            Move::promoting(Square::B7, Square::B8, Piece::Queen),
            |b| {
                assert_eq!(b.type_at_square(Square::B8), Some(Piece::Queen));
                assert_eq!(b.type_at_square(Square::B7), None);
            },
        );
    }

    #[test]
    /// Test that capturing a rook on its home square removes the victim's
    /// castle right.
    fn test_no_castle_after_capture() {
        test_fen_helper(
            "rnbqk2r/ppppnp1p/4p1p1/8/8/1P6/PBPPPPPP/RN1QKBNR w KQkq - 0 4",
            Move::normal(Square::B2, Square::H8),
            |b| {
                assert!(!b.castle_rights.is_kingside_castle_legal(Color::Black));
                assert!(b.castle_rights.is_queenside_castle_legal(Color::Black));
                assert!(b.castle_rights.is_kingside_castle_legal(Color::White));
            },
        );
    }

    #[test]
    /// Test that the check detector sees a check by a slider.
    fn test_is_king_checked() {
        let b = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 b - - 0 1").unwrap();
        assert!(!b.is_king_checked());
        let b = Board::from_fen("4k3/8/8/8/8/8/8/4K2R b - - 0 1").unwrap();
        assert!(!b.is_king_checked());
        let b = Board::from_fen("4k3/8/8/8/8/8/8/4RK2 b - - 0 1").unwrap();
        assert!(b.is_king_checked());
    }

    /// Load `fen`, make `m`, run `check` on the result, and then verify that
    /// unmaking the move restores the original board exactly.
    pub fn test_fen_helper(fen: &str, m: Move, check: impl Fn(&Board)) {
        let original = Board::from_fen(fen).unwrap();
        let mut b = original;
        let undo = b.make_move(m);
        assert_eq!(b.hash, zobrist::hash(&b));
        check(&b);
        b.unmake_move(m, undo);
        assert_eq!(b, original);
    }
}
