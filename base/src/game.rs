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

//! Full chess games, including history and draw rules.

use super::{
    movegen::{get_moves, has_moves, is_legal, GenMode},
    Board, FenError, GameError, Move, Undo,
};

use nohash_hasher::IntMap;

use std::{
    default::Default,
    fmt::{Display, Formatter},
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// A struct containing game information, which unlike a `Board`, knows about
/// its history and can do things like repetition counting.
///
/// Moves are made and taken back on a single board in strict last-in,
/// first-out order.
pub struct Game {
    /// The current state of the board.
    board: Board,
    /// Every move made since the start of the game, paired with the
    /// information required to take it back. The last element is the most
    /// recent move.
    history: Vec<(Move, Undo)>,
    /// Stores the number of times a position has been reached in the course
    /// of this game. The keys are the Zobrist hashes of the boards previously
    /// visited, including the current one.
    repetitions: IntMap<u64, u8>,
}

impl Game {
    #[must_use]
    /// Construct a new `Game` in the conventional chess starting position.
    pub fn new() -> Game {
        Game::from_board(Board::default())
    }

    /// Construct a new `Game` using the Forsyth-Edwards notation description
    /// of its position. The half-move clock of the FEN is kept, so a game can
    /// start partway toward a fifty-move draw.
    ///
    /// # Errors
    ///
    /// This function will return an `Err` if the FEN string is invalid.
    pub fn from_fen(fen: &str) -> Result<Game, FenError> {
        Ok(Game::from_board(Board::from_fen(fen)?))
    }

    /// Construct a game whose history begins at `board`.
    fn from_board(board: Board) -> Game {
        Game {
            board,
            history: Vec::new(),
            repetitions: IntMap::from_iter([(board.hash, 1)]),
        }
    }

    /// Make a move, assuming said move is legal.
    ///
    /// It is recommended to only call `make_move` with moves that were
    /// already validated. Illegal moves leave the game in an unspecified
    /// (but memory-safe) state.
    pub fn make_move(&mut self, m: Move) {
        let undo = self.board.make_move(m);
        *self.repetitions.entry(self.board.hash).or_insert(0) += 1;
        self.history.push((m, undo));
    }

    /// Attempt to play a move, which may or may not be legal.
    ///
    /// # Errors
    ///
    /// This function will return an `Err` if `m` is illegal, in which case
    /// the game is unchanged.
    pub fn try_move(&mut self, m: Move) -> Result<(), GameError> {
        if is_legal(m, &self.board) {
            self.make_move(m);
            Ok(())
        } else {
            Err(GameError::IllegalMove(m))
        }
    }

    /// Undo the most recent move. The move inside the `Ok` variant will be
    /// the most recent move played.
    ///
    /// # Errors
    ///
    /// This function will return an `Err` if the history of this game has no
    /// more moves left to undo.
    pub fn undo(&mut self) -> Result<Move, GameError> {
        let (m, undo) = self.history.pop().ok_or(GameError::EmptyHistory)?;
        if let Some(num_reps) = self.repetitions.get_mut(&self.board.hash) {
            *num_reps -= 1;
            if *num_reps == 0 {
                self.repetitions.remove(&self.board.hash);
            }
        }
        self.board.unmake_move(m, undo);

        Ok(m)
    }

    #[inline(always)]
    #[must_use]
    /// Get the position representing the current state of the game.
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    /// Get the moves played so far, oldest first.
    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.history.iter().map(|&(m, _)| m)
    }

    #[must_use]
    /// Has the current position occurred at least three times in this game?
    pub fn drawn_by_repetition(&self) -> bool {
        self.repetitions.get(&self.board.hash).copied().unwrap_or(0) >= 3
    }

    #[must_use]
    /// Have fifty full moves passed without a capture or pawn move?
    pub fn drawn_by_fifty_moves(&self) -> bool {
        self.board.halfmove_clock >= 100
    }

    #[inline(always)]
    #[must_use]
    /// Has this game been drawn due to history (i.e. repetition or the
    /// fifty-move rule)?
    pub fn is_drawn_by_rule(&self) -> bool {
        self.drawn_by_fifty_moves() || self.drawn_by_repetition()
    }

    #[must_use]
    /// Detect how the game has ended.
    /// There are three possible return values:
    ///
    /// * `None`: the game is not over.
    /// * `Some(false)`: the game is over and is drawn.
    /// * `Some(true)`: the game is over by checkmate.
    pub fn end_state(&self) -> Option<bool> {
        if has_moves(&self.board) {
            return match self.is_drawn_by_rule() {
                true => Some(false),
                false => None,
            };
        }

        Some(self.board.is_king_checked())
    }

    #[must_use]
    /// Get the legal moves in this position, regardless of draws by rule.
    pub fn get_moves<const M: GenMode>(&self) -> Vec<Move> {
        get_moves::<M>(&self.board)
    }

    // no need for `is_empty` since a game always has a current position
    #[allow(clippy::len_without_is_empty)]
    #[must_use]
    /// Get the number of total positions in the history of this game.
    pub fn len(&self) -> usize {
        self.history.len() + 1
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

impl Display for Game {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for m in self.moves() {
            write!(f, "{m} ")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fens::*, movegen::ALL, Square};

    /// The knight shuffle which returns both sides to the starting position.
    const SHUFFLE: [Move; 4] = [
        Move::normal(Square::G1, Square::F3),
        Move::normal(Square::G8, Square::F6),
        Move::normal(Square::F3, Square::G1),
        Move::normal(Square::F6, Square::G8),
    ];

    #[test]
    /// Test that we can play a simple move on a `Game` and have the board
    /// states update accordingly.
    fn play_e4() {
        let mut g = Game::new();
        let m = Move::normal(Square::E2, Square::E4);
        let mut old_board = *g.board();
        g.make_move(m);

        old_board.make_move(m);
        assert_eq!(old_board, *g.board());
    }

    #[test]
    /// Test that undoing a move restores the game exactly.
    fn undo_equality() {
        let mut g = Game::new();
        let m0 = Move::normal(Square::E2, Square::E4);
        let m1 = Move::normal(Square::E7, Square::E5);
        g.make_move(m0);
        g.make_move(m1);
        assert_eq!(g.undo(), Ok(m1));
        assert_eq!(g.undo(), Ok(m0));
        assert_eq!(g, Game::new());
    }

    #[test]
    /// Test that undoing with no history results in an error.
    fn undo_fail() {
        let mut g = Game::new();
        assert_eq!(g.undo(), Err(GameError::EmptyHistory));
        assert_eq!(*g.board(), Board::default());
    }

    #[test]
    /// Test that undoing a move results in the previous position.
    fn undo_fried_liver() {
        let fen = "r1bq1b1r/ppp2kpp/2n5/3np3/2B5/8/PPPP1PPP/RNBQK2R w KQ - 0 7";
        let mut g = Game::from_fen(fen).unwrap();
        let m = Move::normal(Square::D1, Square::F3);
        g.make_move(m);
        assert_eq!(g.undo(), Ok(m));
        assert_eq!(g, Game::from_fen(fen).unwrap());
    }

    #[test]
    /// Test that illegal moves are refused without changing the game.
    fn try_illegal_move() {
        let mut g = Game::new();
        let m = Move::normal(Square::E2, Square::E5);
        assert_eq!(g.try_move(m), Err(GameError::IllegalMove(m)));
        assert_eq!(g, Game::new());
        assert!(g.try_move(Move::normal(Square::E2, Square::E4)).is_ok());
        assert_eq!(g.len(), 2);
    }

    #[test]
    /// Test that a mated position is in fact over.
    fn is_mate_over() {
        // the position from the end of Scholar's mate
        let g = Game::from_fen("rnbqk2r/pppp1Qpp/5n2/2b1p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4")
            .unwrap();
        assert!(g.get_moves::<ALL>().is_empty());
        assert_eq!(g.end_state(), Some(true));
    }

    #[test]
    fn startpos_not_over() {
        assert!(Game::default().end_state().is_none());
    }

    #[test]
    /// Test that making a mate found in testing results in the game being over.
    fn mate_in_1() {
        let mut g = Game::from_fen(MATE_IN_1_FEN).unwrap();
        let m = Move::normal(Square::B6, Square::B8);
        assert!(g.get_moves::<ALL>().contains(&m));
        g.make_move(m);
        assert_eq!(g.end_state(), Some(true));
    }

    #[test]
    /// Test that a repetition is flagged exactly on the third occurrence.
    fn threefold_repetition() {
        let mut g = Game::new();
        for m in SHUFFLE {
            g.make_move(m);
        }
        // the start position has now occurred twice
        assert!(!g.drawn_by_repetition());
        for m in &SHUFFLE[..3] {
            g.make_move(*m);
        }
        assert!(!g.drawn_by_repetition());
        g.make_move(SHUFFLE[3]);
        assert!(g.drawn_by_repetition());
        assert_eq!(g.end_state(), Some(false));

        // taking back the last move forgets the third occurrence
        g.undo().unwrap();
        g.undo().unwrap();
        g.make_move(SHUFFLE[2]);
        assert!(!g.drawn_by_repetition());
        g.make_move(SHUFFLE[3]);
        assert!(g.drawn_by_repetition());
    }

    #[test]
    /// Test that the fifty-move rule applies at a clock of 100 but not 99.
    fn fifty_move_rule() {
        let not_yet = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 99 80").unwrap();
        assert!(!not_yet.drawn_by_fifty_moves());
        assert!(!not_yet.is_drawn_by_rule());

        let drawn = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 100 80").unwrap();
        assert!(drawn.drawn_by_fifty_moves());
        assert_eq!(drawn.end_state(), Some(false));
    }

    #[test]
    /// Test that a stalemate is a draw rather than a mate.
    fn stalemate_is_drawn() {
        let g = Game::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(g.end_state(), Some(false));
    }

    #[test]
    fn display_history() {
        let mut g = Game::new();
        g.make_move(Move::normal(Square::E2, Square::E4));
        g.make_move(Move::normal(Square::C7, Square::C5));
        assert_eq!(g.to_string(), "e2e4 c7c5 ");
    }
}
