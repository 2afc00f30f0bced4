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

//! Move ordering.
//!
//! A `MovePicker` hands out the legal moves of a position one at a time, in
//! the order most likely to produce an early cutoff: the move remembered by
//! the transposition table, then captures and promotions with the most
//! valuable victims and least valuable attackers first, then quiet moves.
//! Moves are only generated once the earlier phases run dry.

use std::mem::swap;

use zugzwang_base::{
    movegen::{get_moves, is_legal, CAPTURES, QUIETS},
    Board, Move, Piece,
};

/// The values of pieces for ordering captures, indexed by `Piece as usize`.
const ORDER_VALUES: [i16; Piece::NUM_TYPES] = [320, 330, 500, 900, 100, 2000];

#[derive(Clone, Debug)]
/// A structure which picks the moves of a position in a good search order.
pub struct MovePicker {
    /// The position for which moves are being picked.
    board: Board,
    /// The upcoming phase of move selection.
    phase: PickPhase,
    /// The move retrieved from the transposition table, which will be
    /// returned first if it is legal.
    transposition_move: Option<Move>,
    /// The legal captures and promotions, paired with their order scores.
    capture_buffer: Vec<(Move, i16)>,
    /// The index in the capture buffer of the next capture to give.
    capture_index: usize,
    /// The legal quiet moves.
    quiet_buffer: Vec<Move>,
    /// The index in the quiet buffer of the next quiet move to give.
    quiet_index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// The current phase of move selection.
enum PickPhase {
    /// Pick the move from the transposition table next.
    Transposition,
    /// Prior to picking captures, so captures must be generated.
    PreCapture,
    /// Pick captures, which have already been generated.
    Capture,
    /// Prior to picking quiet moves, so quiet moves must be generated.
    PreQuiet,
    /// Pick quiet moves.
    Quiet,
}

impl MovePicker {
    #[must_use]
    /// Construct a `MovePicker` for a given position. The transposition move
    /// may come from a hash collision, so it is checked for legality before
    /// being given out.
    pub fn new(board: Board, transposition_move: Option<Move>) -> MovePicker {
        MovePicker {
            board,
            phase: PickPhase::Transposition,
            transposition_move: transposition_move.filter(|&m| is_legal(m, &board)),
            capture_buffer: Vec::new(),
            capture_index: 0,
            quiet_buffer: Vec::new(),
            quiet_index: 0,
        }
    }

    #[inline(always)]
    /// Was `m` already given out as the transposition move?
    fn was_given(&self, m: Move) -> bool {
        self.transposition_move == Some(m)
    }
}

/// Get the ordering score of a capture or promotion: most valuable victim
/// first, with the least valuable attacker breaking ties.
fn mvv_lva(b: &Board, m: Move) -> i16 {
    let attacker = b.type_at_square(m.from_square()).unwrap_or(Piece::Pawn);
    let victim_value = match b.type_at_square(m.to_square()) {
        Some(victim) => ORDER_VALUES[victim as usize],
        // en passant captures a pawn on another square
        None if b.is_move_capture(m) => ORDER_VALUES[Piece::Pawn as usize],
        None => 0,
    };
    let promote_value = m.promote_type().map_or(0, |pt| ORDER_VALUES[pt as usize]);

    8 * (victim_value + promote_value) - ORDER_VALUES[attacker as usize] / 10
}

/// Search through `moves` until we find the best move, sorting as we go. After
/// this function terminates, `moves[idx]` will contain the best-rated move of
/// the input moves from idx to the end. Requires that 0 <= `idx` <
/// `moves.len()`.
fn select_best(moves: &mut [(Move, i16)], idx: usize) -> (Move, i16) {
    let mut best_entry = moves[idx];
    for entry in moves.iter_mut().skip(idx + 1) {
        // partial selection sort: cutoffs often come before every move is
        // needed
        if entry.1 > best_entry.1 {
            swap(entry, &mut best_entry);
        }
    }
    moves[idx] = best_entry;

    best_entry
}

impl Iterator for MovePicker {
    type Item = Move;

    /// Get the next move which the move picker wants.
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.phase {
                PickPhase::Transposition => {
                    self.phase = PickPhase::PreCapture;
                    if self.transposition_move.is_some() {
                        return self.transposition_move;
                    }
                }
                PickPhase::PreCapture => {
                    self.phase = PickPhase::Capture;
                    let board = self.board;
                    self.capture_buffer = get_moves::<CAPTURES>(&board)
                        .into_iter()
                        .map(|m| (m, mvv_lva(&board, m)))
                        .collect();
                }
                PickPhase::Capture => {
                    if self.capture_index >= self.capture_buffer.len() {
                        self.phase = PickPhase::PreQuiet;
                        continue;
                    }
                    let (m, _) = select_best(&mut self.capture_buffer, self.capture_index);
                    self.capture_index += 1;
                    if !self.was_given(m) {
                        return Some(m);
                    }
                }
                PickPhase::PreQuiet => {
                    self.phase = PickPhase::Quiet;
                    self.quiet_buffer = get_moves::<QUIETS>(&self.board);
                }
                PickPhase::Quiet => {
                    let m = *self.quiet_buffer.get(self.quiet_index)?;
                    self.quiet_index += 1;
                    if !self.was_given(m) {
                        return Some(m);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use zugzwang_base::{fens::KIWIPETE_FEN, movegen::ALL, Square};

    /// Collect every legal move in the order given by a picker, and check that
    /// it is a permutation of the legal moves.
    fn picked_moves(fen: &str, tt_move: Option<Move>) -> Vec<Move> {
        let board = Board::from_fen(fen).unwrap();
        let picked: Vec<Move> = MovePicker::new(board, tt_move).collect();
        let mut expected = get_moves::<ALL>(&board);
        let mut sorted = picked.clone();
        expected.sort_by_key(|m| m.to_uci());
        sorted.sort_by_key(|m| m.to_uci());
        assert_eq!(sorted, expected);
        picked
    }

    #[test]
    /// Test that the picker gives every move exactly once, with or without a
    /// transposition move.
    fn picks_every_move_once() {
        picked_moves(KIWIPETE_FEN, None);
        let picked = picked_moves(KIWIPETE_FEN, Some(Move::normal(Square::A2, Square::A3)));
        assert_eq!(picked[0], Move::normal(Square::A2, Square::A3));
    }

    #[test]
    /// Test that an illegal transposition move is ignored.
    fn illegal_tt_move_ignored() {
        let picked = picked_moves(KIWIPETE_FEN, Some(Move::normal(Square::A2, Square::A5)));
        assert_ne!(picked[0], Move::normal(Square::A2, Square::A5));
    }

    #[test]
    /// Test that captures come before quiet moves, best victim first.
    fn captures_first() {
        // the queen on d5 can be taken by the e4 pawn or the d1 rook; the
        // knight on a5 by the b4 pawn
        let picked = picked_moves("4k3/8/8/n2q4/1P2P3/8/8/3RK3 w - - 0 1", None);
        assert_eq!(picked[0], Move::normal(Square::E4, Square::D5));
        assert_eq!(picked[1], Move::normal(Square::D1, Square::D5));
        assert_eq!(picked[2], Move::normal(Square::B4, Square::A5));
    }
}
