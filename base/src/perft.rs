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

//! Performance testing, or "perft." Perft is used for verifying the correctness
//! of move generation and benchmarking the speed of both move generation and
//! the make/unmake processes.

use super::{
    movegen::{get_moves, ALL},
    Board, FenError, Move,
};

use std::time::Instant;

/// Perform a performance test on the move generator and return the number of
/// leaf nodes. The input fen is the FEN of the board to start from, and the
/// depth is the depth from which to generate moves.
///
/// # Errors
///
/// This function will return an `Err` if `fen` is not a legal board.
pub fn perft(fen: &str, depth: u8) -> Result<u64, FenError> {
    let mut board = Board::from_fen(fen)?;
    Ok(perft_search(&mut board, depth))
}

/// Count the leaves of the move tree below `board` to the given depth. The
/// board is restored before returning.
pub fn perft_search(board: &mut Board, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = get_moves::<ALL>(board);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut total = 0;
    for m in moves {
        let undo = board.make_move(m);
        total += perft_search(board, depth - 1);
        board.unmake_move(m, undo);
    }

    total
}

/// Count the leaves below each root move to the given depth, in move
/// generation order. Also returns the time taken.
///
/// At depth 0 no move is played, so the list is empty; the perft count of the
/// root alone is still 1.
pub fn divide(board: &mut Board, depth: u8) -> (Vec<(Move, u64)>, f64) {
    let tic = Instant::now();
    if depth == 0 {
        return (Vec::new(), tic.elapsed().as_secs_f64());
    }
    let counts = get_moves::<ALL>(board)
        .into_iter()
        .map(|m| {
            let undo = board.make_move(m);
            let count = perft_search(board, depth - 1);
            board.unmake_move(m, undo);
            (m, count)
        })
        .collect();

    (counts, tic.elapsed().as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fens::*;

    #[test]
    /// Test the perft values for the board starting position.
    fn perft_start_position() {
        perft_assistant(START_FEN, &[1, 20, 400, 8_902, 197_281]);
    }

    #[test]
    /// Test the perft values for the
    /// [Kiwipete](https://www.chessprogramming.org/Perft_Results#Position_2)
    /// position.
    fn perft_kiwipete() {
        perft_assistant(KIWIPETE_FEN, &[1, 48, 2039, 97_862]);
    }

    #[test]
    fn perft_endgame() {
        // https://www.chessprogramming.org/Perft_Results#Position_3
        perft_assistant(ENDGAME_FEN, &[1, 14, 191, 2_812, 43_238]);
    }

    #[test]
    /// Test the perft values for an unbalanced position. Uses results from
    /// [the CPW wiki](https://www.chessprogramming.org/Perft_Results#Position_4).
    fn perft_unbalanced() {
        perft_assistant(UNBALANCED_FEN, &[1, 6, 264, 9_467]);
    }

    #[test]
    fn perft_edwards() {
        // https://www.chessprogramming.org/Perft_Results#Position_5
        perft_assistant(EDWARDS_FEN, &[1, 44, 1_486, 62_379]);
    }

    #[test]
    /// Test that the per-move counts of a divide sum to the perft total.
    fn divide_sums_to_perft() {
        let mut board = Board::from_fen(KIWIPETE_FEN).unwrap();
        let before = board;
        let (counts, _) = divide(&mut board, 2);
        assert_eq!(counts.len(), 48);
        assert_eq!(counts.iter().map(|&(_, n)| n).sum::<u64>(), 2039);
        assert_eq!(board, before);
    }

    #[test]
    /// Test that a divide to depth 0 plays no moves.
    fn divide_depth_zero() {
        let mut board = Board::from_fen(START_FEN).unwrap();
        let (counts, _) = divide(&mut board, 0);
        assert!(counts.is_empty());
        assert_eq!(perft_search(&mut board, 0), 1);
    }

    #[test]
    fn perft_bad_fen() {
        assert!(perft("not a fen", 1).is_err());
    }

    fn perft_assistant(fen: &str, node_counts: &[u64]) {
        for (i, num) in node_counts.iter().enumerate() {
            assert_eq!(Ok(*num), perft(fen, i as u8));
        }
    }
}
