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

//! Reference positions in Forsyth-Edwards notation, shared by tests and
//! benchmarks.

/// The conventional starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A position with many castling, en passant and promotion subtleties.
/// See <https://www.chessprogramming.org/Perft_Results#Position_2>.
pub const KIWIPETE_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

/// A rook-and-pawn endgame with discovered checks along the rank.
pub const ENDGAME_FEN: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

/// An unbalanced position where White is in check.
pub const UNBALANCED_FEN: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";

/// A middlegame position with a pawn about to promote by capture.
pub const EDWARDS_FEN: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

/// White to move and mate in one with Rb8.
pub const MATE_IN_1_FEN: &str = "3k4/R7/1R6/5K2/8/8/8/8 w - - 0 1";

/// Black to move, and White mates in four plies whatever Black does.
pub const MATED_IN_4_PLIES_FEN: &str = "3k4/R7/8/5K2/3R4/8/8/8 b - - 0 1";
