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

//! Errors which can occur while reading positions and playing moves.

use super::Move;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
/// A failure to parse a square or a move in coordinate notation.
pub enum ParseError {
    #[error("`{0}` is not a square name (expected a file a-h and a rank 1-8)")]
    Square(String),
    #[error("`{0}` is not a move in coordinate notation")]
    Move(String),
    #[error("`{0}` is not a piece a pawn can promote to")]
    Promotion(char),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
/// A failure to load a position from Forsyth-Edwards notation.
pub enum FenError {
    #[error("FEN is missing the {0} field")]
    MissingField(&'static str),
    #[error("unexpected character `{0}` in piece placement")]
    Placement(char),
    #[error("piece placement has a malformed rank {0}")]
    RankLength(usize),
    #[error("piece placement has {0} ranks instead of 8")]
    RankCount(usize),
    #[error("unrecognized side to move `{0}`")]
    SideToMove(String),
    #[error("unrecognized castling rights `{0}`")]
    Castling(String),
    #[error("bad en passant square: {0}")]
    EnPassant(#[from] ParseError),
    #[error("bad move clock `{0}`")]
    Clock(String),
    #[error("position is not legal: {0}")]
    Illegal(&'static str),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
/// A failure to change the history of a game.
pub enum GameError {
    #[error("move {0} is not legal in this position")]
    IllegalMove(Move),
    #[error("no moves left to undo")]
    EmptyHistory,
}
