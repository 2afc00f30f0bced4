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

//! The Universal Chess Interface (UCI).
//!
//! UCI is a line-based text protocol: the GUI writes commands to the
//! engine's standard input, and the engine answers on its standard output.
//! This module holds the types of both directions. Parsing lives in `parse`
//! and formatting in `send`.

use std::time::Duration;

use zugzwang_base::{Eval, Move};

mod parse;
pub use parse::{parse_line, UciParseError};

mod send;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
/// The commands that the GUI can send to the engine.
pub enum UciCommand {
    /// Command given at the start of UCI. The engine must reply with
    /// `UciMessage::Id` and its `UciMessage::Option`s, then `UciMessage::UciOk`.
    Uci,
    /// Switch debug mode on or off. In debug mode, the engine logs more.
    Debug(bool),
    /// Request that the engine reply with `UciMessage::ReadyOk` once it has
    /// processed all previous input.
    IsReady,
    /// Set a parameter of the engine. `name` is the name of the option, and
    /// `value` its optional value, both possibly containing spaces.
    SetOption { name: String, value: Option<String> },
    /// Inform the engine that the next position will be from a new game.
    NewGame,
    /// Set up the position to evaluate next.
    Position {
        /// The FEN from which to set up the position. If `fen` is `None`, then
        /// start from the standard start position.
        fen: Option<String>,
        /// The moves to play after setting up, in coordinate notation. They
        /// are checked when they are played, not when they are parsed.
        moves: Vec<String>,
    },
    /// Search the current position under the given options.
    Go(Vec<GoOption>),
    /// Stop searching immediately, and reply with the best move found.
    Stop,
    /// Quit the program as soon as possible.
    Quit,
    /// Count the leaves of the move tree of the current position to a depth,
    /// for each root move. Not part of UCI proper.
    Perft(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// The options that can be given for a `UciCommand::Go` command.
pub enum GoOption {
    /// White has the given number of milliseconds remaining.
    WhiteTime(u32),
    /// Black has the given number of milliseconds remaining.
    BlackTime(u32),
    /// White gains the given number of milliseconds after each move.
    WhiteInc(u32),
    /// Black gains the given number of milliseconds after each move.
    BlackInc(u32),
    /// There are the given number of moves remaining until the next time
    /// control.
    MovesToGo(u8),
    /// Search to the given depth, in plies.
    Depth(u8),
    /// Search only the given number of nodes.
    Nodes(u64),
    /// Search for a mate in the given number of moves. Zugzwang searches
    /// `2n - 1` plies, unless a depth is also given.
    Mate(u8),
    /// Search for the given number of milliseconds.
    MoveTime(u32),
    /// Search until a `UciCommand::Stop` is given.
    Infinite,
    /// Search in "ponder" mode, which Zugzwang treats as an infinite search.
    Ponder,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
/// The set of messages that the engine can send to the GUI.
pub enum UciMessage<'a> {
    /// The engine identifies itself. Must be sent after receiving a
    /// `UciCommand::Uci` message.
    Id {
        /// The name of the engine.
        name: Option<&'a str>,
        /// The author of the engine.
        author: Option<&'a str>,
    },
    /// Sent after `id` and the options to inform the GUI that the engine is
    /// ready in UCI mode.
    UciOk,
    /// The reply to `UciCommand::IsReady`.
    ReadyOk,
    /// Request that the GUI display an option to the user.
    /// Not to be confused with the standard `Option`.
    Option { name: &'a str, opt: OptionType },
    /// Inform the GUI that the engine has found a move. `m` is the best move
    /// that it found, and `ponder` may optionally be the opponent's expected
    /// reply. A null `m` is written as `0000`.
    BestMove { m: Move, ponder: Option<Move> },
    /// Give the GUI some information about what the engine is thinking.
    Info(&'a [EngineInfo<'a>]),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
/// Information about an engine's search state.
pub enum EngineInfo<'a> {
    /// The depth to which this information was created.
    Depth(u8),
    /// The selective search depth.
    SelDepth(u8),
    /// The time searched.
    Time(Duration),
    /// The number of nodes searched.
    Nodes(u64),
    /// The principal variation.
    Pv(&'a [Move]),
    /// The evaluation of the position, for the player to move.
    Score {
        /// A numeric evaluation of the position.
        eval: Eval,
        /// Whether the evaluation given is only a lower bound.
        is_lower_bound: bool,
        /// Whether the evaluation given is only an upper bound.
        is_upper_bound: bool,
    },
    /// The hash fill rate of the transposition table. Measured out of 1000.
    HashFull(u16),
    /// The number of nodes searched per second by the engine.
    NodeSpeed(u64),
    /// Any string which should be displayed to the GUI. The string may not
    /// contain any newlines (`\n`).
    String(&'a str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// The kinds of options the engine exposes.
pub enum OptionType {
    /// A spin box which takes an integer.
    Spin { default: i64, min: i64, max: i64 },
    /// A button which can be pressed to send a command.
    Button,
}
