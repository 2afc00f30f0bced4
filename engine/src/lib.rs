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

//! The search core of Zugzwang: a fixed-depth alpha-beta searcher with a
//! transposition table, driven by iterative deepening under node, time and
//! external-stop limits, plus the UCI types used by the binary.

pub mod config;
pub mod driver;
pub mod evaluate;
pub mod limit;
mod pick;
pub mod search;
pub mod time;
pub mod transposition;
pub mod uci;

pub use search::SearchError;
