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

//! Time management.
//!
//! In a match, the engine is given a budget of time for the whole game and
//! must decide how much of it to spend on each move. Zugzwang rations time
//! without looking at the position: a fixed share of what remains, plus the
//! increment, and never more than nine tenths of the clock.

use std::{cmp::min, time::Duration};

use zugzwang_base::Color;

/// Decide how long to search a position, given the clock information of a
/// `go` command.
///
/// `movestogo` is the number of moves remaining until the next time control.
///
/// `increment` is the time increment of (White, Black) after each move, in
/// milliseconds.
///
/// `remaining` is the time remaining for (White, Black), in milliseconds.
///
/// `player` is the color of the player for whom we are making the timing
/// decision.
pub fn get_search_time(
    movestogo: Option<u8>,
    increment: (u32, u32),
    remaining: (u32, u32),
    player: Color,
) -> Duration {
    let (our_inc, our_remaining) = match player {
        Color::White => (u64::from(increment.0), u64::from(remaining.0)),
        Color::Black => (u64::from(increment.1), u64::from(remaining.1)),
    };

    let share = match movestogo {
        Some(moves) if moves > 0 => 970 * our_remaining / (1000 * u64::from(moves)),
        _ => our_remaining / 80,
    };

    Duration::from_millis(min(share + our_inc, our_remaining * 9 / 10))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Test that a sudden-death clock spends an eightieth of the remaining
    /// time plus the increment.
    fn sudden_death() {
        assert_eq!(
            get_search_time(None, (1_000, 0), (80_000, 40_000), Color::White),
            Duration::from_millis(2_000)
        );
        assert_eq!(
            get_search_time(None, (1_000, 0), (80_000, 40_000), Color::Black),
            Duration::from_millis(500)
        );
    }

    #[test]
    /// Test that the remaining moves of a time control share the clock.
    fn moves_to_go() {
        assert_eq!(
            get_search_time(Some(10), (0, 0), (100_000, 100_000), Color::White),
            Duration::from_millis(9_700)
        );
        // zero moves to go is treated as sudden death
        assert_eq!(
            get_search_time(Some(0), (0, 0), (80_000, 80_000), Color::Black),
            Duration::from_millis(1_000)
        );
    }

    #[test]
    /// Test that a large increment never spends more than 90% of the clock.
    fn never_flag() {
        assert_eq!(
            get_search_time(Some(1), (5_000, 5_000), (1_000, 1_000), Color::White),
            Duration::from_millis(900)
        );
        assert_eq!(
            get_search_time(None, (0, 0), (u32::MAX, u32::MAX), Color::White),
            Duration::from_millis(u64::from(u32::MAX) / 80)
        );
    }
}
