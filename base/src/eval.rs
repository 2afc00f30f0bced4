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

//! Evaluations, which describe how good a position is for one player.

use super::Color;

use std::{
    fmt::{Display, Formatter},
    ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
/// A wrapper for the evaluation of a position, in centipawns.
///
/// An evaluation is always relative to some player: the higher it is, the
/// better the position is for that player. An evaluation of 0 is a draw.
///
/// Values with magnitude greater than 29,000 are reserved for mates. 30,000
/// is a mate in 0 for the player (they have already won), 29,999 is a mate in
/// one ply, 29,998 is a mate in two plies (the opponent moves, and then the
/// player delivers mate), and so on. Negative mate values are mates against
/// the player.
///
/// # Examples
///
/// ```
/// use zugzwang_base::Eval;
/// let mate_eval = Eval::mate_in(3);
/// let draw_eval = Eval::DRAW;
/// assert!(mate_eval > draw_eval);
/// ```
pub struct Eval(i16);

impl Eval {
    /// An evaluation which is smaller than every other "normal" evaluation.
    pub const MIN: Eval = Eval(-Eval::MATE_0_VAL - 1000);

    /// An evaluation which is larger than every other "normal" evaluation.
    pub const MAX: Eval = Eval(Eval::MATE_0_VAL + 1000);

    /// The evaluation of a drawn position.
    pub const DRAW: Eval = Eval(0);

    /// The internal evaluation of a mate in 0 (i.e. the player made the
    /// mating move on the previous ply).
    const MATE_0_VAL: i16 = 30_000;

    /// The highest value of a position which is not a mate.
    const MATE_CUTOFF: i16 = 29_000;

    /// The value of one pawn.
    const PAWN_VALUE: i16 = 100;

    #[inline(always)]
    #[must_use]
    /// Construct an `Eval` with the given value in centipawns.
    pub const fn centipawns(x: i16) -> Eval {
        Eval(x)
    }

    #[inline(always)]
    #[must_use]
    /// Create an `Eval` based on the number of half-moves required for the
    /// player to mate. `-Eval::mate_in(n)` is the player getting mated in
    /// `n` plies.
    pub const fn mate_in(nplies: u16) -> Eval {
        Eval(Eval::MATE_0_VAL - (nplies as i16))
    }

    #[inline(always)]
    #[must_use]
    /// Step this evaluation back in time one move. "normal" evaluations will
    /// not be changed, but mates will be moved one further from 0. Used
    /// when passing a child's evaluation up to its parent.
    ///
    /// # Examples
    ///
    /// ```
    /// use zugzwang_base::Eval;
    /// let current_eval = Eval::mate_in(0);
    /// let previous_ply_eval = current_eval.step_back();
    /// assert_eq!(previous_ply_eval, Eval::mate_in(1));
    /// ```
    pub const fn step_back(self) -> Eval {
        Eval(self.0 - self.0 / (Eval::MATE_CUTOFF + 1))
    }

    #[inline(always)]
    #[must_use]
    /// Step this evaluation forward in time one move. This is the inverse of
    /// `step_back`, used when passing a window from a parent to its child.
    pub const fn step_forward(self) -> Eval {
        Eval(self.0 + self.0 / (Eval::MATE_CUTOFF + 1))
    }

    #[inline(always)]
    #[must_use]
    /// Is this evaluation a mate (i.e. a non-normal evaluation)?
    pub const fn is_mate(self) -> bool {
        self.0 > Eval::MATE_CUTOFF || self.0 < -Eval::MATE_CUTOFF
    }

    #[must_use]
    /// Get the number of moves (not plies) until a mated position, assuming
    /// perfect play.
    ///
    /// # Examples
    ///
    /// ```
    /// use zugzwang_base::Eval;
    /// let ev1 = Eval::centipawns(250);
    /// let ev2 = Eval::mate_in(3);
    /// assert_eq!(ev1.moves_to_mate(), None);
    /// assert_eq!(ev2.moves_to_mate(), Some(2));
    /// ```
    pub const fn moves_to_mate(self) -> Option<u8> {
        match self.is_mate() {
            true => {
                if self.0 > 0 {
                    Some(((Eval::MATE_0_VAL - self.0 + 1) / 2) as u8)
                } else {
                    Some(((Eval::MATE_0_VAL + self.0 + 1) / 2) as u8)
                }
            }
            false => None,
        }
    }

    #[inline(always)]
    #[must_use]
    /// Get the value in centipawns of this evaluation. Will return a number
    /// with magnitude greater than 29000 for mates.
    pub const fn centipawn_val(self) -> i16 {
        self.0
    }

    #[inline(always)]
    #[must_use]
    /// Convert a White-relative evaluation into the perspective of the given
    /// player. This is an involution: converting twice for the same player
    /// yields the original evaluation.
    pub const fn in_perspective(self, player: Color) -> Eval {
        match player {
            Color::White => self,
            Color::Black => Eval(-self.0),
        }
    }
}

impl Display for Eval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0 > Eval::MATE_CUTOFF {
            write!(f, "+M{:.0}", (Eval::MATE_0_VAL - self.0 + 1) / 2)?;
        } else if self.0 < -Eval::MATE_CUTOFF {
            write!(f, "-M{:.0}", (Eval::MATE_0_VAL + self.0 + 1) / 2)?;
        } else if self.0 == 0 {
            write!(f, "00.00")?;
        } else {
            write!(f, "{:+2.2}", f32::from(self.0) / f32::from(Eval::PAWN_VALUE))?;
        }
        Ok(())
    }
}

impl Mul<i16> for Eval {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: i16) -> Self::Output {
        Eval(self.0 * rhs)
    }
}

impl AddAssign<Eval> for Eval {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Eval) {
        self.0 += rhs.0;
    }
}

impl SubAssign<Eval> for Eval {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Eval) {
        self.0 -= rhs.0;
    }
}

impl Add<Eval> for Eval {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Eval) -> Eval {
        Eval(self.0 + rhs.0)
    }
}

impl Sub<Eval> for Eval {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Eval) -> Eval {
        Eval(self.0 - rhs.0)
    }
}

impl Neg for Eval {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Eval {
        Eval(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Test that stepping a normal evaluation in either direction makes no
    /// changes, even at the edge of the mate zone.
    fn test_step_normal_unchanged() {
        for val in [0, 150, -150, Eval::MATE_CUTOFF, -Eval::MATE_CUTOFF] {
            assert_eq!(Eval(val), Eval(val).step_forward());
            assert_eq!(Eval(val), Eval(val).step_back());
        }
    }

    #[test]
    /// Test that stepping the mates closest to being a normal evaluation
    /// moves them correctly.
    fn test_step_tightest_mates() {
        assert_eq!(
            Eval(Eval::MATE_CUTOFF + 2),
            Eval(Eval::MATE_CUTOFF + 1).step_forward()
        );
        assert_eq!(
            -Eval(Eval::MATE_CUTOFF + 2),
            -Eval(Eval::MATE_CUTOFF + 1).step_forward()
        );
        assert_eq!(
            Eval(Eval::MATE_CUTOFF + 1),
            Eval(Eval::MATE_CUTOFF + 2).step_back()
        );
    }

    #[test]
    /// Test that a mate seen from the child is one ply further from the
    /// parent.
    fn test_mate_step_back() {
        assert_eq!(Eval::mate_in(0).step_back(), Eval::mate_in(1));
        assert_eq!((-Eval::mate_in(3)).step_back(), -Eval::mate_in(4));
        assert_eq!(Eval::mate_in(4).step_forward(), Eval::mate_in(3));
    }

    #[test]
    /// Test that shorter mates are better than longer ones.
    fn test_mate_ordering() {
        assert!(Eval::mate_in(1) > Eval::mate_in(3));
        assert!(-Eval::mate_in(1) < -Eval::mate_in(3));
        assert!(Eval::mate_in(200) > Eval::centipawns(2000));
        assert!(Eval::MIN < -Eval::mate_in(0));
        assert!(Eval::MAX > Eval::mate_in(0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Eval::mate_in(5).to_string(), "+M3");
        assert_eq!((-Eval::mate_in(2)).to_string(), "-M1");
        assert_eq!(Eval::DRAW.to_string(), "00.00");
        assert_eq!(Eval::centipawns(150).to_string(), "+1.50");
    }

    #[test]
    fn test_perspective() {
        let ev = Eval::centipawns(42);
        assert_eq!(ev.in_perspective(Color::White), ev);
        assert_eq!(ev.in_perspective(Color::Black), -ev);
        assert_eq!(ev.in_perspective(Color::Black).in_perspective(Color::Black), ev);
    }
}
