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

//! Alpha-beta search, the core of the engine.
//!
//! The searcher explores the game tree to a fixed depth with negamax: at
//! every node, scores are from the perspective of the player to move, and a
//! child's score is negated on the way back up. Mate scores are stepped one
//! ply further from mate as they pass through each node, so a stored score
//! is always relative to the node which stored it.

use std::{cmp::max, sync::PoisonError, time::Duration};

use zugzwang_base::{movegen::has_moves, Eval, Game, Move};

use crate::{
    config::SearchConfig,
    evaluate::static_evaluate,
    limit::SearchLimit,
    pick::MovePicker,
    transposition::{Bound, TTEntry, TTable},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
/// The types of errors which can occur during a search.
pub enum SearchError {
    /// This search failed due to timeout.
    #[error("the search ran out of time")]
    Timeout,
    /// This search failed because a lock was poisoned.
    #[error("a lock was poisoned")]
    Poison,
    /// This searched failed because a thread failed to join.
    #[error("a search thread failed to join")]
    Join,
}

impl<T> From<PoisonError<T>> for SearchError {
    #[inline(always)]
    fn from(_: PoisonError<T>) -> Self {
        SearchError::Poison
    }
}

/// The result of performing a search. The `Ok` version contains data on the
/// search, while the `Err` version contains a reason why the search failed.
pub type SearchResult = Result<SearchInfo, SearchError>;

/// The output type of a search at one node. An `Err` may be given if, for
/// instance, the search times out.
type AlphaBetaResult = Result<(Move, Eval), SearchError>;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Information about the search which will be returned at the end of a search.
pub struct SearchInfo {
    /// The best move in the position. `Move::NULL` if there are no legal
    /// moves or the game is already drawn.
    pub best_move: Move,
    /// The principal variation, starting with `best_move`. Empty when
    /// `best_move` is `Move::NULL`.
    pub pv: Vec<Move>,
    /// The evaluation of the position, from the perspective of the player to
    /// move at the root.
    pub eval: Eval,
    /// The highest depth at which this search succeeded.
    pub depth: u8,
    /// The largest ply from the root reached by the search.
    pub selective_depth: u8,
    /// The number of nodes evaluated in this search.
    pub num_nodes_evaluated: u64,
    /// The number of times a transposition table probe was successful.
    pub num_transpositions: u64,
    /// The time spent searching.
    pub elapsed: Duration,
    /// The occupied slots of the transposition table per thousand.
    pub hashfull: u16,
}

impl SearchInfo {
    #[must_use]
    /// Construct the information of a search which did not need to search:
    /// the root has no legal moves, or is drawn by rule.
    pub fn without_search(eval: Eval) -> SearchInfo {
        SearchInfo {
            best_move: Move::NULL,
            pv: Vec::new(),
            eval,
            depth: 0,
            selective_depth: 0,
            num_nodes_evaluated: 0,
            num_transpositions: 0,
            elapsed: Duration::ZERO,
            hashfull: 0,
        }
    }

    #[must_use]
    /// Get the number of nodes searched per second.
    pub fn nodes_per_second(&self) -> u64 {
        self.num_nodes_evaluated * 1000 / (self.elapsed.as_millis() as u64 + 1)
    }
}

/// Evaluate the given game to a fixed depth. The evaluation will be from the
/// player's perspective. The principal variation of the returned
/// information only contains the best move.
///
/// `g` is the game which will be evaluated. It is restored to its original
/// state before returning, even if the search fails.
///
/// `ttable` is the transposition table, which is read and written.
///
/// `config` is the configuration of this search.
///
/// `limit` is the search limiter, and will be interiorly mutated by this
/// function.
///
/// `cancellable` determines whether this search may stop early when the
/// limit is over. An uncancellable search still reports its nodes.
///
/// # Errors
///
/// This function will return `Err(SearchError::Timeout)` if the search was
/// cancelled, and `Err(SearchError::Poison)` if the limit's locks poisoned.
pub fn search(
    g: &mut Game,
    depth: u8,
    ttable: &mut TTable,
    config: &SearchConfig,
    limit: &SearchLimit,
    cancellable: bool,
) -> SearchResult {
    let mut searcher = AlphaBetaSearch::new(ttable, config, limit, cancellable);
    let (best_move, eval) = searcher.alpha_beta(depth, 0, g, Eval::MIN, Eval::MAX)?;
    searcher.update_node_limits()?;

    Ok(SearchInfo {
        best_move,
        pv: match best_move.is_null() {
            true => Vec::new(),
            false => vec![best_move],
        },
        eval,
        depth,
        selective_depth: searcher.selective_depth,
        num_nodes_evaluated: searcher.num_nodes_evaluated,
        num_transpositions: searcher.num_transpositions,
        elapsed: Duration::ZERO,
        hashfull: 0,
    })
}

/// A structure containing data which is shared across function calls to an
/// alpha-beta search.
struct AlphaBetaSearch<'a> {
    /// The transposition table.
    ttable: &'a mut TTable,
    /// The configuration of this search.
    config: &'a SearchConfig,
    /// The limit to this search.
    limit: &'a SearchLimit,
    /// Whether this search stops when its limit is over.
    cancellable: bool,
    /// The cumulative number of nodes evaluated in this evaluation.
    num_nodes_evaluated: u64,
    /// The cumulative number of nodes visited since we last updated the limit.
    nodes_since_limit_update: u64,
    /// The cumulative number of transpositions.
    num_transpositions: u64,
    /// The largest ply reached.
    selective_depth: u8,
}

impl<'a> AlphaBetaSearch<'a> {
    /// Construct a new searcher using a given transposition table,
    /// configuration, and limit.
    fn new(
        ttable: &'a mut TTable,
        config: &'a SearchConfig,
        limit: &'a SearchLimit,
        cancellable: bool,
    ) -> AlphaBetaSearch<'a> {
        AlphaBetaSearch {
            ttable,
            config,
            limit,
            cancellable,
            num_nodes_evaluated: 0,
            nodes_since_limit_update: 0,
            num_transpositions: 0,
            selective_depth: 0,
        }
    }

    /// Use fail-soft alpha-beta negamax to evaluate the given game to a
    /// depth. The returned score is exact if it lies strictly between
    /// `alpha_in` and `beta_in`; otherwise it is a bound on the value on the
    /// side of the window it fell out of. `ply` is the distance from the
    /// root, which is never cut off by the table or by draws by rule.
    fn alpha_beta(
        &mut self,
        depth_to_go: u8,
        ply: u8,
        g: &mut Game,
        alpha_in: Eval,
        beta_in: Eval,
    ) -> AlphaBetaResult {
        self.increment_nodes()?;
        self.selective_depth = max(self.selective_depth, ply);

        if ply > 0 && g.is_drawn_by_rule() {
            return Ok((Move::NULL, Eval::DRAW));
        }

        // Retrieve transposition data and use it to improve our estimate on
        // the position
        let key = g.board().hash;
        let mut stored_move = None;
        if let Some(entry) = self.ttable.probe(key) {
            self.num_transpositions += 1;
            if !entry.best_move.is_null() {
                stored_move = Some(entry.best_move);
            }
            if ply > 0 && entry.depth >= depth_to_go {
                let usable = match entry.bound {
                    Bound::Exact => true,
                    Bound::Lower => entry.score >= beta_in,
                    Bound::Upper => entry.score <= alpha_in,
                };
                if usable {
                    return Ok((entry.best_move, entry.score));
                }
            }
        }

        if depth_to_go == 0 {
            let score = match has_moves(g.board()) {
                true => static_evaluate(g.board(), &self.config.eval_params),
                false => terminal_score(g),
            };
            return Ok((Move::NULL, score));
        }

        let mut alpha = alpha_in;
        let mut best_move = Move::NULL;
        let mut best_score = Eval::MIN;

        for m in MovePicker::new(*g.board(), stored_move) {
            g.make_move(m);
            let result = self.alpha_beta(
                depth_to_go - 1,
                ply + 1,
                g,
                -beta_in.step_forward(),
                -alpha.step_forward(),
            );
            #[allow(unused_must_use)]
            {
                g.undo();
            }
            let score = -result?.1.step_back();

            if score > best_score {
                best_score = score;
                best_move = m;
            }
            alpha = max(alpha, score);
            if alpha >= beta_in {
                // beta cutoff: the opponent will avoid this line
                break;
            }
        }

        if best_move.is_null() {
            let score = terminal_score(g);
            self.ttable_store(key, depth_to_go, score, Bound::Exact, Move::NULL);
            return Ok((Move::NULL, score));
        }

        let bound = if best_score >= beta_in {
            Bound::Lower
        } else if best_score > alpha_in {
            Bound::Exact
        } else {
            Bound::Upper
        };
        self.ttable_store(key, depth_to_go, best_score, bound, best_move);

        Ok((best_move, best_score))
    }

    #[inline(always)]
    /// Store data in the transposition table.
    fn ttable_store(&mut self, key: u64, depth: u8, score: Eval, bound: Bound, best_move: Move) {
        self.ttable.store(TTEntry {
            key,
            depth,
            score,
            bound,
            best_move,
            generation: 0,
        });
    }

    #[inline(always)]
    /// Increment the number of nodes searched, copying over the value into the
    /// search limit if enough have accumulated.
    fn increment_nodes(&mut self) -> Result<(), SearchError> {
        self.num_nodes_evaluated += 1;
        self.nodes_since_limit_update += 1;
        if self.nodes_since_limit_update >= self.config.limit_update_increment {
            self.update_node_limits()?;
            if self.cancellable && self.limit.update_time()? {
                return Err(SearchError::Timeout);
            }
        }
        Ok(())
    }

    #[inline(always)]
    /// Copy over the number of nodes evaluated by this search into the limit
    /// structure, and zero out our number.
    fn update_node_limits(&mut self) -> Result<(), SearchError> {
        self.limit.add_nodes(self.nodes_since_limit_update)?;
        self.nodes_since_limit_update = 0;
        Ok(())
    }
}

/// Get the score of a position with no legal moves, for the player to move:
/// mated if in check, and drawn otherwise.
fn terminal_score(g: &Game) -> Eval {
    match g.board().is_king_checked() {
        true => -Eval::mate_in(0),
        false => Eval::DRAW,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limit::SearchLimits;

    use zugzwang_base::{
        fens::*,
        movegen::{get_moves, ALL},
        Square,
    };

    /// Helper function to search a position at a given depth with a fresh
    /// table.
    ///
    /// # Panics
    ///
    /// This function will panic if searching the position fails or the game is
    /// invalid.
    fn search_helper(fen: &str, depth: u8) -> SearchInfo {
        let mut g = Game::from_fen(fen).unwrap();
        let before = g.clone();
        let config = SearchConfig::default();
        let mut ttable = TTable::with_capacity(16);
        let limit = SearchLimit::new();
        let info = search(&mut g, depth, &mut ttable, &config, &limit, true).unwrap();
        assert_eq!(g, before);
        info
    }

    /// A plain negamax search with no pruning or table, using the same leaf
    /// rules as the real search.
    fn minimax(g: &mut Game, depth: u8, ply: u8, params: &crate::evaluate::EvalParams) -> Eval {
        if ply > 0 && g.is_drawn_by_rule() {
            return Eval::DRAW;
        }
        let moves = get_moves::<ALL>(g.board());
        if moves.is_empty() {
            return terminal_score(g);
        }
        if depth == 0 {
            return static_evaluate(g.board(), params);
        }
        let mut best = Eval::MIN;
        for m in moves {
            g.make_move(m);
            let score = -minimax(g, depth - 1, ply + 1, params).step_back();
            g.undo().unwrap();
            best = max(best, score);
        }
        best
    }

    /// Check that alpha-beta search with a table agrees with plain negamax.
    fn minimax_helper(fen: &str, depth: u8) {
        let mut g = Game::from_fen(fen).unwrap();
        let expected = minimax(&mut g, depth, 0, &SearchConfig::default().eval_params);
        let info = search_helper(fen, depth);
        assert_eq!(info.eval, expected, "{fen} at depth {depth}");

        // the chosen move must achieve the root value
        g.make_move(info.best_move);
        let achieved = -minimax(&mut g, depth - 1, 1, &SearchConfig::default().eval_params).step_back();
        assert_eq!(achieved, expected);
    }

    #[test]
    /// Test that the search agrees with negamax at small depths.
    fn minimax_equivalence() {
        for fen in [START_FEN, KIWIPETE_FEN, ENDGAME_FEN, EDWARDS_FEN] {
            for depth in 1..=2 {
                minimax_helper(fen, depth);
            }
        }
        minimax_helper(ENDGAME_FEN, 3);
        minimax_helper(MATE_IN_1_FEN, 3);
    }

    #[test]
    /// Test that a depth-one search of the start position picks a legal move
    /// with a roughly even score.
    fn start_position_depth_1() {
        let info = search_helper(START_FEN, 1);
        assert!(get_moves::<ALL>(Game::new().board()).contains(&info.best_move));
        assert!(info.eval.centipawn_val().abs() < 100);
        assert_eq!(info.depth, 1);
        assert_eq!(info.num_nodes_evaluated, 21);
    }

    #[test]
    /// A test that the engine can find a mate in 1 move.
    fn mate_in_1() {
        for depth in 1..=2 {
            let info = search_helper(MATE_IN_1_FEN, depth);
            assert_eq!(info.best_move, Move::normal(Square::B6, Square::B8));
            assert_eq!(info.eval, Eval::mate_in(1));
        }
    }

    #[test]
    /// A test that shows the engine can find a mate in 4 plies, given enough
    /// depth.
    fn mated_in_4_plies() {
        // because black, the player to move, is getting mated, the evaluation
        // is negative here
        assert_eq!(search_helper(MATED_IN_4_PLIES_FEN, 4).eval, -Eval::mate_in(4));
    }

    #[test]
    /// Test that a stalemated root gives no move and a draw.
    fn stalemate_root() {
        let info = search_helper("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", 3);
        assert_eq!(info.best_move, Move::NULL);
        assert_eq!(info.eval, Eval::DRAW);
        assert!(info.pv.is_empty());
    }

    #[test]
    /// Test that a stopped limit cancels a search and leaves the game
    /// untouched.
    fn cancelled_search() {
        let mut g = Game::new();
        let before = g.clone();
        let config = SearchConfig {
            limit_update_increment: 1,
            ..Default::default()
        };
        let mut ttable = TTable::with_capacity(10);
        let limit = SearchLimit::new();
        limit.start(&SearchLimits::default()).unwrap();
        limit.stop();
        assert_eq!(
            search(&mut g, 3, &mut ttable, &config, &limit, true),
            Err(SearchError::Timeout)
        );
        assert_eq!(g, before);

        // an uncancellable search ignores the stop
        let info = search(&mut g, 1, &mut ttable, &config, &limit, false).unwrap();
        assert!(!info.best_move.is_null());
    }

    #[test]
    /// Test that searching fills the table and the table is used on a second
    /// search.
    fn table_reuse() {
        let mut g = Game::from_fen(KIWIPETE_FEN).unwrap();
        let config = SearchConfig::default();
        let mut ttable = TTable::with_capacity(16);
        let limit = SearchLimit::new();
        let first = search(&mut g, 3, &mut ttable, &config, &limit, true).unwrap();
        let root = ttable.peek(g.board().hash).unwrap();
        assert_eq!(root.best_move, first.best_move);
        assert_eq!(root.depth, 3);

        let second = search(&mut g, 3, &mut ttable, &config, &limit, true).unwrap();
        assert_eq!(second.eval, first.eval);
        assert!(second.num_nodes_evaluated < first.num_nodes_evaluated);
        assert!(second.num_transpositions > 0);
    }
}
