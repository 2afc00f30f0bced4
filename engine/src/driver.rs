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

//! Iterative deepening.
//!
//! A `MainSearch` owns the transposition table and drives the alpha-beta
//! searcher through successively deeper iterations, keeping the result of the
//! last iteration which completed. Deeper iterations reuse the table filled
//! by shallower ones, so the best move of each node is usually searched
//! first. The limiter is shared through an `Arc` so that another thread can
//! stop the search while it runs.

use std::{cmp::max, sync::Arc, thread::sleep, time::Duration};

use log::{debug, info};
use zugzwang_base::{
    movegen::{has_moves, is_legal},
    Eval, Game, Move,
};

use super::{
    config::SearchConfig,
    limit::{SearchLimit, SearchLimits},
    search::{search, SearchInfo, SearchResult},
    transposition::TTable,
    SearchError,
};

#[derive(Debug)]
/// The primary search of an engine.
pub struct MainSearch {
    /// The configuration of the search, controlling the search parameters.
    pub config: SearchConfig,
    /// The transposition table, kept across searches.
    pub ttable: TTable,
    /// The limit to the search.
    pub limit: Arc<SearchLimit>,
}

impl MainSearch {
    #[must_use]
    /// Construct a new main search with a table sized by `config.hash_mb`.
    pub fn new(config: SearchConfig) -> MainSearch {
        MainSearch {
            config,
            ttable: TTable::with_size(config.hash_mb << 20),
            limit: Arc::new(SearchLimit::new()),
        }
    }

    /// Resize the transposition table. Its contents are lost.
    pub fn set_hash_mb(&mut self, hash_mb: usize) {
        self.config.hash_mb = hash_mb;
        self.ttable.resize(hash_mb << 20);
    }

    /// Forget everything learned in previous searches.
    pub fn clear(&mut self) {
        self.ttable.clear();
    }

    /// Start the limit under `limits` and evaluate a position.
    ///
    /// # Errors
    ///
    /// This function will return an `Err` if a lock is poisoned.
    pub fn evaluate(&mut self, g: &Game, limits: &SearchLimits) -> SearchResult {
        self.limit.start(limits)?;
        self.run(g, limits, |_| {})
    }

    /// Evaluate a position by iterative deepening, calling `on_depth` with the
    /// information of each completed iteration. The limit must already have
    /// been started. The evaluation is from the perspective of the player to
    /// move in `g`.
    ///
    /// When the limit is over before an iteration completes, that iteration is
    /// discarded and the previous one is returned. The first iteration is
    /// never cancelled, so a move is always found if one exists. If
    /// `limits.infinite` is set, this function only returns once the limit
    /// has been stopped.
    ///
    /// # Errors
    ///
    /// An error will be returned according to the cases outlined in
    /// `SearchError`, except for timeouts, which end the search normally.
    pub fn run<F: FnMut(&SearchInfo)>(
        &mut self,
        g: &Game,
        limits: &SearchLimits,
        mut on_depth: F,
    ) -> SearchResult {
        let mut game = g.clone();
        if !has_moves(game.board()) {
            let eval = match game.board().is_king_checked() {
                true => -Eval::mate_in(0),
                false => Eval::DRAW,
            };
            return Ok(SearchInfo::without_search(eval));
        }
        if game.is_drawn_by_rule() {
            return Ok(SearchInfo::without_search(Eval::DRAW));
        }

        self.ttable.new_search();
        let max_depth = limits.max_depth(self.config.depth);
        let mut best_result: Option<SearchInfo> = None;
        let mut num_transpositions = 0;
        let mut selective_depth = 0;

        for depth in 1..=max_depth {
            // iterative deepening
            if depth > 1 && self.limit.update_time()? {
                break;
            }

            let mut info = match search(
                &mut game,
                depth,
                &mut self.ttable,
                &self.config,
                &self.limit,
                depth > 1,
            ) {
                Ok(info) => info,
                Err(SearchError::Timeout) => break,
                Err(e) => return Err(e),
            };

            num_transpositions += info.num_transpositions;
            selective_depth = max(selective_depth, info.selective_depth);
            info.pv = self.principal_variation(&game, depth, info.best_move);
            info.num_nodes_evaluated = self.limit.num_nodes();
            info.num_transpositions = num_transpositions;
            info.selective_depth = selective_depth;
            info.elapsed = self.limit.elapsed()?;
            info.hashfull = self.ttable.fill_rate_permill();
            debug!(
                "depth {depth} complete: {} {} after {} nodes",
                info.best_move, info.eval, info.num_nodes_evaluated
            );

            on_depth(&info);
            best_result = Some(info);
        }

        if limits.infinite {
            while !self.limit.is_over() {
                sleep(Duration::from_millis(1));
            }
        }

        let mut best_info = best_result.ok_or(SearchError::Timeout)?;
        // include the nodes of a cancelled iteration
        best_info.num_nodes_evaluated = self.limit.num_nodes();
        info!(
            "search finished at depth {}: {} ({})",
            best_info.depth, best_info.best_move, best_info.eval
        );
        Ok(best_info)
    }

    /// Reconstruct the principal variation of the root of `g` by following the
    /// best moves stored in the table. The walk stops at a missing entry, an
    /// illegal move, a repeated position, or after `depth` moves. If the walk
    /// does not begin with `best_move`, the line is just `best_move`.
    fn principal_variation(&self, g: &Game, depth: u8, best_move: Move) -> Vec<Move> {
        let mut pv = Vec::new();
        let mut board = *g.board();
        let mut seen = vec![board.hash];
        while pv.len() < depth as usize {
            let Some(entry) = self.ttable.peek(board.hash) else {
                break;
            };
            let m = entry.best_move;
            if m.is_null() || !is_legal(m, &board) {
                break;
            }
            board.make_move(m);
            if seen.contains(&board.hash) {
                break;
            }
            seen.push(board.hash);
            pv.push(m);
        }

        if pv.first() != Some(&best_move) {
            return vec![best_move];
        }
        pv
    }
}

impl Default for MainSearch {
    fn default() -> Self {
        MainSearch::new(SearchConfig::default())
    }
}
