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

//! Search limits, which decide when a search must stop.
//!
//! A `SearchLimits` is the budget a caller asks for. A `SearchLimit` is the
//! live state of one search against that budget: it is shared between the
//! searching thread and whoever may want to cancel the search, so all of its
//! state is interiorly mutable.

use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Mutex,
    },
    time::{Duration, Instant},
};

use super::SearchError;

/// The deepest iteration a search will ever attempt.
pub const MAX_DEPTH: u8 = 64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// The budget for one search.
pub struct SearchLimits {
    /// The deepest iteration to complete. If `None`, the depth is bounded by
    /// the other limits.
    pub depth: Option<u8>,
    /// The wall-clock budget of the search.
    pub movetime: Option<Duration>,
    /// The number of nodes after which the search stops.
    pub nodes: Option<u64>,
    /// Whether the search should run until it is stopped externally. An
    /// infinite search ignores `movetime` and `nodes`.
    pub infinite: bool,
}

impl SearchLimits {
    #[must_use]
    /// Get the deepest iteration the search may run. When no limit at all is
    /// given, `default_depth` is used so that the search still terminates.
    pub fn max_depth(&self, default_depth: u8) -> u8 {
        let depth = match self.depth {
            Some(d) => d,
            None if self.infinite || self.movetime.is_some() || self.nodes.is_some() => MAX_DEPTH,
            None => default_depth,
        };
        depth.clamp(1, MAX_DEPTH)
    }
}

#[derive(Debug)]
/// The live limit on a running search.
pub struct SearchLimit {
    /// Whether the search is over.
    over: AtomicBool,
    /// The cumulative number of nodes which have been searched since the
    /// search started.
    num_nodes: AtomicU64,
    /// A cap on the total number of nodes to search. If the cap is `None`,
    /// then there is no limit to the number of nodes to search.
    nodes_cap: Mutex<Option<u64>>,
    /// The time at which the search was started.
    start_time: Mutex<Instant>,
    /// The time at which the search will end. Will be `None` if the search is
    /// untimed.
    end_time: Mutex<Option<Instant>>,
}

impl SearchLimit {
    #[must_use]
    /// Create a new `SearchLimit` which will never stop.
    pub fn new() -> SearchLimit {
        SearchLimit {
            over: AtomicBool::new(false),
            num_nodes: AtomicU64::new(0),
            nodes_cap: Mutex::new(None),
            start_time: Mutex::new(Instant::now()),
            end_time: Mutex::new(None),
        }
    }

    /// Start a search under the given budget, setting the start time to now
    /// and forgetting any previous stop.
    ///
    /// # Errors
    ///
    /// This function will return an `Err` if a lock is poisoned.
    pub fn start(&self, limits: &SearchLimits) -> Result<(), SearchError> {
        let now = Instant::now();
        self.num_nodes.store(0, Ordering::Relaxed);
        *self.start_time.lock()? = now;
        let (movetime, nodes) = match limits.infinite {
            true => (None, None),
            false => (limits.movetime, limits.nodes),
        };
        *self.end_time.lock()? = movetime.map(|dur| now + dur);
        *self.nodes_cap.lock()? = nodes;
        self.over.store(false, Ordering::Relaxed);
        Ok(())
    }

    #[inline(always)]
    /// Immediately mark the search as over.
    pub fn stop(&self) {
        self.over.store(true, Ordering::Relaxed);
    }

    #[inline(always)]
    #[must_use]
    /// Poll whether the search is over.
    pub fn is_over(&self) -> bool {
        self.over.load(Ordering::Relaxed)
    }

    /// Check the elapsed time to see if this search is over, and if so,
    /// update accordingly. Returns whether the search is over.
    ///
    /// # Errors
    ///
    /// This function will return an `Err` if a lock is poisoned.
    pub fn update_time(&self) -> Result<bool, SearchError> {
        if let Some(end) = *self.end_time.lock()? {
            if Instant::now() >= end {
                self.over.store(true, Ordering::Relaxed);
            }
        }

        Ok(self.is_over())
    }

    /// Increment the total number of nodes searched, marking the search as
    /// over if the node cap is exceeded.
    ///
    /// # Errors
    ///
    /// This function will return an `Err` if a lock is poisoned.
    pub fn add_nodes(&self, nodes: u64) -> Result<(), SearchError> {
        let total = self.num_nodes.fetch_add(nodes, Ordering::Relaxed) + nodes;
        if let Some(max_nodes) = *self.nodes_cap.lock()? {
            if total > max_nodes {
                self.over.store(true, Ordering::Relaxed);
            }
        }
        Ok(())
    }

    #[inline(always)]
    #[must_use]
    /// Get the cumulative number of nodes searched.
    pub fn num_nodes(&self) -> u64 {
        self.num_nodes.load(Ordering::Relaxed)
    }

    /// Get the time since the search was started.
    ///
    /// # Errors
    ///
    /// This function will return an `Err` if a lock is poisoned.
    pub fn elapsed(&self) -> Result<Duration, SearchError> {
        Ok(self.start_time.lock()?.elapsed())
    }
}

impl Default for SearchLimit {
    fn default() -> Self {
        SearchLimit::new()
    }
}
