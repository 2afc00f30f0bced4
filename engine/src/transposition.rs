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

//! Transposition tables.
//!
//! A transposition table is a large hash-map from hashkeys of board positions
//! to useful information about each position. If the same position is reached
//! through multiple lines, the engine can reuse its old evaluation, and the
//! best move found for a position is tried first when it is searched again.
//!
//! The table is direct-mapped: each key has exactly one slot, chosen by the
//! low bits of the key. Two positions whose keys share those bits compete for
//! the slot, and a probe only succeeds when the full key matches. Keys can
//! still collide outright, so the move retrieved from a transposition table
//! must be checked for legality before it is played.

use std::mem::size_of;

use zugzwang_base::{Eval, Move};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// How a stored score relates to the true value of its position.
pub enum Bound {
    /// The score is the exact value of the position.
    Exact,
    /// The search failed high: the true value is at least the score.
    Lower,
    /// The search failed low: the true value is at most the score.
    Upper,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// An entry in the transposition table.
pub struct TTEntry {
    /// The hash key of the position.
    pub key: u64, // 8 bytes
    /// The remaining depth to which this entry was searched.
    pub depth: u8, // 1 byte
    /// The score of the position, relative to the player to move in it.
    pub score: Eval, // 2 bytes
    /// How `score` bounds the value of the position.
    pub bound: Bound, // 1 byte
    /// The best move in the position when this entry was searched. Will be
    /// `Move::NULL` when there are no moves.
    pub best_move: Move, // 2 bytes
    /// The generation of the search which wrote this entry.
    pub generation: u8, // 1 byte
}

#[derive(Clone, Debug, Default)]
/// A table which stores transposition data. It will automatically evict an
/// "old" element if another one takes its place. It behaves much like a
/// hash-map from positions to table-entries.
///
/// The default table has no slots at all: every probe misses and every store
/// is dropped.
pub struct TTable {
    /// All slots of the table. The length of `slots` is always zero or a
    /// power of two.
    slots: Vec<Option<TTEntry>>,
    /// The mask for retrieving slot indices from keys. Always 0 if `slots` is
    /// empty.
    mask: u64,
    /// The generation of the current search.
    generation: u8,
    /// The number of calls to `probe` since the table was last initialized.
    probes: u64,
    /// The number of successful calls to `probe` since the table was last
    /// initialized.
    hits: u64,
}

impl TTable {
    #[must_use]
    /// Create a table with the largest power-of-two number of slots which
    /// fits in `size_bytes` bytes. The table always has at least one slot.
    pub fn with_size(size_bytes: usize) -> TTable {
        let max_num_slots = (size_bytes / size_of::<Option<TTEntry>>()).max(1);
        TTable::with_capacity(max_num_slots.ilog2() as usize)
    }

    #[must_use]
    /// Create a transposition table with a fixed capacity. The capacity is
    /// *not* the number of entries, but rather log_2 of the number of entries.
    ///
    /// # Panics
    ///
    /// This function will panic if `capacity_log2` is large enough to cause
    /// overflow.
    pub fn with_capacity(capacity_log2: usize) -> TTable {
        let num_slots = 1usize << capacity_log2;
        TTable {
            slots: vec![None; num_slots],
            mask: (num_slots - 1) as u64,
            generation: 0,
            probes: 0,
            hits: 0,
        }
    }

    /// Reinitialize this table to the largest power-of-two number of slots
    /// which fits in `size_bytes` bytes. All entries and counters are lost.
    pub fn resize(&mut self, size_bytes: usize) {
        *self = TTable::with_size(size_bytes);
        log::debug!(
            "transposition table resized to {} slots ({size_bytes} bytes requested)",
            self.slots.len()
        );
    }

    #[inline(always)]
    /// Get the slot index of a key. Requires that the table has slots.
    fn index(&self, key: u64) -> usize {
        (key & self.mask) as usize
    }

    /// Look up the entry for `key`, counting the probe. Returns `None` if the
    /// slot is empty or holds another position.
    pub fn probe(&mut self, key: u64) -> Option<TTEntry> {
        self.probes += 1;
        let found = self.peek(key);
        if found.is_some() {
            self.hits += 1;
        }
        found
    }

    #[must_use]
    /// Look up the entry for `key` without counting the probe.
    pub fn peek(&self, key: u64) -> Option<TTEntry> {
        if self.slots.is_empty() {
            return None;
        }
        self.slots[self.index(key)].filter(|entry| entry.key == key)
    }

    /// Store an entry, stamping it with the current generation. The entry
    /// replaces the slot's occupant unless that occupant was written by the
    /// current search to a greater depth.
    pub fn store(&mut self, entry: TTEntry) {
        if self.slots.is_empty() {
            return;
        }
        let generation = self.generation;
        let idx = self.index(entry.key);
        let slot = &mut self.slots[idx];
        let replace = match slot {
            None => true,
            Some(old) => old.generation != generation || old.depth <= entry.depth,
        };
        if replace {
            *slot = Some(TTEntry {
                generation,
                ..entry
            });
        }
    }

    /// Begin a new search. Entries are kept, but entries written before this
    /// call lose their protection against replacement.
    pub fn new_search(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Remove every entry from the table. Counters and the generation are
    /// unchanged.
    pub fn clear(&mut self) {
        self.slots.fill(None);
    }

    #[inline(always)]
    #[must_use]
    /// Get the number of probes since the table was last initialized.
    pub fn probes(&self) -> u64 {
        self.probes
    }

    #[inline(always)]
    #[must_use]
    /// Get the number of successful probes since the table was last
    /// initialized.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    #[must_use]
    /// Get the fraction of probes which succeeded. Zero if nothing has been
    /// probed.
    pub fn hit_rate(&self) -> f64 {
        match self.probes {
            0 => 0.,
            n => self.hits as f64 / n as f64,
        }
    }

    #[must_use]
    /// Get the number of slots in this table.
    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    /// Estimate the number of occupied slots per thousand, sampling at most
    /// the first thousand slots.
    pub fn fill_rate_permill(&self) -> u16 {
        let sample = &self.slots[..self.slots.len().min(1000)];
        if sample.is_empty() {
            return 0;
        }
        let num_full = sample.iter().filter(|slot| slot.is_some()).count();
        (num_full * 1000 / sample.len()) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use zugzwang_base::Square;

    /// Construct an entry with the given key and depth.
    fn entry(key: u64, depth: u8, score: i16) -> TTEntry {
        TTEntry {
            key,
            depth,
            score: Eval::centipawns(score),
            bound: Bound::Exact,
            best_move: Move::normal(Square::E2, Square::E4),
            generation: 0,
        }
    }

    #[test]
    /// Test that an empty table always misses and drops stores.
    fn guaranteed_miss() {
        let mut tt = TTable::default();
        assert_eq!(tt.probe(2022), None);
        tt.store(entry(2022, 3, 10));
        assert_eq!(tt.probe(2022), None);
        assert_eq!((tt.probes(), tt.hits()), (2, 0));
        assert_eq!(tt.fill_rate_permill(), 0);

        let mut fresh = TTable::with_capacity(4);
        for key in [0, 1, 17, u64::MAX] {
            assert_eq!(fresh.probe(key), None);
        }
        assert_eq!(fresh.hit_rate(), 0.);
    }

    #[test]
    /// Test that an entry can be retrieved after it is stored.
    fn store_then_probe() {
        let mut tt = TTable::with_capacity(4);
        let e = entry(2022, 3, 10);
        tt.store(e);
        assert_eq!(tt.probe(2022), Some(e));
        assert_eq!((tt.probes(), tt.hits()), (1, 1));
        assert_eq!(tt.hit_rate(), 1.);
    }

    #[test]
    /// Test that a key sharing a slot with a stored entry still misses.
    fn index_collision_misses() {
        let mut tt = TTable::with_capacity(4);
        tt.store(entry(1, 3, 10));
        assert_eq!(tt.probe(17), None);
        assert!(tt.probe(1).is_some());
    }

    #[test]
    /// Test that deeper entries from the current search are protected, and
    /// that ties go to the newer entry.
    fn depth_preferred_replacement() {
        let mut tt = TTable::with_capacity(4);
        tt.store(entry(1, 5, 10));
        tt.store(entry(17, 2, 20));
        assert_eq!(tt.probe(1).map(|e| e.score), Some(Eval::centipawns(10)));
        assert_eq!(tt.probe(17), None);

        tt.store(entry(1, 5, 30));
        assert_eq!(tt.probe(1).map(|e| e.score), Some(Eval::centipawns(30)));
        tt.store(entry(17, 6, 40));
        assert_eq!(tt.probe(17).map(|e| e.score), Some(Eval::centipawns(40)));
    }

    #[test]
    /// Test that entries from an older search can be replaced by any entry,
    /// but are still found until they are.
    fn aging() {
        let mut tt = TTable::with_capacity(4);
        tt.store(entry(1, 9, 10));
        tt.new_search();
        let old = tt.probe(1).unwrap();
        assert_eq!(old.generation, 0);

        tt.store(entry(17, 1, 20));
        let new = tt.probe(17).unwrap();
        assert_eq!(new.generation, 1);
        assert_eq!(tt.probe(1), None);
    }

    #[test]
    /// Test that the generation wraps around instead of overflowing.
    fn generation_wraps() {
        let mut tt = TTable::with_capacity(1);
        for _ in 0..256 {
            tt.new_search();
        }
        tt.store(entry(0, 1, 0));
        assert_eq!(tt.probe(0).map(|e| e.generation), Some(0));
    }

    #[test]
    /// Test that clearing the table removes every entry.
    fn clear() {
        let mut tt = TTable::with_capacity(4);
        for key in 0..16 {
            tt.store(entry(key, 1, 0));
        }
        assert_eq!(tt.fill_rate_permill(), 1000);
        tt.clear();
        for key in 0..16 {
            assert_eq!(tt.probe(key), None);
        }
        assert_eq!(tt.fill_rate_permill(), 0);
    }

    #[test]
    /// Test that sizing by bytes rounds down to a power of two, and resizing
    /// empties the table.
    fn sizing() {
        let slot_size = size_of::<Option<TTEntry>>();
        assert_eq!(TTable::with_size(0).num_slots(), 1);
        assert_eq!(TTable::with_size(slot_size * 8).num_slots(), 8);
        assert_eq!(TTable::with_size(slot_size * 15).num_slots(), 8);

        let mut tt = TTable::with_capacity(4);
        tt.store(entry(3, 1, 0));
        assert!(tt.probe(3).is_some());
        tt.resize(slot_size * 32);
        assert_eq!(tt.num_slots(), 32);
        assert_eq!((tt.probes(), tt.hits()), (0, 0));
        assert_eq!(tt.probe(3), None);
    }
}
