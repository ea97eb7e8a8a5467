// src/pairing/cache.rs
//! Merge cache: cumulative, size-bounded, freshest-first store of pairs.
//!
//! Pairs from earlier runs stay until they are pushed out by fresher ones.

use std::collections::HashMap;

use super::builder::{sort_by_freshness, Pair, PairKey};

pub const DEFAULT_MAX_SIZE: usize = 200;

/// Counts from one `upsert`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertStats {
    pub inserted: usize,
    pub replaced: usize,
    pub evicted: usize,
}

#[derive(Debug, Clone)]
pub struct MergeCache {
    entries: Vec<Pair>,
    max_size: usize,
}

impl Default for MergeCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_SIZE)
    }
}

impl MergeCache {
    pub fn with_capacity(max_size: usize) -> Self {
        let max_size = max_size.max(1);
        Self {
            entries: Vec::with_capacity(max_size.min(10_000)),
            max_size,
        }
    }

    /// Insert or overwrite by identity, re-sort, and evict the stale tail.
    pub fn upsert(&mut self, pairs: Vec<Pair>) -> UpsertStats {
        let mut stats = UpsertStats::default();
        let mut index: HashMap<PairKey, usize> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, p)| (p.key(), i))
            .collect();

        for pair in pairs {
            let key = pair.key();
            match index.get(&key) {
                Some(&i) => {
                    self.entries[i] = pair;
                    stats.replaced += 1;
                }
                None => {
                    index.insert(key, self.entries.len());
                    self.entries.push(pair);
                    stats.inserted += 1;
                }
            }
        }

        sort_by_freshness(&mut self.entries);
        if self.entries.len() > self.max_size {
            stats.evicted = self.entries.len() - self.max_size;
            self.entries.truncate(self.max_size);
        }
        stats
    }

    /// Top `limit` entries, freshest first.
    pub fn read(&self, limit: usize) -> Vec<Pair> {
        self.entries.iter().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
