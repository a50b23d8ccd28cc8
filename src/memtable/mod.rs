//! MemTable — the in-memory, ordered, concurrent write buffer that absorbs
//! fresh mutations between flushes.
//!
//! Backed by [`crossbeam_skiplist::SkipMap`], a lock-free concurrent
//! ordered map: readers do not block writers and vice versa, and writers of
//! different keys proceed in parallel. Writers of the same key are ordered
//! by the map's atomic per-key insert.
//!
//! Tombstones are represented by a tagged [`Entry`] sum type rather than a
//! sentinel byte sequence, so a genuinely empty value can still be stored
//! and distinguished from a deletion.

#[cfg(test)]
mod tests;

use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_skiplist::SkipMap;
use tracing::trace;

/// A single MemTable entry: either a live value or a tombstone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A live value.
    Live(Vec<u8>),
    /// A logical deletion.
    Tombstone,
}

impl Entry {
    /// The live value, or `None` if this entry is a tombstone.
    pub fn value(&self) -> Option<&[u8]> {
        match self {
            Entry::Live(v) => Some(v),
            Entry::Tombstone => None,
        }
    }

    /// True if this entry is a tombstone.
    pub fn is_tombstone(&self) -> bool {
        matches!(self, Entry::Tombstone)
    }
}

/// The in-memory, ordered, concurrent write buffer.
pub struct MemTable {
    map: SkipMap<Vec<u8>, Entry>,
    approx_size: AtomicUsize,
    watermark: usize,
}

impl MemTable {
    /// Create an empty MemTable with the given byte-size watermark.
    pub fn new(watermark: usize) -> Self {
        Self {
            map: SkipMap::new(),
            approx_size: AtomicUsize::new(0),
            watermark,
        }
    }

    /// Insert or overwrite `key` with a live value or a tombstone.
    ///
    /// The approximate byte counter only ever increases during the
    /// MemTable's lifetime (overwrites do not subtract the prior entry's
    /// size) — this is a soft threshold that biases flush timing, not an
    /// exact accounting.
    pub fn put(&self, key: Vec<u8>, value: Option<Vec<u8>>) {
        let added = key.len() + value.as_ref().map_or(0, |v| v.len());
        let entry = match value {
            Some(v) => Entry::Live(v),
            None => Entry::Tombstone,
        };
        self.map.insert(key, entry);
        self.approx_size.fetch_add(added, Ordering::Relaxed);
        trace!(size = self.approx_size.load(Ordering::Relaxed), "memtable put");
    }

    /// Return the live value for `key`, or `None` if it is absent or its
    /// most recent entry is a tombstone.
    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.map
            .get(key)
            .and_then(|e| e.value().value().map(|v| v.to_vec()))
    }

    /// True iff `key` has any entry (live or tombstone) in the MemTable.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.map.get(key).is_some()
    }

    /// Ordered `(key, live value)` entries with `start ≤ key ≤ end`.
    /// Tombstones are excluded.
    pub fn range(&self, start: &[u8], end: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        if start > end {
            return Vec::new();
        }
        self.map
            .range(start.to_vec()..=end.to_vec())
            .filter_map(|e| {
                e.value()
                    .value()
                    .map(|v| (e.key().clone(), v.to_vec()))
            })
            .collect()
    }

    /// Ordered sequence of all entries, including tombstones — consumed by
    /// the flush.
    pub fn sorted_entries(&self) -> Vec<(Vec<u8>, Entry)> {
        self.map
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }

    /// Reset to empty and zero the size counter.
    pub fn clear(&self) {
        self.map.clear();
        self.approx_size.store(0, Ordering::Relaxed);
    }

    /// True if the byte counter has reached the watermark.
    pub fn is_over_full(&self) -> bool {
        self.approx_size.load(Ordering::Relaxed) >= self.watermark
    }

    /// Number of distinct keys currently held (live and tombstoned).
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True if the MemTable holds no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
