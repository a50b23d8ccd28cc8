//! Sparse index — an in-memory mapping from a subset of keys to their byte
//! offsets inside one SSTable file, letting a read jump near its target
//! instead of scanning from the start of the file.
//!
//! Every `stride`-th entry (by write/scan order, 0-based — so index `0`
//! is always recorded) is indexed. The final entry of a file is not
//! necessarily indexed; a scan forward from the previous index point
//! always reaches it.

use std::collections::BTreeMap;

/// An ordered map from key to 64-bit file offset, sampled every `stride`
/// entries.
#[derive(Debug, Clone)]
pub struct SparseIndex {
    index: BTreeMap<Vec<u8>, u64>,
    stride: usize,
}

impl SparseIndex {
    /// Build an empty index with the given sampling stride.
    pub fn new(stride: usize) -> Self {
        Self {
            index: BTreeMap::new(),
            stride: stride.max(1),
        }
    }

    /// Record `(key, offset)` if `ordinal` falls on the sampling stride.
    ///
    /// `ordinal` is the 0-based position of this entry among all entries
    /// written to (or scanned from) the owning SSTable.
    pub fn maybe_record(&mut self, ordinal: usize, key: &[u8], offset: u64) {
        if ordinal % self.stride == 0 {
            self.index.insert(key.to_vec(), offset);
        }
    }

    /// Return the indexed key ≤ `key` with the largest such key, along with
    /// its offset — or `None` if no indexed key is ≤ `key`.
    pub fn floor(&self, key: &[u8]) -> Option<(&[u8], u64)> {
        self.index
            .range(..=key.to_vec())
            .next_back()
            .map(|(k, v)| (k.as_slice(), *v))
    }

    /// The smallest indexed key and its offset, or `None` if the index is
    /// empty. Used by range scans when the requested start precedes every
    /// indexed key.
    pub fn first(&self) -> Option<(&[u8], u64)> {
        self.index.iter().next().map(|(k, v)| (k.as_slice(), *v))
    }

    /// Number of sampled entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True if no entries have been recorded.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
