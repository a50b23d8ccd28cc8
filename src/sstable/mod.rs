//! Sorted String Table (SSTable) — an immutable, sorted, on-disk run of
//! key-value entries.
//!
//! # On-disk format
//!
//! One contiguous file, no header, no footer. Entries are laid out
//! sequentially and are strictly ascending by key, with no duplicates:
//!
//! ```text
//! [4B BE key len][key bytes][4B BE value len, -1 = tombstone][value bytes?]
//! ```
//!
//! `key len` is always `> 0`. `value len` of `-1` marks a tombstone; any
//! non-negative value len (including zero) is a live value of that many
//! bytes.
//!
//! # Opening
//!
//! [`SsTable::open`] always scans the file once from front to back,
//! populating both the [`SparseIndex`] (every `stride`-th entry) and the
//! [`BloomFilter`] (every key) as it goes — whether the file was just
//! produced by [`builder::write`] during a flush or is being loaded back in
//! at startup. A truncated or malformed entry encountered during this scan
//! is a fatal open error; the engine refuses to start with a corrupt
//! SSTable on disk.
//!
//! # Reads
//!
//! [`SsTable::lookup`] short-circuits on the bloom filter, then follows the
//! sparse index to the nearest offset at or before the query key and scans
//! forward. [`SsTable::range`] does the same starting from `floor(start)`
//! (or the smallest indexed key, if `start` precedes everything indexed).
//! Both hold the shared file handle behind a [`Mutex`] so that a seek and
//! its following reads are never interleaved with another thread's.

pub mod builder;
pub mod iterator;

use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing::{debug, error};

use crate::bloom::BloomFilter;
use crate::encoding::EncodingError;
use crate::sparse_index::SparseIndex;
use iterator::read_entry;

/// Errors produced while building, opening, or reading an SSTable.
#[derive(Debug, Error)]
pub enum SstableError {
    /// Underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding / decoding error.
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// The file ended partway through an entry — a torn or truncated file.
    #[error("truncated SSTable entry")]
    Truncated,

    /// The file contains a structurally invalid entry.
    #[error("corrupt SSTable: {0}")]
    Corrupt(String),

    /// Internal consistency or locking error.
    #[error("internal error: {0}")]
    Internal(String),
}

type Result<T> = std::result::Result<T, SstableError>;

/// The outcome of a point lookup: whether the key was found, and its value
/// (absent both when not found and when the located entry is a tombstone).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Whether an entry for the queried key exists in this SSTable.
    pub found: bool,
    /// The live value, or `None` if `found` is false or the entry is a
    /// tombstone.
    pub value: Option<Vec<u8>>,
}

/// An immutable, sorted, on-disk run, opened with a rebuilt sparse index
/// and membership filter.
pub struct SsTable {
    path: PathBuf,
    file: Mutex<File>,
    index: SparseIndex,
    filter: BloomFilter,
}

impl SsTable {
    /// Open `path`, scanning it once (if non-empty) to rebuild the sparse
    /// index and membership filter. A truncated or malformed entry is a
    /// fatal error — the caller should refuse to start rather than serve
    /// reads against a corrupt file.
    pub fn open(
        path: impl AsRef<Path>,
        bloom_bits: usize,
        bloom_hashes: u32,
        sparse_index_stride: usize,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::open(&path)?;

        let mut index = SparseIndex::new(sparse_index_stride);
        let mut filter = BloomFilter::new(bloom_bits, bloom_hashes);

        let len = file.metadata()?.len();
        let mut ordinal = 0usize;
        if len > 0 {
            let mut offset = 0u64;
            loop {
                match read_entry(&mut file, offset) {
                    Ok(Some(entry)) => {
                        index.maybe_record(ordinal, &entry.key, entry.offset);
                        filter.add(&entry.key);
                        offset += iterator::encoded_len(&entry);
                        ordinal += 1;
                    }
                    Ok(None) => break,
                    Err(err) => {
                        error!(path = %path.display(), %err, "fatal error opening SSTable");
                        return Err(err);
                    }
                }
            }
        }

        debug!(path = %path.display(), entries = ordinal, indexed = index.len(), "opened SSTable");
        Ok(Self {
            path,
            file: Mutex::new(file),
            index,
            filter,
        })
    }

    /// Path to the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Point lookup. Short-circuits on the membership filter; otherwise
    /// follows the sparse index to the nearest offset and scans forward.
    pub fn lookup(&self, key: &[u8]) -> Result<SearchResult> {
        if !self.filter.might_contain(key) {
            return Ok(SearchResult {
                found: false,
                value: None,
            });
        }

        let Some((_, start_offset)) = self.index.floor(key) else {
            return Ok(SearchResult {
                found: false,
                value: None,
            });
        };

        let mut guard = self
            .file
            .lock()
            .map_err(|_| SstableError::Internal("file handle mutex poisoned".into()))?;
        guard.seek(SeekFrom::Start(start_offset))?;

        let mut offset = start_offset;
        loop {
            match read_entry(&mut *guard, offset)? {
                Some(entry) => {
                    if entry.key == key {
                        return Ok(SearchResult {
                            found: true,
                            value: entry.value,
                        });
                    }
                    if entry.key.as_slice() > key {
                        return Ok(SearchResult {
                            found: false,
                            value: None,
                        });
                    }
                    offset += iterator::encoded_len(&entry);
                }
                None => {
                    return Ok(SearchResult {
                        found: false,
                        value: None,
                    });
                }
            }
        }
    }

    /// Range scan over `[start, end]` inclusive. Tombstones are returned as
    /// `(key, None)` — the engine's merge layer, not this method, decides
    /// whether they suppress an older value.
    pub fn range(&self, start: &[u8], end: &[u8]) -> Result<Vec<(Vec<u8>, Option<Vec<u8>>)>> {
        if start > end {
            return Ok(Vec::new());
        }

        let start_offset = match self.index.floor(start) {
            Some((_, offset)) => offset,
            None => match self.index.first() {
                Some((_, offset)) => offset,
                None => return Ok(Vec::new()),
            },
        };

        let mut guard = self
            .file
            .lock()
            .map_err(|_| SstableError::Internal("file handle mutex poisoned".into()))?;
        guard.seek(SeekFrom::Start(start_offset))?;

        let mut out = Vec::new();
        let mut offset = start_offset;
        while let Some(entry) = read_entry(&mut *guard, offset)? {
            if entry.key.as_slice() > end {
                break;
            }
            offset += iterator::encoded_len(&entry);
            if entry.key.as_slice() >= start {
                out.push((entry.key, entry.value));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests;
