//! # Storage Engine
//!
//! The orchestrator that composes the [`MemTable`], [`Wal`], and
//! [`SsTable`] layers into the crate's public contract: `put`, `delete`,
//! `batch_put`, `read`, and `read_range`.
//!
//! ## Write path
//!
//! Every mutation is serialized by a single write lock: append to the WAL
//! (fsync'd before the call returns), insert into the MemTable, and — if
//! the MemTable has crossed its byte watermark — flush. The WAL append
//! order is therefore exactly the client-observed commit order.
//!
//! ## Flush protocol
//!
//! Flushing allocates the next sequence number, writes the MemTable's
//! sorted entries (including tombstones) to a `.tmp` scratch file, renames
//! it into place, reopens it as an [`SsTable`] (rebuilding its sparse index
//! and membership filter), inserts it at the front of the SSTable list,
//! then clears the MemTable and the WAL. The rename is what makes the
//! publish atomic: a crash before it leaves only a stale scratch file
//! behind; a crash after it leaves a WAL that still contains the flushed
//! data, which is safe to replay because the MemTable layer is always
//! consulted before any SSTable on read.
//!
//! ## Read path
//!
//! A point lookup consults the MemTable first (present ⇒ authoritative,
//! even if it is a tombstone), then every SSTable newest-first, returning
//! the first hit. A range scan instead accumulates oldest-first — visiting
//! every SSTable from the oldest to the newest and finally the MemTable —
//! so that each overwrite in the accumulator reflects the most recent
//! write for that key, then emits everything that is not a tombstone.
//!
//! ## Recovery
//!
//! On open, every `*.db` file in the root directory is opened (newest
//! filename first) and the WAL is replayed into a fresh MemTable. Stale
//! `*.db.tmp` scratch files from a flush that crashed before its rename are
//! swept away; they were never published and so never observed by a
//! reader.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::memtable::MemTable;
use crate::sstable::{builder, SsTable, SstableError};
use crate::wal::{Wal, WalError};

/// Errors returned by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Underlying I/O error (directory listing, rename, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A write-ahead-log operation failed.
    #[error("WAL error: {0}")]
    Wal(#[from] WalError),

    /// An SSTable operation failed.
    #[error("SSTable error: {0}")]
    Sstable(#[from] SstableError),

    /// A key was empty; keys must be non-empty byte sequences.
    #[error("key must not be empty")]
    EmptyKey,

    /// Internal consistency or locking error.
    #[error("internal error: {0}")]
    Internal(String),
}

type Result<T> = std::result::Result<T, EngineError>;

const WAL_FILE_NAME: &str = "current.wal";
const SSTABLE_EXTENSION: &str = "db";
const SSTABLE_TMP_EXTENSION: &str = "tmp";

/// Mutable engine state guarded by a single read/write lock: the active
/// MemTable and WAL handles, the SSTable list (newest-first), and the next
/// sequence number a flush will allocate.
struct EngineState {
    memtable: Arc<MemTable>,
    wal: Arc<Wal>,
    sstables: Vec<Arc<SsTable>>,
    next_sequence: u64,
}

/// The LSM storage engine. Cheaply cloneable — clones share the same
/// underlying state via `Arc`.
#[derive(Clone)]
pub struct Engine {
    state: Arc<RwLock<EngineState>>,
    root_dir: PathBuf,
    config: EngineConfig,
}

impl Engine {
    /// Open (or create) the engine rooted at `config.root_dir`: ensures the
    /// directory exists, opens every existing `*.db` file newest-first,
    /// sweeps stale `*.db.tmp` scratch files, opens the WAL, and replays any
    /// WAL entries into a fresh MemTable.
    pub fn open(config: EngineConfig) -> Result<Self> {
        let root_dir = config.root_dir.clone();
        fs::create_dir_all(&root_dir)?;

        sweep_stale_scratch_files(&root_dir)?;

        let mut sequenced = list_sstable_sequences(&root_dir)?;
        sequenced.sort_by(|a, b| b.0.cmp(&a.0)); // newest (largest sequence) first

        let mut sstables = Vec::with_capacity(sequenced.len());
        for (_, path) in &sequenced {
            let sstable = SsTable::open(
                path,
                config.bloom_bits,
                config.bloom_hashes,
                config.sparse_index_stride,
            )?;
            sstables.push(Arc::new(sstable));
        }

        let next_sequence = sequenced.iter().map(|(seq, _)| seq + 1).max().unwrap_or(0);

        let wal_path = root_dir.join(WAL_FILE_NAME);
        let wal = Wal::open(&wal_path)?;

        let memtable = Arc::new(MemTable::new(config.mem_table_max_bytes));
        if !wal.is_empty()? {
            for entry in Wal::read_all_entries(&wal_path)? {
                memtable.put(entry.key, entry.value);
            }
        }

        info!(
            root = %root_dir.display(),
            sstables = sstables.len(),
            next_sequence,
            "opened engine"
        );

        Ok(Self {
            state: Arc::new(RwLock::new(EngineState {
                memtable,
                wal: Arc::new(wal),
                sstables,
                next_sequence,
            })),
            root_dir,
            config,
        })
    }

    /// Insert or overwrite `key` with `value`, durable once this returns.
    pub fn put(&self, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        self.write_path(key, Some(value))
    }

    /// Logically delete `key`, durable once this returns. A subsequent
    /// `read` returns `None` and the key is excluded from range scans.
    pub fn delete(&self, key: Vec<u8>) -> Result<()> {
        self.write_path(key, None)
    }

    /// Apply each `(key, value)` pair as an individual `put`, in iteration
    /// order. An empty batch is a no-op.
    pub fn batch_put(&self, items: Vec<(Vec<u8>, Vec<u8>)>) -> Result<()> {
        for (key, value) in items {
            self.put(key, value)?;
        }
        Ok(())
    }

    /// Point lookup: MemTable, then every SSTable newest-first. Returns
    /// `None` if the key is absent or its most recent write was a
    /// tombstone.
    pub fn read(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let (memtable, sstables) = self.snapshot()?;

        if memtable.contains(key) {
            return Ok(memtable.get(key));
        }

        for sstable in &sstables {
            let result = sstable.lookup(key)?;
            if result.found {
                return Ok(result.value);
            }
        }

        Ok(None)
    }

    /// Ordered `(key, value)` pairs for every live entry with
    /// `start ≤ key ≤ end`. Returns an empty vector if `start > end`.
    pub fn read_range(&self, start: &[u8], end: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        if start > end {
            return Ok(Vec::new());
        }

        let (memtable, sstables) = self.snapshot()?;

        // Oldest-first accumulation so each overwrite reflects the most
        // recent write; the MemTable — always the freshest layer — is
        // applied last.
        let mut acc: std::collections::BTreeMap<Vec<u8>, Option<Vec<u8>>> =
            std::collections::BTreeMap::new();
        for sstable in sstables.iter().rev() {
            for (key, value) in sstable.range(start, end)? {
                acc.insert(key, value);
            }
        }
        for (key, entry) in memtable.sorted_entries() {
            if key.as_slice() >= start && key.as_slice() <= end {
                acc.insert(key, entry.value().map(|v| v.to_vec()));
            }
        }

        Ok(acc
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .collect())
    }

    /// Snapshot the current MemTable handle and SSTable list without
    /// holding the lock across any I/O. Readers never take the write lock
    /// that serializes mutations.
    fn snapshot(&self) -> Result<(Arc<MemTable>, Vec<Arc<SsTable>>)> {
        let guard = self
            .state
            .read()
            .map_err(|_| EngineError::Internal("engine state lock poisoned".into()))?;
        Ok((guard.memtable.clone(), guard.sstables.clone()))
    }

    fn write_path(&self, key: Vec<u8>, value: Option<Vec<u8>>) -> Result<()> {
        if key.is_empty() {
            return Err(EngineError::EmptyKey);
        }

        let mut guard = self
            .state
            .write()
            .map_err(|_| EngineError::Internal("engine state lock poisoned".into()))?;

        guard.wal.append(&key, value.as_deref())?;
        guard.memtable.put(key, value);

        if guard.memtable.is_over_full() {
            self.flush(&mut guard)?;
        }

        Ok(())
    }

    /// Freeze the active MemTable into a new SSTable. Must run with the
    /// write lock held: the MemTable is not cleared until the new SSTable
    /// is reachable in the (newest-first) SSTable list, so a concurrent
    /// reader never observes a window where neither holds a given key.
    fn flush(&self, guard: &mut EngineState) -> Result<()> {
        let sequence = guard.next_sequence;
        guard.next_sequence += 1;

        let final_path = sstable_path(&self.root_dir, sequence);
        let scratch_path = final_path.with_extension(format!(
            "{SSTABLE_EXTENSION}.{SSTABLE_TMP_EXTENSION}"
        ));

        let entries = guard
            .memtable
            .sorted_entries()
            .into_iter()
            .map(|(key, entry)| (key, entry.value().map(|v| v.to_vec())));
        builder::write(&scratch_path, entries)?;

        fs::rename(&scratch_path, &final_path)?;

        let sstable = SsTable::open(
            &final_path,
            self.config.bloom_bits,
            self.config.bloom_hashes,
            self.config.sparse_index_stride,
        )?;
        guard.sstables.insert(0, Arc::new(sstable));

        guard.memtable.clear();
        guard.wal.clear()?;

        debug!(sequence, path = %final_path.display(), "flushed memtable");
        Ok(())
    }
}

/// Build the canonical `{10-digit sequence}.db` filename for `sequence`.
fn sstable_path(root_dir: &Path, sequence: u64) -> PathBuf {
    root_dir.join(format!("{sequence:010}.{SSTABLE_EXTENSION}"))
}

/// Parse a `*.db` filename's leading 10-digit sequence number.
fn parse_sequence(file_name: &str) -> Option<u64> {
    file_name
        .strip_suffix(&format!(".{SSTABLE_EXTENSION}"))
        .and_then(|stem| stem.parse::<u64>().ok())
}

/// List every `*.db` file in `root_dir` as `(sequence, path)` pairs.
fn list_sstable_sequences(root_dir: &Path) -> Result<Vec<(u64, PathBuf)>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(root_dir)? {
        let entry = entry?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(sequence) = parse_sequence(name) {
            out.push((sequence, path));
        }
    }
    Ok(out)
}

/// Remove any `*.db.tmp` scratch files left behind by a flush that crashed
/// between writing the scratch file and renaming it into place. These were
/// never published, so no reader ever observed them.
fn sweep_stale_scratch_files(root_dir: &Path) -> Result<()> {
    for entry in fs::read_dir(root_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some(SSTABLE_TMP_EXTENSION) {
            warn!(path = %path.display(), "removing stale flush scratch file");
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
