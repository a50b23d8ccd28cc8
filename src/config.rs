//! Engine configuration.
//!
//! Exposes the tunables named by the external configuration surface
//! (`storage.root-dir`, `storage.mem-table-max-bytes`) plus the
//! per-SSTable construction parameters for the membership filter and
//! sparse index. The latter are not persisted — an SSTable's filter and
//! index are always rebuilt from its contents on open, so consistency
//! across process restarts is automatic even if these defaults change.

use std::path::PathBuf;

/// Default root directory holding the WAL and SSTables.
pub const DEFAULT_ROOT_DIR: &str = "./data";

/// Default MemTable watermark, in bytes (64 MiB).
pub const DEFAULT_MEM_TABLE_MAX_BYTES: usize = 67_108_864;

/// Default bit-array width of a newly built membership filter.
pub const DEFAULT_BLOOM_BITS: usize = 100_000;

/// Default hash-function count of a newly built membership filter.
pub const DEFAULT_BLOOM_HASHES: u32 = 3;

/// Default sparse-index sampling stride.
pub const DEFAULT_SPARSE_INDEX_STRIDE: usize = 100;

/// Tunable configuration for an [`Engine`](crate::engine::Engine) instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory holding `current.wal` and all `*.db` SSTables.
    pub root_dir: PathBuf,

    /// MemTable watermark, in bytes. Once the MemTable's approximate byte
    /// counter reaches this value, the next write triggers a flush.
    pub mem_table_max_bytes: usize,

    /// Bit-array width for new SSTables' membership filters.
    pub bloom_bits: usize,

    /// Hash-function count for new SSTables' membership filters.
    pub bloom_hashes: u32,

    /// Sparse-index sampling stride: every `sparse_index_stride`-th entry
    /// is recorded.
    pub sparse_index_stride: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from(DEFAULT_ROOT_DIR),
            mem_table_max_bytes: DEFAULT_MEM_TABLE_MAX_BYTES,
            bloom_bits: DEFAULT_BLOOM_BITS,
            bloom_hashes: DEFAULT_BLOOM_HASHES,
            sparse_index_stride: DEFAULT_SPARSE_INDEX_STRIDE,
        }
    }
}
