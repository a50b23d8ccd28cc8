//! # stratumdb
//!
//! An embeddable, persistent, ordered key-value store built on a
//! **Log-Structured Merge Tree (LSM-tree)** architecture. Optimized for
//! write throughput with crash-safe durability.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                     Engine                           │
//! │  ┌────────────┐                  ┌─────────────────┐ │
//! │  │  MemTable   │  flush (atomic)  │  SSTables       │ │
//! │  │  + WAL      │ ───────────────► │  (newest-first) │ │
//! │  └────────────┘                  └─────────────────┘ │
//! │        each SSTable opens with its own               │
//! │        sparse index + membership filter              │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module           | Purpose                                                          |
//! |------------------|-------------------------------------------------------------------|
//! | [`engine`]       | Orchestrates the store — open, read, write, scan, flush            |
//! | [`memtable`]     | Concurrent, ordered, in-memory write buffer                        |
//! | [`wal`]          | CRC-protected write-ahead log for crash recovery                   |
//! | [`sstable`]      | Immutable, sorted, on-disk runs with sparse index + bloom filter    |
//! | [`bloom`]        | Membership filter (bloom-filter-class, no false negatives)          |
//! | [`sparse_index`] | In-memory key → file-offset index                                   |
//! | [`config`]       | Tunable engine configuration                                        |
//! | [`encoding`]     | Big-endian primitive codec shared by the WAL and SSTable formats    |
//!
//! ## Key Features
//!
//! - **Write-ahead logging** — every mutation is durable before it is
//!   acknowledged, and recoverable after a crash.
//! - **Ordered, concurrent MemTable** — a lock-free skip list absorbs writes
//!   between flushes.
//! - **Bloom filter short-circuiting** — SSTables reject lookups for keys
//!   they never saw without touching disk.
//! - **Flat, header-less on-disk formats** — both the WAL and SSTable wire
//!   formats are simple, explicit, and big-endian.
//!
//! ## Non-goals
//!
//! This engine does not perform background compaction, maintain a
//! leveled/size-tiered topology, support transactions beyond single-operation
//! atomicity, secondary indexes, replication, or value compression. SSTables
//! are read independently of one another; there is no cross-file iteration
//! fusion.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use stratumdb::config::EngineConfig;
//! use stratumdb::engine::Engine;
//!
//! let config = EngineConfig {
//!     root_dir: "/tmp/my_db".into(),
//!     ..Default::default()
//! };
//!
//! let engine = Engine::open(config).unwrap();
//!
//! engine.put(b"hello".to_vec(), b"world".to_vec()).unwrap();
//! assert_eq!(engine.read(b"hello").unwrap(), Some(b"world".to_vec()));
//!
//! engine.delete(b"hello".to_vec()).unwrap();
//! assert_eq!(engine.read(b"hello").unwrap(), None);
//! ```

#![allow(dead_code)]

pub mod bloom;
pub mod config;
pub mod encoding;
pub mod engine;
pub mod memtable;
pub mod sparse_index;
pub mod sstable;
pub mod wal;
