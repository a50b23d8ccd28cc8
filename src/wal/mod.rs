//! Write-ahead log — a durable, append-only record of every mutation since
//! the last successful flush, with per-record integrity checking.
//!
//! # On-disk layout
//!
//! One file (`current.wal`), no header, a sequence of records:
//!
//! ```text
//! [4B BE total size][8B BE CRC][4B BE key len][key][4B BE value len][value?]
//! ```
//!
//! - **total size** — `4 + 8 + payload length`, where payload is
//!   everything from the key-length field to the end of the record.
//! - **CRC** — a 64-bit integrity check computed over the payload (the
//!   32-bit CRC-32 of the payload, zero-extended to 64 bits).
//! - **value length** — `-1` marks a tombstone; `≥ 0` is a live value's
//!   byte length.
//!
//! # Guarantees
//!
//! - **Durability**: every [`Wal::append`] is followed by [`File::sync_all`].
//! - **Integrity**: the checksum is verified during replay.
//! - **Tail-tolerance**: a torn final record (crash mid-append) fails the
//!   checksum check indistinguishably from corruption and is discarded —
//!   acceptable because such a write was never acknowledged.
//! - **Serialized appends**: at most one appender writes at a time.

#[cfg(test)]
mod tests;

use std::{
    fs::{File, OpenOptions},
    io::{self, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::encoding::{self, EncodingError};

/// Minimum bytes needed to hold a record header (4B size + 8B CRC).
pub const RECORD_HEADER_SIZE: usize = 12;

/// Errors returned by WAL operations.
#[derive(Debug, Error)]
pub enum WalError {
    /// Underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Encoding / decoding error.
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Internal consistency or locking error.
    #[error("Internal error: {0}")]
    Internal(String),
}

type Result<T> = std::result::Result<T, WalError>;

/// One recovered WAL entry: a key plus an optional value (`None` for a
/// tombstone).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalEntry {
    /// The mutated key.
    pub key: Vec<u8>,
    /// `Some(bytes)` for a live write, `None` for a tombstone.
    pub value: Option<Vec<u8>>,
}

/// An append-only, CRC-protected write-ahead log.
///
/// Appends are serialized by an internal mutex around the single shared
/// file handle; recovery opens a second, independent read handle.
pub struct Wal {
    file: Arc<Mutex<File>>,
    path: PathBuf,
}

impl Wal {
    /// Open (creating if absent) the WAL file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)?;
        info!(path = %path.display(), "opened WAL");
        Ok(Self {
            file: Arc::new(Mutex::new(file)),
            path,
        })
    }

    /// Path to the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one mutation durably.
    ///
    /// Builds the full record in memory, computes the integrity check over
    /// the payload, writes it as a single logical write, then forces file
    /// contents and metadata to durable media before returning.
    pub fn append(&self, key: &[u8], value: Option<&[u8]>) -> Result<()> {
        let record = encode_record(key, value);

        let mut guard = self
            .file
            .lock()
            .map_err(|_| WalError::Internal("WAL file mutex poisoned".into()))?;
        guard.seek(SeekFrom::End(0))?;
        guard.write_all(&record)?;
        guard.sync_all()?;
        trace!(key_len = key.len(), "appended WAL record");
        Ok(())
    }

    /// Truncate the file to zero length and force the truncation to disk.
    /// Used after a flush succeeds.
    pub fn clear(&self) -> Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| WalError::Internal("WAL file mutex poisoned".into()))?;
        guard.set_len(0)?;
        guard.seek(SeekFrom::Start(0))?;
        guard.sync_all()?;
        debug!(path = %self.path.display(), "cleared WAL");
        Ok(())
    }

    /// Length of the file in bytes.
    pub fn len(&self) -> Result<u64> {
        let guard = self
            .file
            .lock()
            .map_err(|_| WalError::Internal("WAL file mutex poisoned".into()))?;
        Ok(guard.metadata()?.len())
    }

    /// True if the file is empty.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Read and return every intact entry from the beginning of the file,
    /// stopping at the first truncated tail or checksum mismatch (soft
    /// corruption): all records up to but not including that point are
    /// returned, the rest are discarded.
    pub fn read_all_entries(path: impl AsRef<Path>) -> Result<Vec<WalEntry>> {
        let path = path.as_ref();
        let mut file = match File::open(path) {
            Ok(f) => f,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let len = file.metadata()?.len();
        if len < RECORD_HEADER_SIZE as u64 {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        let mut offset: u64 = 0;
        loop {
            match read_one_record(&mut file, offset)? {
                Some((entry, record_len)) => {
                    entries.push(entry);
                    offset += record_len as u64;
                }
                None => break,
            }
        }

        info!(path = %path.display(), count = entries.len(), "replayed WAL");
        Ok(entries)
    }
}

/// Build the on-disk bytes for one record.
fn encode_record(key: &[u8], value: Option<&[u8]>) -> Vec<u8> {
    let mut payload = Vec::with_capacity(8 + key.len() + value.map_or(0, |v| v.len()));
    encoding::encode_i32(key.len() as i32, &mut payload);
    payload.extend_from_slice(key);
    match value {
        Some(v) => {
            encoding::encode_i32(v.len() as i32, &mut payload);
            payload.extend_from_slice(v);
        }
        None => encoding::encode_i32(-1, &mut payload),
    }

    let crc = compute_crc(&payload);
    let total_size = (4 + 8 + payload.len()) as i32;

    let mut record = Vec::with_capacity(total_size as usize);
    encoding::encode_i32(total_size, &mut record);
    encoding::encode_u64(crc, &mut record);
    record.extend_from_slice(&payload);
    record
}

/// Read one record at `offset`. Returns `(entry, total_record_len)`, or
/// `None` if the tail is truncated or corrupt (recovery should stop here).
fn read_one_record(file: &mut File, offset: u64) -> Result<Option<(WalEntry, usize)>> {
    file.seek(SeekFrom::Start(offset))?;

    let mut header = [0u8; RECORD_HEADER_SIZE];
    if !read_exact_or_eof(file, &mut header)? {
        return Ok(None);
    }

    let (total_size, _) = encoding::decode_i32(&header[0..4])?;
    let (stored_crc, _) = encoding::decode_u64(&header[4..12])?;
    if total_size < RECORD_HEADER_SIZE as i32 {
        warn!(offset, total_size, "WAL record has invalid size, stopping replay");
        return Ok(None);
    }
    let payload_len = total_size as usize - RECORD_HEADER_SIZE;

    let mut payload = vec![0u8; payload_len];
    if !read_exact_or_eof(file, &mut payload)? {
        warn!(offset, "WAL tail truncated, stopping replay");
        return Ok(None);
    }

    let computed_crc = compute_crc(&payload);
    if computed_crc != stored_crc {
        warn!(offset, "WAL checksum mismatch, stopping replay (soft corruption)");
        return Ok(None);
    }

    let (key_len, mut cursor) = encoding::decode_i32(&payload)?;
    if key_len <= 0 {
        warn!(offset, key_len, "WAL record has non-positive key length, stopping replay");
        return Ok(None);
    }
    let key_len = key_len as usize;
    if payload.len() < cursor + key_len {
        warn!(offset, "WAL record key overruns payload, stopping replay");
        return Ok(None);
    }
    let key = payload[cursor..cursor + key_len].to_vec();
    cursor += key_len;

    let (value_len, consumed) = encoding::decode_i32(&payload[cursor..])?;
    cursor += consumed;
    let value = if value_len < 0 {
        None
    } else {
        let value_len = value_len as usize;
        if payload.len() < cursor + value_len {
            warn!(offset, "WAL record value overruns payload, stopping replay");
            return Ok(None);
        }
        Some(payload[cursor..cursor + value_len].to_vec())
    };

    Ok(Some((WalEntry { key, value }, total_size as usize)))
}

/// Read exactly `buf.len()` bytes, returning `Ok(false)` (instead of an
/// error) if the file runs out partway through — a truncated tail.
fn read_exact_or_eof(file: &mut File, buf: &mut [u8]) -> Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = file.read(&mut buf[filled..])?;
        if n == 0 {
            return Ok(false);
        }
        filled += n;
    }
    Ok(true)
}

/// 64-bit integrity check: the payload's 32-bit CRC-32, zero-extended.
fn compute_crc(payload: &[u8]) -> u64 {
    crc32fast::hash(payload) as u64
}
