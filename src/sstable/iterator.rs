//! Forward-scanning entry reader shared by SSTable open-rebuild, point
//! lookup, and range scan.
//!
//! An SSTable file is a flat, header-less sequence of entries (see
//! [`super`]'s module docs for the wire layout). This reader knows only how
//! to pull one entry at a time off any [`Read`] position — callers decide
//! where to start (file start for a full rebuild scan, a sparse-index
//! offset for lookup/range) and when to stop.

use std::io::Read;

use crate::encoding;

use super::SstableError;

/// One decoded on-disk entry plus the byte offset at which it began.
pub struct RawEntry {
    /// Offset of this entry's first byte within the file.
    pub offset: u64,
    /// The entry's key.
    pub key: Vec<u8>,
    /// `Some(bytes)` for a live value, `None` for a tombstone.
    pub value: Option<Vec<u8>>,
}

/// Reads one entry from the current position of `reader`.
///
/// Returns `Ok(None)` on a clean end-of-file (no bytes read before the next
/// entry would start) — the normal way a forward scan terminates. Returns
/// `Err(SstableError::Truncated)` if the stream ends partway through an
/// entry, which indicates a corrupt or torn file.
pub fn read_entry(reader: &mut impl Read, offset: u64) -> Result<Option<RawEntry>, SstableError> {
    let mut key_len_buf = [0u8; 4];
    match read_fully(reader, &mut key_len_buf)? {
        0 => return Ok(None),
        4 => {}
        _ => return Err(SstableError::Truncated),
    }
    let (key_len, _) = encoding::decode_i32(&key_len_buf)?;
    if key_len <= 0 {
        return Err(SstableError::Corrupt(format!(
            "non-positive key length {key_len} at offset {offset}"
        )));
    }

    let mut key = vec![0u8; key_len as usize];
    read_exact_or_truncated(reader, &mut key)?;

    let mut value_len_buf = [0u8; 4];
    read_exact_or_truncated(reader, &mut value_len_buf)?;
    let (value_len, _) = encoding::decode_i32(&value_len_buf)?;

    let value = if value_len < 0 {
        None
    } else {
        let mut buf = vec![0u8; value_len as usize];
        read_exact_or_truncated(reader, &mut buf)?;
        Some(buf)
    };

    Ok(Some(RawEntry { offset, key, value }))
}

/// Total on-disk size of a `RawEntry`, used by callers to advance their
/// running offset between `read_entry` calls.
pub fn encoded_len(entry: &RawEntry) -> u64 {
    (4 + entry.key.len() + 4 + entry.value.as_ref().map_or(0, |v| v.len())) as u64
}

/// Reads into `buf` until full or EOF, returning the number of bytes
/// actually read (short only at a clean EOF between entries).
fn read_fully(reader: &mut impl Read, buf: &mut [u8]) -> Result<usize, SstableError> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

fn read_exact_or_truncated(reader: &mut impl Read, buf: &mut [u8]) -> Result<(), SstableError> {
    let n = read_fully(reader, buf)?;
    if n != buf.len() {
        return Err(SstableError::Truncated);
    }
    Ok(())
}
