//! SSTable writer — serializes a sorted entry stream to a flat, header-less
//! file.
//!
//! The caller (the engine's flush protocol) is responsible for the
//! write-to-scratch-then-rename dance; this module only knows how to turn
//! an already-sorted iterator of entries into the on-disk byte layout and
//! force it durable. The sparse index and membership filter are not built
//! here — they are rebuilt uniformly by [`super::SsTable::open`], whether
//! the file was just written or is being loaded from a prior run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::encoding;

use super::SstableError;

/// Write `entries` (already sorted ascending by key, no duplicates) to
/// `path`, truncating/creating the file, then fsync it to durable media.
pub fn write(
    path: impl AsRef<Path>,
    entries: impl IntoIterator<Item = (Vec<u8>, Option<Vec<u8>>)>,
) -> Result<(), SstableError> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);

    for (key, value) in entries {
        encode_entry(&mut writer, &key, value.as_deref())?;
    }

    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(())
}

fn encode_entry(
    writer: &mut impl Write,
    key: &[u8],
    value: Option<&[u8]>,
) -> Result<(), SstableError> {
    let mut buf = Vec::with_capacity(8 + key.len() + value.map_or(0, |v| v.len()));
    encoding::encode_i32(key.len() as i32, &mut buf);
    buf.extend_from_slice(key);
    match value {
        Some(v) => {
            encoding::encode_i32(v.len() as i32, &mut buf);
            buf.extend_from_slice(v);
        }
        None => encoding::encode_i32(-1, &mut buf),
    }
    writer.write_all(&buf)?;
    Ok(())
}
