//! Deterministic big-endian binary encoding shared by the WAL and SSTable
//! wire formats.
//!
//! Both on-disk formats use the same two primitives — a 4-byte
//! big-endian signed length (where `-1` is a reserved sentinel for "value
//! absent") and raw byte blocks — so they are factored out here rather
//! than duplicated in `wal` and `sstable`.
//!
//! # Wire format
//!
//! | Rust type | Encoding                     |
//! |-----------|------------------------------|
//! | `i32`     | 4 bytes, big-endian, signed  |
//! | `u32`     | 4 bytes, big-endian          |
//! | `u64`     | 8 bytes, big-endian          |
//!
//! All multi-byte integers are **big-endian**, matching the reference
//! behavior this format is required to reproduce exactly.
//!
//! # Zero-panic guarantee
//!
//! No function in this module uses `unwrap()`, `expect()`, or any other
//! panicking path. All errors are propagated via [`EncodingError`].

use thiserror::Error;

/// Errors produced while decoding a fixed-width field from a byte buffer.
#[derive(Debug, Error)]
pub enum EncodingError {
    /// The buffer ran out of bytes before decoding completed.
    #[error("unexpected end of buffer (need {needed} bytes, have {available})")]
    UnexpectedEof {
        /// Bytes required to continue decoding.
        needed: usize,
        /// Bytes actually remaining.
        available: usize,
    },
}

#[inline]
fn require(buf: &[u8], needed: usize) -> Result<(), EncodingError> {
    if buf.len() < needed {
        Err(EncodingError::UnexpectedEof {
            needed,
            available: buf.len(),
        })
    } else {
        Ok(())
    }
}

/// Encode a signed 32-bit length field as 4 big-endian bytes.
#[inline]
pub fn encode_i32(value: i32, buf: &mut Vec<u8>) {
    buf.extend_from_slice(&value.to_be_bytes());
}

/// Decode a signed 32-bit length field from the front of `buf`.
///
/// Returns `(value, 4)` on success.
#[inline]
pub fn decode_i32(buf: &[u8]) -> Result<(i32, usize), EncodingError> {
    require(buf, 4)?;
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[..4]);
    Ok((i32::from_be_bytes(bytes), 4))
}

/// Encode a 32-bit unsigned value as 4 big-endian bytes.
#[inline]
pub fn encode_u32(value: u32, buf: &mut Vec<u8>) {
    buf.extend_from_slice(&value.to_be_bytes());
}

/// Decode a 32-bit unsigned value from the front of `buf`.
#[inline]
pub fn decode_u32(buf: &[u8]) -> Result<(u32, usize), EncodingError> {
    require(buf, 4)?;
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[..4]);
    Ok((u32::from_be_bytes(bytes), 4))
}

/// Encode a 64-bit unsigned value as 8 big-endian bytes.
#[inline]
pub fn encode_u64(value: u64, buf: &mut Vec<u8>) {
    buf.extend_from_slice(&value.to_be_bytes());
}

/// Decode a 64-bit unsigned value from the front of `buf`.
#[inline]
pub fn decode_u64(buf: &[u8]) -> Result<(u64, usize), EncodingError> {
    require(buf, 8)?;
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[..8]);
    Ok((u64::from_be_bytes(bytes), 8))
}
