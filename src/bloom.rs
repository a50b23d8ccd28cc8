//! Membership filter — a bloom-filter-class "maybe-contains" oracle.
//!
//! Answers "key is definitely absent" / "key might be present" without
//! touching disk. False positives are permitted; false negatives are
//! forbidden by construction — `add` always sets every bit `might_contain`
//! later checks for the same key.
//!
//! # Hashing
//!
//! `k` independent hashes are derived by prefixing the key bytes with the
//! hash index `i ∈ [1, k]` rendered as a decimal string, then applying a
//! single 32-bit cyclic redundancy check and reducing modulo `M`. Because
//! the filter is always rebuilt by scanning the owning SSTable on open,
//! this deterministic scheme automatically matches the on-disk population
//! — `M` and `k` need not be persisted.

use bit_vec::BitVec;

/// A fixed-size bit array with `k` hash functions.
#[derive(Debug, Clone)]
pub struct BloomFilter {
    bits: BitVec,
    k: u32,
}

impl BloomFilter {
    /// Build an empty filter with `m` bits and `k` hash functions.
    pub fn new(m: usize, k: u32) -> Self {
        let m = m.max(1);
        Self {
            bits: BitVec::from_elem(m, false),
            k: k.max(1),
        }
    }

    /// Number of bits in the underlying array.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Mark `key` as possibly present: sets all `k` derived bits.
    pub fn add(&mut self, key: &[u8]) {
        let m = self.bits.len();
        for i in 1..=self.k {
            let idx = Self::hash_index(key, i, m);
            self.bits.set(idx, true);
        }
    }

    /// Returns `false` only if `add(key)` was never called; `true` may be
    /// a false positive.
    pub fn might_contain(&self, key: &[u8]) -> bool {
        let m = self.bits.len();
        for i in 1..=self.k {
            let idx = Self::hash_index(key, i, m);
            if !self.bits.get(idx).unwrap_or(false) {
                return false;
            }
        }
        true
    }

    fn hash_index(key: &[u8], i: u32, m: usize) -> usize {
        let mut hashed = Vec::with_capacity(key.len() + 2);
        hashed.extend_from_slice(i.to_string().as_bytes());
        hashed.extend_from_slice(key);
        let checksum = crc32fast::hash(&hashed) as u64;
        (checksum % m as u64) as usize
    }
}
