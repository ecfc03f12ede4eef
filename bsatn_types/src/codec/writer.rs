use super::wide;
use crate::error::EncodeError;
use ethnum::{I256, U256};

const DEFAULT_INITIAL_CAPACITY: usize = 1024;

/// Writes BSATN primitives into an owned, growable buffer.
#[derive(Debug)]
pub struct BsatnWriter {
    buf: Vec<u8>,
}

impl Default for BsatnWriter {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY)
    }
}

impl BsatnWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Bytes written so far; also the offset of the next write.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    /// Doubles the capacity, or grows to exactly what the next write needs if doubling is not enough.
    fn expand_for(&mut self, additional: usize) {
        let min_cap = self.buf.len() + additional;
        if min_cap <= self.buf.capacity() {
            return;
        }
        let new_cap = usize::max(self.buf.capacity() * 2, min_cap);
        self.buf.reserve_exact(new_cap - self.buf.len());
    }

    pub fn put_slice(&mut self, bytes: &[u8]) {
        self.expand_for(bytes.len());
        self.buf.extend_from_slice(bytes);
    }

    pub fn put_bool(&mut self, v: bool) {
        self.put_u8(v as u8);
    }

    pub fn put_u8(&mut self, v: u8) {
        self.put_slice(&v.to_le_bytes());
    }
    pub fn put_i8(&mut self, v: i8) {
        self.put_slice(&v.to_le_bytes());
    }
    pub fn put_u16(&mut self, v: u16) {
        self.put_slice(&v.to_le_bytes());
    }
    pub fn put_i16(&mut self, v: i16) {
        self.put_slice(&v.to_le_bytes());
    }
    pub fn put_u32(&mut self, v: u32) {
        self.put_slice(&v.to_le_bytes());
    }
    pub fn put_i32(&mut self, v: i32) {
        self.put_slice(&v.to_le_bytes());
    }
    pub fn put_u64(&mut self, v: u64) {
        self.put_slice(&v.to_le_bytes());
    }
    pub fn put_i64(&mut self, v: i64) {
        self.put_slice(&v.to_le_bytes());
    }
    pub fn put_f32(&mut self, v: f32) {
        self.put_slice(&v.to_le_bytes());
    }
    pub fn put_f64(&mut self, v: f64) {
        self.put_slice(&v.to_le_bytes());
    }

    pub fn put_u128(&mut self, v: u128) {
        self.expand_for(16);
        for limb in wide::u128_to_limbs(v) {
            self.put_u64(limb);
        }
    }
    pub fn put_i128(&mut self, v: i128) {
        self.expand_for(16);
        let (lo, hi) = wide::i128_to_limbs(v);
        self.put_u64(lo);
        self.put_i64(hi);
    }
    pub fn put_u256(&mut self, v: U256) {
        self.expand_for(32);
        for limb in wide::u256_to_limbs(v) {
            self.put_u64(limb);
        }
    }
    pub fn put_i256(&mut self, v: I256) {
        self.expand_for(32);
        let (lower, top) = wide::i256_to_limbs(v);
        for limb in lower {
            self.put_u64(limb);
        }
        self.put_i64(top);
    }

    /// Writes a `u32` byte count, then the bytes.
    pub fn put_bytes(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        let len =
            u32::try_from(bytes.len()).map_err(|_| EncodeError::LengthOverflow { len: bytes.len() })?;
        self.expand_for(4 + bytes.len());
        self.put_u32(len);
        self.put_slice(bytes);
        Ok(())
    }

    pub fn put_string(&mut self, s: &str) -> Result<(), EncodeError> {
        self.put_bytes(s.as_bytes())
    }

    /// Writes a `u32` element count. Elements follow, written by the caller.
    pub fn put_len(&mut self, len: usize) -> Result<(), EncodeError> {
        let len = u32::try_from(len).map_err(|_| EncodeError::LengthOverflow { len })?;
        self.put_u32(len);
        Ok(())
    }
}
