use super::wide;
use crate::error::DecodeError;
use ethnum::{I256, U256};
use std::mem;

/// How many elements that occupy no bytes one reader accepts in total.
pub const DEFAULT_EMPTY_ELEMENT_LIMIT: usize = 1 << 20;

/// Reads BSATN primitives from a borrowed buffer.
///
/// Every read is bounds-checked against the remaining bytes. A failed read
/// leaves the cursor where it was.
#[derive(Clone, Debug)]
pub struct BsatnReader<'a> {
    buf: &'a [u8],
    offset: usize,
    empty_elements_left: usize,
}

impl<'a> BsatnReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            offset: 0,
            empty_elements_left: DEFAULT_EMPTY_ELEMENT_LIMIT,
        }
    }

    pub fn with_empty_element_limit(self, limit: usize) -> Self {
        Self {
            empty_elements_left: limit,
            ..self
        }
    }

    /// Vets an element count read off the wire, before that many elements are decoded.
    ///
    /// Elements of at least `min_elem_len` bytes must all fit in what is left of
    /// the buffer. Elements that may be empty are charged against the reader's
    /// empty-element budget instead, since the buffer cannot bound them.
    pub fn check_count(&mut self, count: usize, min_elem_len: usize) -> Result<(), DecodeError> {
        if min_elem_len > 0 {
            if count > self.remaining() / min_elem_len {
                return Err(DecodeError::CountExceedsInput {
                    count,
                    min_elem_len,
                    offset: self.offset,
                    remaining: self.remaining(),
                });
            }
        } else {
            if count > self.empty_elements_left {
                return Err(DecodeError::TooManyEmptyElements {
                    count,
                    limit: self.empty_elements_left,
                });
            }
            self.empty_elements_left -= count;
        }
        Ok(())
    }

    /// Byte offset of the cursor from the start of the buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Borrows the next `len` bytes and advances past them.
    pub fn get_slice(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if len > self.remaining() {
            return Err(DecodeError::OutOfBounds {
                needed: len,
                offset: self.offset,
                len: self.buf.len(),
            });
        }
        let slice = &self.buf[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn get_array<const LEN: usize>(&mut self) -> Result<[u8; LEN], DecodeError> {
        let mut arr = [0u8; LEN];
        arr.copy_from_slice(self.get_slice(LEN)?);
        Ok(arr)
    }

    pub fn get_bool(&mut self) -> Result<bool, DecodeError> {
        Ok(self.get_u8()? != 0)
    }

    pub fn get_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(u8::from_le_bytes(self.get_array()?))
    }
    pub fn get_i8(&mut self) -> Result<i8, DecodeError> {
        Ok(i8::from_le_bytes(self.get_array()?))
    }
    pub fn get_u16(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_le_bytes(self.get_array()?))
    }
    pub fn get_i16(&mut self) -> Result<i16, DecodeError> {
        Ok(i16::from_le_bytes(self.get_array()?))
    }
    pub fn get_u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.get_array()?))
    }
    pub fn get_i32(&mut self) -> Result<i32, DecodeError> {
        Ok(i32::from_le_bytes(self.get_array()?))
    }
    pub fn get_u64(&mut self) -> Result<u64, DecodeError> {
        Ok(u64::from_le_bytes(self.get_array()?))
    }
    pub fn get_i64(&mut self) -> Result<i64, DecodeError> {
        Ok(i64::from_le_bytes(self.get_array()?))
    }
    pub fn get_f32(&mut self) -> Result<f32, DecodeError> {
        Ok(f32::from_le_bytes(self.get_array()?))
    }
    pub fn get_f64(&mut self) -> Result<f64, DecodeError> {
        Ok(f64::from_le_bytes(self.get_array()?))
    }

    /* Wide integers. The whole width is bounds-checked before any limb is consumed. */

    pub fn get_u128(&mut self) -> Result<u128, DecodeError> {
        let mut limbs = self.limbs::<2>()?;
        Ok(wide::u128_from_limbs([limbs.next_u64(), limbs.next_u64()]))
    }
    pub fn get_i128(&mut self) -> Result<i128, DecodeError> {
        let mut limbs = self.limbs::<2>()?;
        let lo = limbs.next_u64();
        let hi = limbs.next_i64();
        Ok(wide::i128_from_limbs(lo, hi))
    }
    pub fn get_u256(&mut self) -> Result<U256, DecodeError> {
        let mut limbs = self.limbs::<4>()?;
        let ps = [
            limbs.next_u64(),
            limbs.next_u64(),
            limbs.next_u64(),
            limbs.next_u64(),
        ];
        Ok(wide::u256_from_limbs(ps))
    }
    pub fn get_i256(&mut self) -> Result<I256, DecodeError> {
        let mut limbs = self.limbs::<4>()?;
        let lower = [limbs.next_u64(), limbs.next_u64(), limbs.next_u64()];
        let top = limbs.next_i64();
        Ok(wide::i256_from_limbs(lower, top))
    }

    fn limbs<const N: usize>(&mut self) -> Result<Limbs<'a>, DecodeError> {
        let body = self.get_slice(N * mem::size_of::<u64>())?;
        Ok(Limbs { body })
    }

    /* Length-prefixed. */

    pub fn get_bytes(&mut self) -> Result<Vec<u8>, DecodeError> {
        Ok(self.get_byte_slice()?.to_vec())
    }

    /// Like [`Self::get_bytes`], without copying.
    pub fn get_byte_slice(&mut self) -> Result<&'a [u8], DecodeError> {
        let start = self.offset;
        let len = self.get_u32()? as usize;
        self.get_slice(len).map_err(|e| {
            self.offset = start;
            e
        })
    }

    pub fn get_string(&mut self) -> Result<String, DecodeError> {
        let body = self.get_bytes()?;
        Ok(String::from_utf8(body)?)
    }
}

/// A bounds-checked run of 64-bit limbs.
struct Limbs<'a> {
    body: &'a [u8],
}
impl<'a> Limbs<'a> {
    fn next_word(&mut self) -> [u8; 8] {
        let (word, rest) = self.body.split_at(mem::size_of::<u64>());
        self.body = rest;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(word);
        arr
    }
    fn next_u64(&mut self) -> u64 {
        u64::from_le_bytes(self.next_word())
    }
    fn next_i64(&mut self) -> i64 {
        i64::from_le_bytes(self.next_word())
    }
}
