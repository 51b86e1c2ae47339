//! Lazily-materialized byte memory with quadratic expansion gas (§3, §4.6).

use alloy_primitives::{Bytes, U256};

use crate::{error::FailureKind, types::Word};

/// Upper bound on any single offset/length the interpreter will consider
/// expanding to, independent of gas. Chosen well above anything a real gas
/// budget could afford (the gas check below always bites first), but finite
/// so a crafted `offset + length` doesn't overflow `usize` on 32-bit targets.
const MAX_MEMORY_SIZE: u64 = 1 << 32;

/// Byte-addressable scratch space owned by one [`crate::frame::Frame`].
#[derive(Debug, Clone, Default)]
pub struct Memory {
    buf: Vec<u8>,
}

/// `C(w) = 3w + floor(w^2 / 512)` (§4.6), word count `w`.
#[inline]
const fn expansion_cost(words: u64) -> u64 {
    3 * words + (words * words) / 512
}

impl Memory {
    /// Creates an empty memory buffer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Current size in bytes; always a multiple of 32 (§8 invariant 2).
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Computes the incremental gas cost (beyond what's already been
    /// charged for the current size) to grow memory so that
    /// `[offset, offset+length)` is addressable, without performing the
    /// growth. Returns `0` for a zero-length range (§4.6: "Zero-length
    /// operations never expand").
    pub fn expansion_gas(&self, offset: u64, length: u64) -> Result<u64, FailureKind> {
        if length == 0 {
            return Ok(0);
        }
        let end = offset.checked_add(length).ok_or(FailureKind::OutOfMemory)?;
        if end > MAX_MEMORY_SIZE {
            return Err(FailureKind::OutOfMemory);
        }
        let current_words = (self.buf.len() as u64).div_ceil(32);
        if end <= current_words * 32 {
            return Ok(0);
        }
        let new_words = end.div_ceil(32);
        Ok(expansion_cost(new_words) - expansion_cost(current_words))
    }

    /// Grows the buffer to cover `[offset, offset+length)`, zero-filling
    /// the new region. Callers must have already charged
    /// [`Memory::expansion_gas`] for the same range.
    pub fn resize(&mut self, offset: u64, length: u64) {
        if length == 0 {
            return;
        }
        let end = offset + length;
        let new_words = end.div_ceil(32);
        let new_len = (new_words * 32) as usize;
        if new_len > self.buf.len() {
            self.buf.resize(new_len, 0);
        }
    }

    /// Reads a 32-byte word at `offset`, growing memory first if needed.
    /// The caller charges [`Memory::expansion_gas`] before calling this.
    pub fn load_word(&mut self, offset: u64) -> Word {
        self.resize(offset, 32);
        let start = offset as usize;
        U256::from_be_slice(&self.buf[start..start + 32])
    }

    /// Writes a 32-byte big-endian word at `offset`.
    pub fn store_word(&mut self, offset: u64, value: Word) {
        self.resize(offset, 32);
        let start = offset as usize;
        self.buf[start..start + 32].copy_from_slice(&value.to_be_bytes::<32>());
    }

    /// Writes a single byte at `offset` (`MSTORE8`).
    pub fn store_byte(&mut self, offset: u64, value: u8) {
        self.resize(offset, 1);
        self.buf[offset as usize] = value;
    }

    /// Copies an arbitrary-length slice out of memory, zero-padding any
    /// portion beyond the buffer's current length in place rather than
    /// growing it (used by handlers that read without writing, e.g. the
    /// source operand of `CALLDATACOPY`'s destination region vs. its own
    /// memory target — those always grow via [`Memory::resize`] first).
    pub fn load_range(&self, offset: u64, length: u64) -> Bytes {
        if length == 0 {
            return Bytes::new();
        }
        let start = offset as usize;
        let end = start + length as usize;
        let mut out = vec![0u8; length as usize];
        if start < self.buf.len() {
            let copy_end = end.min(self.buf.len());
            out[..copy_end - start].copy_from_slice(&self.buf[start..copy_end]);
        }
        Bytes::from(out)
    }

    /// Writes `data` into `[offset, offset+length)`, zero-padding (or
    /// truncating) `data` to `length` first — the shape every `*COPY`
    /// opcode needs.
    pub fn store_range(&mut self, offset: u64, length: u64, data: &[u8]) {
        if length == 0 {
            return;
        }
        self.resize(offset, length);
        let start = offset as usize;
        let copy_len = data.len().min(length as usize);
        self.buf[start..start + copy_len].copy_from_slice(&data[..copy_len]);
        for b in &mut self.buf[start + copy_len..start + length as usize] {
            *b = 0;
        }
    }

    /// `MSIZE`: current word-aligned size in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}
