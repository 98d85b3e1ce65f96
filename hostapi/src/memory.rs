//! Bounds-checked access to the execution's linear memory.
//!
//! Every host operation moves its arguments and results through
//! [`MemoryAccessor::read`] and [`MemoryAccessor::write`]. Any range that
//! leaves the buffer is a `MemoryFault` and nothing is copied.

use std::ops::Range;

use eei_primitives::{Address, Word, ADDRESS_SIZE_BYTES, U128_SIZE_BYTES};
use eei_primitives::types::u128_from_bytes;

use crate::error::{HostError, HostResult};

/// View over a guest's linear memory for the duration of one host call.
#[derive(Debug)]
pub struct MemoryAccessor<'a> {
    buf: &'a mut [u8],
}

impl<'a> MemoryAccessor<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf }
    }

    /// Size of the memory in bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Validate `[offset, offset + length)` against the buffer.
    fn range(&self, offset: u32, length: u64) -> HostResult<Range<usize>> {
        let start = offset as usize;
        let end = usize::try_from(length)
            .ok()
            .and_then(|len| start.checked_add(len))
            .ok_or_else(HostError::memory_fault)?;
        if end > self.buf.len() {
            return Err(HostError::memory_fault());
        }
        Ok(start..end)
    }

    /// Copy `length` bytes out of memory starting at `offset`.
    pub fn read(&self, offset: u32, length: u32) -> HostResult<Vec<u8>> {
        let range = self.range(offset, u64::from(length))?;
        Ok(self.buf[range].to_vec())
    }

    /// Read a fixed-size array starting at `offset`.
    pub fn read_array<const N: usize>(&self, offset: u32) -> HostResult<[u8; N]> {
        let range = self.range(offset, N as u64)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[range]);
        Ok(out)
    }

    /// Read a 20-byte address.
    pub fn read_address(&self, offset: u32) -> HostResult<Address> {
        self.read_array::<ADDRESS_SIZE_BYTES>(offset)
    }

    /// Read a 32-byte word.
    pub fn read_word(&self, offset: u32) -> HostResult<Word> {
        self.read_array::<32>(offset)
    }

    /// Read a 16-byte big-endian value.
    pub fn read_u128(&self, offset: u32) -> HostResult<u128> {
        let bytes = self.read_array::<U128_SIZE_BYTES>(offset)?;
        u128_from_bytes(&bytes).ok_or_else(HostError::memory_fault)
    }

    /// Copy `bytes` into memory starting at `offset`.
    pub fn write(&mut self, offset: u32, bytes: &[u8]) -> HostResult<()> {
        let range = self.range(offset, bytes.len() as u64)?;
        self.buf[range].copy_from_slice(bytes);
        Ok(())
    }

    /// Fill `[offset, offset + length)` with `bytes`, zero-filling whatever
    /// `bytes` does not cover. Extra source bytes beyond `length` are ignored.
    pub fn write_padded(&mut self, offset: u32, length: u32, bytes: &[u8]) -> HostResult<()> {
        let range = self.range(offset, u64::from(length))?;
        let dest = &mut self.buf[range];
        let n = bytes.len().min(dest.len());
        dest[..n].copy_from_slice(&bytes[..n]);
        dest[n..].fill(0);
        Ok(())
    }
}

/// Slice `source[offset .. offset + length]`, clamped to the source bounds.
pub fn clamped_slice(source: &[u8], offset: u64, length: u64) -> &[u8] {
    let start = usize::try_from(offset).unwrap_or(usize::MAX).min(source.len());
    let len = usize::try_from(length).unwrap_or(usize::MAX);
    let end = start.saturating_add(len).min(source.len());
    &source[start..end]
}
