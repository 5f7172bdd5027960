//! Read-only call input

use crate::memory::Memory;
use bytes::Bytes;
use chorale_primitives::Word;

/// Immutable input buffer supplied at frame entry.
///
/// Its length is fixed for the frame's duration and reads past the
/// end are zero-padded, never an error. Backed by [`Bytes`], so the
/// caller's buffer is shared rather than copied and may outlive the
/// frame.
#[derive(Clone, Debug, Default)]
pub struct Calldata {
    data: Bytes,
}

impl Calldata {
    /// Wrap an input buffer
    pub fn new(data: Bytes) -> Self {
        Self { data }
    }

    /// Fixed buffer length
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Read the 32-byte big-endian word at `offset`; any byte position
    /// at or past the end reads as zero, including an offset entirely
    /// beyond the buffer
    pub fn load_word(&self, offset: usize) -> Word {
        let mut bytes = [0u8; 32];
        if offset < self.data.len() {
            let end = offset.saturating_add(32).min(self.data.len());
            bytes[..end - offset].copy_from_slice(&self.data[offset..end]);
        }
        Word::from_bytes(bytes)
    }

    /// Read exactly `len` bytes from `offset`, zero-padded past the end
    pub fn read(&self, offset: usize, len: usize) -> Vec<u8> {
        if len == 0 {
            return Vec::new();
        }
        let mut out = vec![0u8; len];
        if offset < self.data.len() {
            let end = offset.saturating_add(len).min(self.data.len());
            out[..end - offset].copy_from_slice(&self.data[offset..end]);
        }
        out
    }

    /// Copy `len` bytes from `src_offset` (zero-padded past the end)
    /// into `memory` at `mem_offset`. Expansion cost for the
    /// destination range is the caller's to charge; the input buffer
    /// itself never expands and is never charged.
    pub fn copy_to(&self, memory: &mut Memory, mem_offset: usize, src_offset: usize, len: usize) {
        if len == 0 {
            return;
        }
        let data = self.read(src_offset, len);
        memory.write(mem_offset, &data);
    }

    /// Raw view of the buffer
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl From<Bytes> for Calldata {
    fn from(data: Bytes) -> Self {
        Self::new(data)
    }
}

impl From<Vec<u8>> for Calldata {
    fn from(data: Vec<u8>) -> Self {
        Self::new(Bytes::from(data))
    }
}
