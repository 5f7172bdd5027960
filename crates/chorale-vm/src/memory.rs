//! Frame memory

use chorale_primitives::Word;

/// Word size in bytes; memory length is always a multiple of this
const WORD_SIZE: usize = 32;

/// Byte-addressable frame memory.
///
/// Starts empty, grows in zero-filled 32-byte steps, never shrinks,
/// and is discarded with the frame. Growth itself is unpriced here:
/// callers compute the target with [`Memory::required_size`], charge
/// the expansion through the gas meter, and only then call
/// [`Memory::grow`].
#[derive(Clone, Debug, Default)]
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    /// Create new empty memory
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Current length in bytes (always a multiple of 32)
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if no byte has been touched yet
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Length the buffer must reach so `[offset, offset + len)` fits,
    /// rounded up to the word boundary; the current length when the
    /// range already fits or `len` is zero. The end offset saturates,
    /// so oversized ranges price out through the gas formula instead
    /// of wrapping.
    pub fn required_size(&self, offset: usize, len: usize) -> usize {
        if len == 0 {
            return self.data.len();
        }
        let end = offset.saturating_add(len);
        if end <= self.data.len() {
            return self.data.len();
        }
        end.div_ceil(WORD_SIZE).saturating_mul(WORD_SIZE)
    }

    /// Zero-fill the buffer out to `target` bytes; never shrinks
    pub fn grow(&mut self, target: usize) {
        if target > self.data.len() {
            self.data.resize(target, 0);
        }
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

    /// Store `data` at `offset`, expanding first as needed
    pub fn write(&mut self, offset: usize, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        let target = self.required_size(offset, data.len());
        self.grow(target);
        self.data[offset..offset + data.len()].copy_from_slice(data);
    }

    /// Store a single byte at `offset`, expanding first as needed.
    /// The offset itself need not be word-aligned; only the expansion is.
    pub fn write_byte(&mut self, offset: usize, byte: u8) {
        let target = self.required_size(offset, 1);
        self.grow(target);
        self.data[offset] = byte;
    }

    /// Load the 32-byte big-endian word at `offset`, zero-padded past the end
    pub fn load_word(&self, offset: usize) -> Word {
        let mut bytes = [0u8; 32];
        if offset < self.data.len() {
            let end = offset.saturating_add(32).min(self.data.len());
            bytes[..end - offset].copy_from_slice(&self.data[offset..end]);
        }
        Word::from_bytes(bytes)
    }

    /// Store a 32-byte big-endian word at `offset`
    pub fn store_word(&mut self, offset: usize, value: &Word) {
        self.write(offset, value.as_bytes());
    }

    /// Raw view of the touched bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}
