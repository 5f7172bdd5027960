//! Bump allocation over frame memory

use crate::context::ExecutionContext;
use crate::error::VmResult;

/// Word granularity of allocations
const ALIGN: usize = 32;

/// Bump allocator owning a cursor into a frame's memory.
///
/// Replaces the convention of keeping the next-free offset as data at
/// a fixed location inside the memory it manages: the cursor lives
/// here, out of reach of ordinary memory writes.
#[derive(Clone, Debug, Default)]
pub struct BumpAllocator {
    cursor: usize,
}

impl BumpAllocator {
    /// Allocator starting at offset zero
    pub fn new() -> Self {
        Self { cursor: 0 }
    }

    /// Allocator starting at `base`, rounded up to the word boundary
    pub fn with_base(base: usize) -> Self {
        Self {
            cursor: base.div_ceil(ALIGN).saturating_mul(ALIGN),
        }
    }

    /// Next offset to be handed out
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Reserve `len` bytes of frame memory and return their offset.
    ///
    /// Expansion is charged through the context's meter; the cursor
    /// advances by `len` rounded up to the word boundary, and stays
    /// where it was when the charge fails.
    pub fn alloc(&mut self, ctx: &mut ExecutionContext, len: usize) -> VmResult<usize> {
        let offset = self.cursor;
        ctx.memory_reserve(offset, len)?;
        self.cursor = offset.saturating_add(len.div_ceil(ALIGN).saturating_mul(ALIGN));
        Ok(offset)
    }
}
