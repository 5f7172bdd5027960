//! Gas metering and cost rules

use crate::error::{VmError, VmResult};
use crate::storage::StoreKind;

/// Gas cost constants.
///
/// These are versioned policy constants, not tuning knobs: changing
/// any of them changes observable metering behavior for every caller
/// built on this engine.
pub mod cost {
    /// Base cost for cheap environment reads
    pub const BASE: u64 = 2;
    /// Cost of the cheap stack and data-motion operations
    pub const VERYLOW: u64 = 3;

    /// Linear memory cost per 32-byte word
    pub const MEMORY: u64 = 3;
    /// Divisor of the quadratic memory term
    pub const QUAD_DIVISOR: u64 = 512;
    /// Copy cost per 32-byte word
    pub const COPY: u64 = 3;

    /// Base hashing cost
    pub const KECCAK: u64 = 30;
    /// Hashing cost per 32-byte word of input
    pub const KECCAK_WORD: u64 = 6;

    /// Storage read cost
    pub const SLOAD: u64 = 100;
    /// Storage write: fresh non-zero value into a zero slot
    pub const SSTORE_SET: u64 = 20_000;
    /// Storage write: replacing an existing non-zero value
    pub const SSTORE_RESET: u64 = 2_900;
    /// Storage write: value unchanged
    pub const SSTORE_NOOP: u64 = 100;
    /// Refund counter credit for clearing a non-zero slot
    pub const SSTORE_CLEAR_REFUND: u64 = 4_800;

    /// Max stack depth
    pub const MAX_STACK_SIZE: usize = 1024;
}

/// Tracks the gas budget of one call frame.
///
/// The budget only decreases. A charge that would overdraw it is
/// rejected in full, before the caller applies any side effect.
#[derive(Clone, Debug)]
pub struct GasMeter {
    limit: u64,
    remaining: u64,
}

impl GasMeter {
    /// Create a meter with the given budget
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            remaining: limit,
        }
    }

    /// Charge `amount`, failing with `OutOfGas` when it exceeds the rest
    pub fn charge(&mut self, amount: u64) -> VmResult<()> {
        if amount > self.remaining {
            tracing::debug!(amount, remaining = self.remaining, "charge exceeds budget");
            return Err(VmError::OutOfGas);
        }
        self.remaining -= amount;
        Ok(())
    }

    /// Gas still available
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Gas consumed so far
    pub fn used(&self) -> u64 {
        self.limit - self.remaining
    }

    /// Initial budget
    pub fn limit(&self) -> u64 {
        self.limit
    }
}

/// Storage write cost tiers, keyed by transition kind.
///
/// The engine's obligation is classification; the tier numbers are an
/// external policy concern and are pluggable per frame. The defaults
/// are the canonical tiers callers interoperating with the EVM gas
/// schedule expect.
#[derive(Clone, Debug)]
pub struct StorageCostTable {
    /// Reading a slot
    pub load: u64,
    /// Write that leaves the slot value unchanged
    pub noop: u64,
    /// First non-zero write into a zero slot
    pub create: u64,
    /// Overwriting one non-zero value with another
    pub update: u64,
    /// Clearing a non-zero slot back to zero
    pub clear: u64,
    /// Refund counter credit earned by a clear
    pub clear_refund: u64,
}

impl Default for StorageCostTable {
    fn default() -> Self {
        Self {
            load: cost::SLOAD,
            noop: cost::SSTORE_NOOP,
            create: cost::SSTORE_SET,
            update: cost::SSTORE_RESET,
            clear: cost::SSTORE_RESET,
            clear_refund: cost::SSTORE_CLEAR_REFUND,
        }
    }
}

impl StorageCostTable {
    /// Cost of a write with the given classification
    pub fn write_cost(&self, kind: StoreKind) -> u64 {
        match kind {
            StoreKind::Noop => self.noop,
            StoreKind::Create => self.create,
            StoreKind::Update => self.update,
            StoreKind::Clear => self.clear,
        }
    }
}

/// Memory cost for a number of 32-byte words.
///
/// Evaluated in 128 bits and clamped, so absurd sizes price out
/// instead of wrapping.
fn memory_word_cost(words: u64) -> u64 {
    let words = words as u128;
    let total =
        (cost::MEMORY as u128) * words + words * words / (cost::QUAD_DIVISOR as u128);
    total.min(u64::MAX as u128) as u64
}

/// Expansion charge for growing memory from `current` to `target` bytes.
///
/// Sizes are priced in 32-byte words with `cost(w) = 3*w + w*w/512`;
/// the charge is `cost(target) - cost(current)`. Growing to a size
/// already covered charges nothing.
pub fn memory_gas(current: usize, target: usize) -> u64 {
    if target <= current {
        return 0;
    }
    let new_words = target.div_ceil(32) as u64;
    let old_words = current.div_ceil(32) as u64;
    memory_word_cost(new_words).saturating_sub(memory_word_cost(old_words))
}

/// Copy charge for moving `len` bytes, rounded up to whole words
pub fn copy_gas(len: usize) -> u64 {
    cost::COPY.saturating_mul(len.div_ceil(32) as u64)
}

/// Hashing charge for `len` bytes of input, rounded up to whole words
pub fn hash_gas(len: usize) -> u64 {
    cost::KECCAK.saturating_add(cost::KECCAK_WORD.saturating_mul(len.div_ceil(32) as u64))
}
