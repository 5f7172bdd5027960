//! Per-frame execution context

use crate::calldata::Calldata;
use crate::error::VmResult;
use crate::gas::{self, cost, GasMeter, StorageCostTable};
use crate::memory::Memory;
use crate::stack::Stack;
use crate::storage::{StorageHandle, StoreKind};
use chorale_crypto::keccak256;
use chorale_primitives::{Word, H256};

/// Execution context of one call frame.
///
/// Bundles the operand stack, frame memory, the frame's input buffer,
/// a handle to the owning account's storage, and the gas meter. The
/// context is passed explicitly to every operation; there is no
/// ambient frame state, so nested and reentrant frames coexist with
/// clear ownership.
///
/// Each primitive charges its full cost before touching the data area
/// it names; a rejected charge leaves that area exactly as it was,
/// while the effects of earlier primitives stay committed. Operations
/// take effect in strict program order.
#[derive(Debug)]
pub struct ExecutionContext {
    stack: Stack,
    memory: Memory,
    calldata: Calldata,
    storage: StorageHandle,
    gas: GasMeter,
    costs: StorageCostTable,
    refund_eligible: bool,
}

impl ExecutionContext {
    /// Create a frame over the given input, storage, and gas budget
    pub fn new(calldata: impl Into<Calldata>, storage: StorageHandle, gas_budget: u64) -> Self {
        let calldata = calldata.into();
        tracing::debug!(gas_budget, calldata_len = calldata.size(), "frame created");
        Self {
            stack: Stack::new(),
            memory: Memory::new(),
            calldata,
            storage,
            gas: GasMeter::new(gas_budget),
            costs: StorageCostTable::default(),
            refund_eligible: false,
        }
    }

    /// Replace the storage cost tiers for this frame
    pub fn with_costs(mut self, costs: StorageCostTable) -> Self {
        self.costs = costs;
        self
    }

    // ==================== Stack ====================

    /// Push `value`, charging the caller-supplied constant first
    pub fn push(&mut self, value: Word, gas_cost: u64) -> VmResult<()> {
        self.gas.charge(gas_cost)?;
        self.stack.push(value)
    }

    /// Pop the top word
    pub fn pop(&mut self, gas_cost: u64) -> VmResult<Word> {
        self.gas.charge(gas_cost)?;
        self.stack.pop()
    }

    /// Read the word at `depth` (0 = top) without removing it
    pub fn peek(&mut self, depth: usize, gas_cost: u64) -> VmResult<Word> {
        self.gas.charge(gas_cost)?;
        self.stack.peek(depth)
    }

    /// Duplicate the element at `depth` (1 = top) onto the top
    pub fn dup(&mut self, depth: usize, gas_cost: u64) -> VmResult<()> {
        self.gas.charge(gas_cost)?;
        self.stack.dup(depth)
    }

    /// Exchange the top with the element `depth` positions below it
    pub fn swap(&mut self, depth: usize, gas_cost: u64) -> VmResult<()> {
        self.gas.charge(gas_cost)?;
        self.stack.swap(depth)
    }

    // ==================== Memory ====================

    /// Charge for and perform the expansion covering `[offset, offset+len)`
    fn expand_memory(&mut self, offset: usize, len: usize) -> VmResult<()> {
        let target = self.memory.required_size(offset, len);
        self.gas.charge(gas::memory_gas(self.memory.len(), target))?;
        self.memory.grow(target);
        Ok(())
    }

    /// Read `len` bytes at `offset`, expanding (and charging) first.
    ///
    /// A read never fails on bounds; only an unpayable expansion fails.
    pub fn memory_read(&mut self, offset: usize, len: usize) -> VmResult<Vec<u8>> {
        self.expand_memory(offset, len)?;
        Ok(self.memory.read(offset, len))
    }

    /// Write `data` at `offset`, expanding (and charging) first
    pub fn memory_write(&mut self, offset: usize, data: &[u8]) -> VmResult<()> {
        self.expand_memory(offset, data.len())?;
        self.memory.write(offset, data);
        Ok(())
    }

    /// Write one byte at `offset`, expanding (and charging) first
    pub fn memory_write_byte(&mut self, offset: usize, byte: u8) -> VmResult<()> {
        self.expand_memory(offset, 1)?;
        self.memory.write_byte(offset, byte);
        Ok(())
    }

    /// Expand memory to cover `[offset, offset+len)` without storing
    /// anything, charging the expansion; used by allocation helpers
    pub fn memory_reserve(&mut self, offset: usize, len: usize) -> VmResult<()> {
        self.expand_memory(offset, len)
    }

    /// Current memory length in bytes
    pub fn memory_len(&self) -> usize {
        self.memory.len()
    }

    // ==================== Calldata ====================

    /// Input buffer length; charges the base constant
    pub fn calldata_size(&mut self) -> VmResult<usize> {
        self.gas.charge(cost::BASE)?;
        Ok(self.calldata.size())
    }

    /// Big-endian word at `offset` of the input, zero-padded past the end
    pub fn calldata_load(&mut self, offset: usize) -> VmResult<Word> {
        self.gas.charge(cost::VERYLOW)?;
        Ok(self.calldata.load_word(offset))
    }

    /// Copy `len` input bytes (zero-padded past the end) into memory at
    /// `mem_offset`.
    ///
    /// The static cost, the destination expansion, and the per-word
    /// copy cost are charged as one amount before any byte moves; the
    /// input buffer itself is never charged.
    pub fn calldata_copy(
        &mut self,
        mem_offset: usize,
        src_offset: usize,
        len: usize,
    ) -> VmResult<()> {
        let target = self.memory.required_size(mem_offset, len);
        let expansion = gas::memory_gas(self.memory.len(), target);
        self.gas.charge(
            cost::VERYLOW
                .saturating_add(expansion)
                .saturating_add(gas::copy_gas(len)),
        )?;
        self.memory.grow(target);
        self.calldata
            .copy_to(&mut self.memory, mem_offset, src_offset, len);
        Ok(())
    }

    // ==================== Storage ====================

    /// Read the storage slot at `key`
    pub fn storage_load(&mut self, key: &Word) -> VmResult<Word> {
        self.gas.charge(self.costs.load)?;
        Ok(self.storage.load(key))
    }

    /// Write `value` at `key`.
    ///
    /// The write is classified from the slot's prior value, the
    /// matching tier is charged, and only then does the slot change.
    /// Returns the classification so an external accounting layer can
    /// track refunds.
    pub fn storage_store(&mut self, key: Word, value: Word) -> VmResult<StoreKind> {
        let kind = StoreKind::from_transition(self.storage.load(&key), value);
        self.gas.charge(self.costs.write_cost(kind))?;
        self.storage.store(key, value);
        self.refund_eligible = kind.is_refund_eligible();
        tracing::trace!(?kind, "storage write");
        Ok(kind)
    }

    /// Whether the most recent `storage_store` cleared a non-zero slot
    /// (the refund-eligible transition); updated on every store
    pub fn took_refund_eligible_path(&self) -> bool {
        self.refund_eligible
    }

    // ==================== Hashing ====================

    /// Hash `data`, charging the base-plus-per-word cost first
    pub fn hash(&mut self, data: &[u8]) -> VmResult<H256> {
        self.gas.charge(gas::hash_gas(data.len()))?;
        Ok(keccak256(data))
    }

    /// Hash `len` memory bytes at `offset`, charging the expansion and
    /// the hashing cost together before reading
    pub fn hash_memory(&mut self, offset: usize, len: usize) -> VmResult<H256> {
        let target = self.memory.required_size(offset, len);
        let expansion = gas::memory_gas(self.memory.len(), target);
        self.gas
            .charge(expansion.saturating_add(gas::hash_gas(len)))?;
        self.memory.grow(target);
        Ok(keccak256(&self.memory.read(offset, len)))
    }

    // ==================== Introspection and teardown ====================

    /// Gas still available to this frame
    pub fn gas_remaining(&self) -> u64 {
        self.gas.remaining()
    }

    /// Gas consumed by this frame so far
    pub fn gas_used(&self) -> u64 {
        self.gas.used()
    }

    /// The frame's operand stack
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// The frame's memory
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// The frame's input buffer
    pub fn calldata(&self) -> &Calldata {
        &self.calldata
    }

    /// Tear the frame down, releasing its stack and memory; returns
    /// the gas used. Storage outlives the frame through the caller's
    /// handle clones.
    pub fn discard(self) -> u64 {
        let used = self.gas.used();
        tracing::trace!(gas_used = used, "frame discarded");
        used
    }
}
