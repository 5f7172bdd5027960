//! Persistent account storage

use chorale_primitives::Word;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Classification of one storage write, derived deterministically from
/// the slot's prior value and the incoming value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    /// The slot value is unchanged (including zero written over zero)
    Noop,
    /// A non-zero value lands in a slot that held zero
    Create,
    /// A non-zero value replaces a different non-zero value
    Update,
    /// A non-zero slot is cleared back to zero
    Clear,
}

impl StoreKind {
    /// Classify a write from the prior and incoming slot values
    pub fn from_transition(prior: Word, value: Word) -> Self {
        if prior == value {
            StoreKind::Noop
        } else if prior.is_zero() {
            StoreKind::Create
        } else if value.is_zero() {
            StoreKind::Clear
        } else {
            StoreKind::Update
        }
    }

    /// Whether this write earns a refund-counter credit
    pub fn is_refund_eligible(self) -> bool {
        self == StoreKind::Clear
    }
}

/// One account's key-value slots.
///
/// Absent keys read as zero, so every load is total. Zero-valued slots
/// are not materialized: clearing a slot removes its entry.
#[derive(Clone, Debug, Default)]
pub struct AccountStorage {
    slots: HashMap<Word, Word>,
}

impl AccountStorage {
    /// Create empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the slot at `key`, zero when never written
    pub fn load(&self, key: &Word) -> Word {
        self.slots.get(key).copied().unwrap_or(Word::ZERO)
    }

    /// Write `value` at `key`, returning the transition classification
    pub fn store(&mut self, key: Word, value: Word) -> StoreKind {
        let kind = StoreKind::from_transition(self.load(&key), value);
        if value.is_zero() {
            self.slots.remove(&key);
        } else {
            self.slots.insert(key, value);
        }
        kind
    }

    /// Number of live (non-zero) slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if no slot holds a non-zero value
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Shared handle to one account's storage.
///
/// Clones refer to the same underlying map, so writes made through one
/// frame's context are visible to every later frame holding the handle.
/// The lock serializes access within a transaction; ordering across
/// nested calls is the interpreter's concern, as is snapshotting and
/// reverting a failed frame's writes.
#[derive(Clone, Debug, Default)]
pub struct StorageHandle {
    inner: Arc<RwLock<AccountStorage>>,
}

impl StorageHandle {
    /// Create a handle to fresh empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the slot at `key`
    pub fn load(&self, key: &Word) -> Word {
        self.inner.read().load(key)
    }

    /// Write `value` at `key`, returning the classification
    pub fn store(&self, key: Word, value: Word) -> StoreKind {
        self.inner.write().store(key, value)
    }

    /// Number of live slots
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Check if storage is empty
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_key_reads_zero() {
        let storage = AccountStorage::new();
        assert_eq!(storage.load(&Word::from(99u64)), Word::ZERO);
    }

    #[test]
    fn test_store_load_roundtrip() {
        let mut storage = AccountStorage::new();
        let key = Word::from(1u64);

        storage.store(key, Word::from(42u64));
        assert_eq!(storage.load(&key), Word::from(42u64));

        storage.store(key, Word::from(43u64));
        assert_eq!(storage.load(&key), Word::from(43u64));
    }

    #[test]
    fn test_classification_matrix() {
        let zero = Word::ZERO;
        let five = Word::from(5u64);
        let six = Word::from(6u64);

        assert_eq!(StoreKind::from_transition(zero, zero), StoreKind::Noop);
        assert_eq!(StoreKind::from_transition(zero, five), StoreKind::Create);
        assert_eq!(StoreKind::from_transition(five, five), StoreKind::Noop);
        assert_eq!(StoreKind::from_transition(five, six), StoreKind::Update);
        assert_eq!(StoreKind::from_transition(five, zero), StoreKind::Clear);
    }

    #[test]
    fn test_store_reports_classification() {
        let mut storage = AccountStorage::new();
        let key = Word::from(7u64);

        assert_eq!(storage.store(key, Word::ZERO), StoreKind::Noop);
        assert_eq!(storage.store(key, Word::from(5u64)), StoreKind::Create);
        assert_eq!(storage.store(key, Word::from(5u64)), StoreKind::Noop);
        assert_eq!(storage.store(key, Word::from(9u64)), StoreKind::Update);
        assert_eq!(storage.store(key, Word::ZERO), StoreKind::Clear);
    }

    #[test]
    fn test_refund_eligibility() {
        assert!(StoreKind::Clear.is_refund_eligible());
        assert!(!StoreKind::Noop.is_refund_eligible());
        assert!(!StoreKind::Create.is_refund_eligible());
        assert!(!StoreKind::Update.is_refund_eligible());
    }

    #[test]
    fn test_clear_removes_entry() {
        let mut storage = AccountStorage::new();
        let key = Word::from(1u64);

        storage.store(key, Word::from(5u64));
        assert_eq!(storage.len(), 1);

        storage.store(key, Word::ZERO);
        assert!(storage.is_empty());
        assert_eq!(storage.load(&key), Word::ZERO);
    }

    #[test]
    fn test_zero_store_leaves_no_phantom_entry() {
        let mut storage = AccountStorage::new();
        storage.store(Word::from(1u64), Word::ZERO);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_handle_clones_share_state() {
        let handle = StorageHandle::new();
        let alias = handle.clone();

        handle.store(Word::from(1u64), Word::from(10u64));
        assert_eq!(alias.load(&Word::from(1u64)), Word::from(10u64));
    }

    #[test]
    fn test_handle_outlives_writer() {
        let handle = StorageHandle::new();
        {
            let frame_view = handle.clone();
            frame_view.store(Word::from(2u64), Word::from(20u64));
        }
        assert_eq!(handle.load(&Word::from(2u64)), Word::from(20u64));
        assert_eq!(handle.len(), 1);
    }
}
