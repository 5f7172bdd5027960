//! # chorale-primitives
//!
//! Primitive value types for the Chorale execution context engine.
//!
//! This crate provides the fundamental units the engine trades in:
//! the 256-bit [`Word`], the [`H256`] digest, and the 20-byte
//! [`Address`] used by the hash-derivation helpers.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod hash;
mod word;

pub use address::{Address, AddressError};
pub use hash::{HashError, H256};
pub use word::{Word, WordError};

// Re-export primitive-types for arithmetic backing
pub use primitive_types::U256;

/// Gas type
pub type Gas = u64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_backing_roundtrip() {
        let w = Word::from(300u64);
        assert_eq!(w.to_u64(), Some(300));
    }
}
