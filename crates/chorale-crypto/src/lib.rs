//! # chorale-crypto
//!
//! Keccak-256 hash engine for the Chorale execution context.
//!
//! This crate provides:
//! - One-shot and streaming Keccak-256 hashing
//! - Multi-segment helpers for domain-separated derivations

#![warn(missing_docs)]
#![warn(clippy::all)]

mod hash;

pub use hash::{derive_address, keccak256, keccak256_concat, Keccak};
