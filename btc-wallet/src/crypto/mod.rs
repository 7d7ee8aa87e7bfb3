//! Cryptographic primitives and operations
//!
//! This module provides mnemonic generation, key derivation, and the hashing
//! and checksummed encodings used to build bitcoin addresses.

pub mod hash;
pub mod keys;
pub mod mnemonic;

pub use keys::*;
pub use mnemonic::*;
