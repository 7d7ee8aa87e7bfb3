//! Key derivation and management
//!
//! This module provides derivation path parsing and BIP32 key derivation for
//! bitcoin mainnet.

pub mod bitcoin;
mod derivation;

pub use bitcoin::{KeyDerivationTree, KeyNode};
pub use derivation::*;
