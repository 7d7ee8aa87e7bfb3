//! BTC Wallet Core - HD address derivation and P2SH multisig construction
//!
//! This library derives bitcoin mainnet addresses from a seed and a BIP44/49/84
//! derivation path, and builds M-of-N multisig redeem scripts with their P2SH
//! addresses. No key material is persisted; every derivation session wipes its
//! keys when dropped.

pub mod account;
pub mod crypto;
pub mod error;
pub mod multisig;

// Re-export commonly used types for convenience
pub use account::{derive_hd_address, Address, AddressKind, HdSession};
pub use crypto::keys::{DerivationPath, Purpose};
pub use error::{Error, Result};
pub use multisig::{create_multisig_address, MultisigAddress};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
