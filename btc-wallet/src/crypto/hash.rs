//! Hashing and checksummed encodings shared by address construction

use bitcoin::hashes::{hash160, Hash};

/// Mainnet P2PKH version byte
pub const P2PKH_VERSION: u8 = 0x00;
/// Mainnet P2SH version byte
pub const P2SH_VERSION: u8 = 0x05;
/// Mainnet WIF version byte
pub const WIF_VERSION: u8 = 0x80;

/// RIPEMD160(SHA256(data)), as computed by OP_HASH160
pub fn hash160(data: &[u8]) -> [u8; 20] {
    hash160::Hash::hash(data).to_byte_array()
}

/// Base58check encoding of `version || payload`
pub fn base58check(version: u8, payload: &[u8]) -> String {
    bs58::encode(payload)
        .with_check_version(version)
        .into_string()
}
