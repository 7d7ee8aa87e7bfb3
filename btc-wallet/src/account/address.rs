//! Address encoding for derived keys

use std::fmt;

use bitcoin_bech32::constants::Network;
use bitcoin_bech32::{u5, WitnessProgram};
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::crypto::hash::{base58check, hash160, P2PKH_VERSION, P2SH_VERSION, WIF_VERSION};
use crate::crypto::keys::Purpose;
use crate::error::{Error, Result};

/// OP_0, the segwit v0 witness version opcode
const OP_0: u8 = 0x00;
/// Push of the next 20 bytes
const OP_PUSHBYTES_20: u8 = 0x14;

/// The kind of script an address pays to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    /// Base58check P2PKH
    Legacy,
    /// Base58check P2SH wrapping a P2WPKH program
    SegwitNested,
    /// Bech32 P2WPKH
    SegwitNative,
}

impl From<Purpose> for AddressKind {
    fn from(purpose: Purpose) -> Self {
        match purpose {
            Purpose::Bip44 => AddressKind::Legacy,
            Purpose::Bip49 => AddressKind::SegwitNested,
            Purpose::Bip84 => AddressKind::SegwitNative,
        }
    }
}

/// A bitcoin mainnet address
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    /// The encoded address string
    pub address: String,
    /// The script kind that produced it
    pub kind: AddressKind,
}

impl Address {
    /// Get the address string
    pub fn as_str(&self) -> &str {
        &self.address
    }

    /// Get the address kind
    pub fn kind(&self) -> AddressKind {
        self.kind
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

/// Every encoding of a single private key
pub struct EncodedKey {
    wif: Zeroizing<String>,
    legacy: String,
    segwit_bech32: String,
    segwit_nested: String,
}

impl EncodedKey {
    /// Wallet import format of the private key
    pub fn wif(&self) -> &str {
        &self.wif
    }

    /// P2PKH address
    pub fn legacy(&self) -> &str {
        &self.legacy
    }

    /// Native segwit P2WPKH address
    pub fn segwit_bech32(&self) -> &str {
        &self.segwit_bech32
    }

    /// P2SH-P2WPKH address
    pub fn segwit_nested(&self) -> &str {
        &self.segwit_nested
    }

    /// The address that matches a derivation purpose
    pub fn select(&self, purpose: Purpose) -> Address {
        let kind = AddressKind::from(purpose);
        let address = match kind {
            AddressKind::Legacy => &self.legacy,
            AddressKind::SegwitNested => &self.segwit_nested,
            AddressKind::SegwitNative => &self.segwit_bech32,
        };

        Address {
            address: address.clone(),
            kind,
        }
    }
}

impl fmt::Debug for EncodedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedKey")
            .field("legacy", &self.legacy)
            .field("segwit_bech32", &self.segwit_bech32)
            .field("segwit_nested", &self.segwit_nested)
            .finish_non_exhaustive()
    }
}

/// Encode a private key as WIF plus the three address variants of its public key
///
/// `compress` selects the public key serialization hashed into every address
/// and sets the WIF compression flag.
pub fn encode(private_key: &[u8], compress: bool) -> Result<EncodedKey> {
    let mut secret_key = SecretKey::from_slice(private_key)?;
    let public_key = PublicKey::from_secret_key(&Secp256k1::signing_only(), &secret_key);
    secret_key.non_secure_erase();

    let wif = {
        let mut payload = Zeroizing::new(Vec::with_capacity(33));
        payload.extend_from_slice(private_key);
        if compress {
            payload.push(0x01);
        }
        Zeroizing::new(base58check(WIF_VERSION, &payload))
    };

    let witness_program = if compress {
        hash160(&public_key.serialize())
    } else {
        hash160(&public_key.serialize_uncompressed())
    };

    let legacy = base58check(P2PKH_VERSION, &witness_program);
    let segwit_bech32 = bech32_address(&witness_program)?;

    let mut redeem_script = Vec::with_capacity(22);
    redeem_script.push(OP_0);
    redeem_script.push(OP_PUSHBYTES_20);
    redeem_script.extend_from_slice(&witness_program);
    let segwit_nested = base58check(P2SH_VERSION, &hash160(&redeem_script));

    Ok(EncodedKey {
        wif,
        legacy,
        segwit_bech32,
        segwit_nested,
    })
}

/// Version 0 witness program on mainnet, `bc` human readable part
fn bech32_address(program: &[u8; 20]) -> Result<String> {
    let version = u5::try_from_u8(0).map_err(|e| Error::InternalDerivation(e.to_string()))?;
    let program = WitnessProgram::new(version, program.to_vec(), Network::Bitcoin)
        .map_err(|e| Error::InternalDerivation(e.to_string()))?;
    Ok(program.to_address())
}
