//! M-of-N redeem script construction

use crate::crypto::hash::{base58check, hash160, P2SH_VERSION};
use crate::error::{Error, Result};

/// OP_1, the first of the small integer opcodes OP_1..OP_16
pub const OP_1: u8 = 81;
/// OP_CHECKMULTISIG
pub const OP_CHECKMULTISIG: u8 = 174;

/// Largest N for a standard P2SH multisig
pub const MAX_KEYS: i64 = 7;

/// Length of an uncompressed SEC1 public key
pub const PUBLIC_KEY_LEN: usize = 65;
/// Leading byte of an uncompressed SEC1 public key
const UNCOMPRESSED_TAG: u8 = 0x04;

/// An uncompressed public key taking part in a multisig
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultisigPublicKey([u8; PUBLIC_KEY_LEN]);

impl MultisigPublicKey {
    /// Validate raw key bytes; `position` is reported back on failure
    pub fn from_bytes(bytes: &[u8], position: usize) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::EmptyPublicKey { position });
        }
        if bytes.len() != PUBLIC_KEY_LEN || bytes[0] != UNCOMPRESSED_TAG {
            return Err(Error::InvalidPublicKey { position });
        }

        let mut key = [0u8; PUBLIC_KEY_LEN];
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A validated M-of-N multisig redeem script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultisigScript {
    m: u8,
    n: u8,
    public_keys: Vec<MultisigPublicKey>,
}

impl MultisigScript {
    /// Validate the parameters and keys, in that order, stopping at the first failure
    pub fn new<K: AsRef<[u8]>>(m: i64, n: i64, public_keys: &[K]) -> Result<Self> {
        if !(1..=MAX_KEYS).contains(&n) {
            return Err(Error::NRange(n));
        }
        if !(1..=n).contains(&m) {
            return Err(Error::MRange(m));
        }

        // both are within 1..=7 here
        let (m, n) = (m as u8, n as u8);
        if public_keys.len() != usize::from(n) {
            return Err(Error::PublicKeyCountMismatch {
                expected: usize::from(n),
                got: public_keys.len(),
            });
        }

        let public_keys = public_keys
            .iter()
            .enumerate()
            .map(|(position, key)| MultisigPublicKey::from_bytes(key.as_ref(), position))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { m, n, public_keys })
    }

    pub fn m(&self) -> u8 {
        self.m
    }

    pub fn n(&self) -> u8 {
        self.n
    }

    pub fn public_keys(&self) -> &[MultisigPublicKey] {
        &self.public_keys
    }

    /// `OP_m <len> <pk>... OP_n OP_CHECKMULTISIG`, keys in the order supplied
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut script = Vec::with_capacity(3 + self.public_keys.len() * (PUBLIC_KEY_LEN + 1));
        script.push(OP_1 + (self.m - 1));
        for key in &self.public_keys {
            script.push(PUBLIC_KEY_LEN as u8);
            script.extend_from_slice(key.as_bytes());
        }
        script.push(OP_1 + (self.n - 1));
        script.push(OP_CHECKMULTISIG);
        script
    }

    /// Hex encoding of the redeem script
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// HASH160 of the redeem script
    pub fn script_hash(&self) -> [u8; 20] {
        hash160(&self.to_bytes())
    }

    /// Mainnet P2SH address committing to this script
    pub fn p2sh_address(&self) -> String {
        base58check(P2SH_VERSION, &self.script_hash())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(tag: u8, fill: u8) -> Vec<u8> {
        let mut key = vec![fill; PUBLIC_KEY_LEN];
        key[0] = tag;
        key
    }

    #[test]
    fn test_n_range() {
        let keys: Vec<Vec<u8>> = Vec::new();
        assert_eq!(MultisigScript::new(1, 0, &keys), Err(Error::NRange(0)));
        assert_eq!(MultisigScript::new(1, 8, &keys), Err(Error::NRange(8)));
        assert_eq!(MultisigScript::new(1, -3, &keys), Err(Error::NRange(-3)));
    }

    #[test]
    fn test_m_range() {
        let keys = vec![key(4, 1), key(4, 2), key(4, 3)];
        assert_eq!(MultisigScript::new(0, 3, &keys), Err(Error::MRange(0)));
        assert_eq!(MultisigScript::new(4, 3, &keys), Err(Error::MRange(4)));
    }

    #[test]
    fn test_key_count() {
        let keys = vec![key(4, 1), key(4, 2)];
        assert_eq!(
            MultisigScript::new(2, 3, &keys),
            Err(Error::PublicKeyCountMismatch { expected: 3, got: 2 })
        );
    }

    #[test]
    fn test_key_validation_stops_at_first_offender() {
        let keys = vec![key(4, 1), key(2, 2), Vec::new()];
        assert_eq!(
            MultisigScript::new(2, 3, &keys),
            Err(Error::InvalidPublicKey { position: 1 })
        );

        let keys = vec![key(4, 1), Vec::new(), key(2, 2)];
        assert_eq!(
            MultisigScript::new(2, 3, &keys),
            Err(Error::EmptyPublicKey { position: 1 })
        );

        let keys = vec![vec![4u8; 33]];
        assert_eq!(
            MultisigScript::new(1, 1, &keys),
            Err(Error::InvalidPublicKey { position: 0 })
        );
    }

    #[test]
    fn test_script_layout() {
        let keys = vec![key(4, 0xaa), key(4, 0xbb)];
        let script = MultisigScript::new(1, 2, &keys).unwrap().to_bytes();

        assert_eq!(script.len(), 1 + 2 * 66 + 2);
        assert_eq!(script[0], 81);
        assert_eq!(script[1], 65);
        assert_eq!(&script[2..67], keys[0].as_slice());
        assert_eq!(script[67], 65);
        assert_eq!(&script[68..133], keys[1].as_slice());
        assert_eq!(script[133], 82);
        assert_eq!(script[134], 174);
    }

    #[test]
    fn test_largest_standard_multisig() {
        let keys: Vec<Vec<u8>> = (0..7).map(|i| key(4, i)).collect();
        let script = MultisigScript::new(7, 7, &keys).unwrap().to_bytes();

        assert_eq!(script[0], 87);
        assert_eq!(script[script.len() - 2], 87);
        assert_eq!(script[script.len() - 1], OP_CHECKMULTISIG);
    }
}
