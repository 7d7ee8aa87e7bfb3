//! BIP39 mnemonic phrase generation and handling

use bip39::Mnemonic;
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Supported mnemonic strengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MnemonicStrength {
    /// 12 words (128 bits)
    Words12,
    /// 24 words (256 bits)
    #[default]
    Words24,
}

impl MnemonicStrength {
    /// Entropy length in bytes
    fn entropy_bytes(&self) -> usize {
        match self {
            Self::Words12 => 16,
            Self::Words24 => 32,
        }
    }

    /// Number of words in a phrase of this strength
    pub fn word_count(&self) -> usize {
        match self {
            Self::Words12 => 12,
            Self::Words24 => 24,
        }
    }
}

/// Generate a new random mnemonic phrase with the specified strength
pub fn generate_mnemonic(strength: MnemonicStrength) -> Result<String> {
    let mut entropy = Zeroizing::new(vec![0u8; strength.entropy_bytes()]);
    OsRng
        .try_fill_bytes(&mut entropy)
        .map_err(|e| Error::Mnemonic(e.to_string()))?;

    let mnemonic = Mnemonic::from_entropy(&entropy).map_err(|e| Error::Mnemonic(e.to_string()))?;

    Ok(mnemonic.to_string())
}

/// Validate a mnemonic phrase
pub fn validate_mnemonic(phrase: &str) -> Result<()> {
    Mnemonic::parse_normalized(phrase)
        .map(|_| ())
        .map_err(|e| Error::Mnemonic(e.to_string()))
}

/// Derive the 64 byte BIP39 seed from a mnemonic phrase and optional passphrase
pub fn mnemonic_to_seed(phrase: &str, passphrase: Option<&str>) -> Result<Zeroizing<Vec<u8>>> {
    let mnemonic = Mnemonic::parse_normalized(phrase).map_err(|e| Error::Mnemonic(e.to_string()))?;

    let seed = Zeroizing::new(mnemonic.to_seed(passphrase.unwrap_or("")));
    Ok(Zeroizing::new(seed.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_generate_mnemonic() {
        for strength in [MnemonicStrength::Words12, MnemonicStrength::Words24] {
            let mnemonic = generate_mnemonic(strength).unwrap();
            assert!(validate_mnemonic(&mnemonic).is_ok());
            assert_eq!(mnemonic.split_whitespace().count(), strength.word_count());
        }
    }

    #[test]
    fn test_default_strength_is_256_bits() {
        let mnemonic = generate_mnemonic(MnemonicStrength::default()).unwrap();
        assert_eq!(mnemonic.split_whitespace().count(), 24);
    }

    #[test]
    fn test_validate_mnemonic() {
        let invalid = "invalid mnemonic phrase test test test test test test test test test";

        assert!(validate_mnemonic(ABANDON).is_ok());
        let err = validate_mnemonic(invalid).unwrap_err();
        assert_eq!(err.code(), "MNEMONIC_ERROR");
    }

    #[test]
    fn test_mnemonic_to_seed() {
        let seed = mnemonic_to_seed(ABANDON, Some("TREZOR")).unwrap();
        assert_eq!(
            hex::encode(seed.as_slice()),
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e53495531f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        );

        let seed = mnemonic_to_seed(ABANDON, None).unwrap();
        assert_eq!(seed.len(), 64);
    }
}
