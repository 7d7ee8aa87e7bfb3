//! Hierarchical deterministic address derivation sessions

use tracing::debug;

use super::address::{encode, Address, EncodedKey};
use crate::crypto::keys::{DerivationPath, KeyDerivationTree};
use crate::error::Result;

/// Addresses hash the uncompressed public key of the derived node
pub const COMPRESS_PUBLIC_KEY: bool = false;

/// Derive the address for `path` from `seed` in a single throwaway session
///
/// The path is validated before any key material is touched.
pub fn derive_hd_address(seed: &[u8], path: &str) -> Result<Address> {
    let path = DerivationPath::parse(path)?;
    HdSession::new(seed).derive_address(&path)
}

/// A derivation session over one seed
///
/// Paths sharing a prefix reuse the cached nodes of the session's tree. All
/// key material is wiped when the session is dropped.
#[derive(Debug)]
pub struct HdSession {
    tree: KeyDerivationTree,
}

impl HdSession {
    pub fn new(seed: &[u8]) -> Self {
        Self {
            tree: KeyDerivationTree::new(seed),
        }
    }

    /// All encodings of the key at `path`
    pub fn encoded_key(&mut self, path: &DerivationPath, compress: bool) -> Result<EncodedKey> {
        let node = self.tree.derive_key(path)?;
        encode(node.private_key(), compress)
    }

    /// The address selected by the purpose of `path`
    pub fn derive_address(&mut self, path: &DerivationPath) -> Result<Address> {
        let address = self
            .encoded_key(path, COMPRESS_PUBLIC_KEY)?
            .select(path.purpose());
        debug!(path = %path, kind = ?address.kind(), "derived address");
        Ok(address)
    }

    /// Parse `path` and derive its address
    pub fn derive_address_str(&mut self, path: &str) -> Result<Address> {
        let path = DerivationPath::parse(path)?;
        self.derive_address(&path)
    }

    /// Number of nodes cached by this session
    pub fn cached_nodes(&self) -> usize {
        self.tree.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AddressKind;
    use crate::error::Error;

    #[test]
    fn test_path_is_validated_before_seed() {
        // an unusable seed is never reached when the path is bad
        assert_eq!(
            derive_hd_address(&[], "m/50'/0'/0'/0/0"),
            Err(Error::UnsupportedPurpose(0x8000_0032))
        );

        let err = derive_hd_address(&[], "m/84'/0'/0'/0/0").unwrap_err();
        assert_eq!(err.code(), "INTERNAL_DERIVATION_ERROR");
    }

    #[test]
    fn test_session_shares_prefixes() {
        let mut session = HdSession::new(&[9u8; 32]);

        let first = session.derive_address_str("m/84'/0'/0'/0/0").unwrap();
        assert_eq!(session.cached_nodes(), 6);
        assert_eq!(first.kind(), AddressKind::SegwitNative);

        session.derive_address_str("m/84'/0'/0'/0/1").unwrap();
        assert_eq!(session.cached_nodes(), 7);

        session.derive_address_str("m/84'/0'/0'/1/0").unwrap();
        assert_eq!(session.cached_nodes(), 9);

        // repeated derivation adds nothing and yields the same address
        let again = session.derive_address_str("m/84'/0'/0'/0/0").unwrap();
        assert_eq!(again, first);
        assert_eq!(session.cached_nodes(), 9);
    }

    #[test]
    fn test_session_matches_fresh_derivation() {
        let seed = [3u8; 64];
        let mut session = HdSession::new(&seed);
        session.derive_address_str("m/49'/0'/1'/0/0").unwrap();

        let cached = session.derive_address_str("m/49'/0'/1'/0/7").unwrap();
        let fresh = derive_hd_address(&seed, "m/49'/0'/1'/0/7").unwrap();
        assert_eq!(cached, fresh);
    }

    #[test]
    fn test_shared_session_behind_mutex() {
        let seed = [5u8; 64];
        let session = std::sync::Mutex::new(HdSession::new(&seed));

        let addresses: Vec<Address> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|index| {
                    let session = &session;
                    scope.spawn(move || {
                        let path = format!("m/84'/0'/0'/0/{}", index);
                        session.lock().unwrap().derive_address_str(&path).unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        // shared prefix plus one leaf per index
        assert_eq!(session.lock().unwrap().cached_nodes(), 5 + 4);
        for (index, address) in addresses.iter().enumerate() {
            let path = format!("m/84'/0'/0'/0/{}", index);
            assert_eq!(*address, derive_hd_address(&seed, &path).unwrap());
        }
    }
}
