//! Bitcoin BIP32 key derivation with per-path memoization

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use secp256k1::{PublicKey, Scalar, Secp256k1, SecretKey, SignOnly};
use sha2::Sha512;
use tracing::{debug, trace};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::derivation::{DerivationPath, HARDENED_OFFSET, PATH_DEPTH};
use crate::error::{Error, Result};

/// HMAC key used to derive the master node
const MASTER_SEED_KEY: &[u8] = b"Bitcoin seed";

/// Shortest seed accepted by BIP32 (128 bits)
pub const MIN_SEED_LEN: usize = 16;
/// Longest seed accepted by BIP32 (512 bits)
pub const MAX_SEED_LEN: usize = 64;

/// A derived private key and chain code, identified by its full path
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct KeyNode {
    #[zeroize(skip)]
    path: String,
    private_key: [u8; 32],
    chain_code: [u8; 32],
}

impl KeyNode {
    /// The canonical path this node was derived at, e.g. `m/84'/0'/0'/0`
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw private key bytes
    pub fn private_key(&self) -> &[u8; 32] {
        &self.private_key
    }

    /// Raw chain code bytes
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }
}

impl PartialEq for KeyNode {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
            && self.private_key == other.private_key
            && self.chain_code == other.chain_code
    }
}

impl Eq for KeyNode {}

// key material stays out of logs
impl fmt::Debug for KeyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyNode")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Derives BIP32 nodes from a single seed, caching every node by its path
///
/// The cache is append-only and lives exactly as long as the tree. Dropping the
/// tree wipes the seed and every cached node. Mutation goes through `&mut self`,
/// so a tree shared between threads must be wrapped in a `Mutex`.
pub struct KeyDerivationTree {
    seed: Zeroizing<Vec<u8>>,
    secp: Secp256k1<SignOnly>,
    nodes: HashMap<String, Arc<KeyNode>>,
}

impl KeyDerivationTree {
    /// Create a tree for one derivation session
    pub fn new(seed: &[u8]) -> Self {
        Self {
            seed: Zeroizing::new(seed.to_vec()),
            secp: Secp256k1::signing_only(),
            nodes: HashMap::new(),
        }
    }

    /// Number of nodes cached so far, the master node included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether a node for the given canonical path string is cached
    pub fn contains(&self, path: &str) -> bool {
        self.nodes.contains_key(path)
    }

    /// The master node, derived from the seed on first use
    pub fn master_key(&mut self) -> Result<Arc<KeyNode>> {
        let path = String::from("m");
        if let Some(node) = self.nodes.get(&path) {
            trace!(path = %path, "key cache hit");
            return Ok(Arc::clone(node));
        }

        let node = Arc::new(derive_master_key(&self.seed)?);
        debug!(path = %path, "derived master key");
        self.nodes.insert(path, Arc::clone(&node));
        Ok(node)
    }

    /// Derive the node at `path`, reusing any cached prefix
    pub fn derive_key(&mut self, path: &DerivationPath) -> Result<Arc<KeyNode>> {
        self.node_at(path, PATH_DEPTH)
    }

    fn node_at(&mut self, path: &DerivationPath, depth: usize) -> Result<Arc<KeyNode>> {
        if depth == 0 {
            return self.master_key();
        }

        let key = path.prefix(depth);
        if let Some(node) = self.nodes.get(&key) {
            trace!(path = %key, "key cache hit");
            return Ok(Arc::clone(node));
        }

        let parent = self.node_at(path, depth - 1)?;
        let index = path.components()[depth - 1];
        let node = Arc::new(self.derive_child_key(&parent, index, key.clone())?);
        debug!(path = %key, hardened = index >= HARDENED_OFFSET, "derived child key");

        self.nodes.insert(key, Arc::clone(&node));
        Ok(node)
    }

    /// CKDpriv: derive a child key from a parent key
    fn derive_child_key(&self, parent: &KeyNode, index: u32, path: String) -> Result<KeyNode> {
        let mut parent_secret_key = SecretKey::from_slice(&parent.private_key)?;

        let mut data = Zeroizing::new(Vec::with_capacity(37));
        if index >= HARDENED_OFFSET {
            data.push(0);
            data.extend_from_slice(&parent.private_key);
        } else {
            let parent_public_key = PublicKey::from_secret_key(&self.secp, &parent_secret_key);
            data.extend_from_slice(&parent_public_key.serialize());
        }
        data.extend_from_slice(&index.to_be_bytes());

        let (tweak, chain_code) = hmac_sha512(&parent.chain_code, &data)?;

        // parse256(IL) >= n or a zero child key make this index unusable
        let child_secret_key = Scalar::from_be_bytes(*tweak)
            .map_err(|_| {
                Error::InternalDerivation(format!("child tweak out of range at {}", path))
            })
            .and_then(|tweak| {
                parent_secret_key.add_tweak(&tweak).map_err(|e| {
                    Error::InternalDerivation(format!("invalid child key at {}: {}", path, e))
                })
            });
        parent_secret_key.non_secure_erase();
        let mut child_secret_key = child_secret_key?;

        let node = KeyNode {
            path,
            private_key: child_secret_key.secret_bytes(),
            chain_code: *chain_code,
        };
        child_secret_key.non_secure_erase();
        Ok(node)
    }
}

impl fmt::Debug for KeyDerivationTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyDerivationTree")
            .field("cached", &self.nodes.len())
            .finish_non_exhaustive()
    }
}

/// Derive the master key from a seed
fn derive_master_key(seed: &[u8]) -> Result<KeyNode> {
    if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&seed.len()) {
        return Err(Error::InternalDerivation(format!(
            "seed length {} outside [{}, {}] bytes",
            seed.len(),
            MIN_SEED_LEN,
            MAX_SEED_LEN
        )));
    }

    let (secret_key, chain_code) = hmac_sha512(MASTER_SEED_KEY, seed)?;

    // reject a zero or out-of-range master key
    SecretKey::from_slice(secret_key.as_slice())
        .map_err(|e| Error::InternalDerivation(format!("invalid master key: {}", e)))?
        .non_secure_erase();

    Ok(KeyNode {
        path: String::from("m"),
        private_key: *secret_key,
        chain_code: *chain_code,
    })
}

/// HMAC-SHA512 split into its left and right 32 byte halves
fn hmac_sha512(key: &[u8], data: &[u8]) -> Result<(Zeroizing<[u8; 32]>, Zeroizing<[u8; 32]>)> {
    let mut hmac = <Hmac<Sha512> as KeyInit>::new_from_slice(key)
        .map_err(|_| Error::InternalDerivation("HMAC error".to_string()))?;

    hmac.update(data);
    let mut result = hmac.finalize().into_bytes();

    let mut left = Zeroizing::new([0u8; 32]);
    let mut right = Zeroizing::new([0u8; 32]);
    left.copy_from_slice(&result[0..32]);
    right.copy_from_slice(&result[32..64]);
    result.as_mut_slice().zeroize();

    Ok((left, right))
}

#[cfg(test)]
mod tests {
    use super::*;

    // BIP32 test vector 1
    const SEED: &str = "000102030405060708090a0b0c0d0e0f";

    fn tree() -> KeyDerivationTree {
        KeyDerivationTree::new(&hex::decode(SEED).unwrap())
    }

    #[test]
    fn test_master_key_vector() {
        let mut tree = tree();
        let master = tree.master_key().unwrap();

        assert_eq!(master.path(), "m");
        assert_eq!(
            hex::encode(master.private_key()),
            "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
        );
        assert_eq!(
            hex::encode(master.chain_code()),
            "873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508"
        );
    }

    #[test]
    fn test_hardened_child_vector() {
        let tree = tree();
        let master = derive_master_key(&tree.seed).unwrap();

        // m/0H
        let child = tree
            .derive_child_key(&master, HARDENED_OFFSET, "m/0'".to_string())
            .unwrap();
        assert_eq!(
            hex::encode(child.private_key()),
            "edb2e14f9ee77d26dd93b4ecede8d16ed408ce149b6cd80b0715a2d911a0afea"
        );
        assert_eq!(
            hex::encode(child.chain_code()),
            "47fdacbd0f1097043b78c63c20c34ef4ed9a111d980047ad16282c7ae6236141"
        );

        // m/0H/1
        let grandchild = tree.derive_child_key(&child, 1, "m/0'/1".to_string()).unwrap();
        assert_eq!(
            hex::encode(grandchild.private_key()),
            "3c6cb8d0f6a264c91ea8b5030fadaa8e538b020f0a387421a12de9319dc93368"
        );
        assert_eq!(
            hex::encode(grandchild.chain_code()),
            "2a7857631386ba23dacac34180dd1983734e444fdbf774041578e9b6adb37c19"
        );
    }

    #[test]
    fn test_seed_length_is_checked() {
        let mut short = KeyDerivationTree::new(&[7u8; 15]);
        let err = short.master_key().unwrap_err();
        assert_eq!(err.code(), "INTERNAL_DERIVATION_ERROR");
        assert!(!err.is_validation());

        let mut long = KeyDerivationTree::new(&[7u8; 65]);
        assert!(long.master_key().is_err());
        assert!(long.is_empty());
    }

    #[test]
    fn test_prefixes_are_cached() {
        let mut tree = KeyDerivationTree::new(&[1u8; 64]);
        let path = DerivationPath::parse("m/84'/0'/0'/0/0").unwrap();
        tree.derive_key(&path).unwrap();

        assert_eq!(tree.len(), PATH_DEPTH + 1);
        for depth in 0..=PATH_DEPTH {
            assert!(tree.contains(&path.prefix(depth)));
        }
    }

    #[test]
    fn test_cached_node_is_reused() {
        let mut tree = KeyDerivationTree::new(&[1u8; 64]);
        let path = DerivationPath::parse("m/44'/0'/0'/0/3").unwrap();

        let first = tree.derive_key(&path).unwrap();
        let second = tree.derive_key(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(tree.len(), PATH_DEPTH + 1);

        // a sibling only adds the leaf
        let sibling = DerivationPath::parse("m/44'/0'/0'/0/4").unwrap();
        tree.derive_key(&sibling).unwrap();
        assert_eq!(tree.len(), PATH_DEPTH + 2);
    }

    #[test]
    fn test_debug_hides_key_material() {
        let mut tree = tree();
        let master = tree.master_key().unwrap();
        let rendered = format!("{:?}", master);
        assert!(!rendered.contains("e8f32e72"));
        assert!(rendered.contains("\"m\""));
    }
}
