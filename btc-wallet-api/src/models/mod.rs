//! Request and response bodies

use serde::{Deserialize, Serialize};

/// Body of `POST /hd/segwit`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HdSegwitRequest {
    /// Base64 encoded seed bytes
    pub seed: String,
    /// Derivation path, e.g. `m/84'/0'/0'/0/0`
    pub path: String,
}

/// Body of `POST /multisig`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultisigRequest {
    pub m: i64,
    pub n: i64,
    /// Hex encoded uncompressed public keys, in script order
    pub public_keys: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddressResponse {
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MnemonicResponse {
    pub mnemonic: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error body returned for every failed request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Coarse category, e.g. `INVALID_PATH`
    pub code: String,
    /// Stable error kind, e.g. `UNSUPPORTED_PURPOSE`
    pub kind: String,
    pub message: String,
}
