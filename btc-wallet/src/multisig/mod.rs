//! Pay-to-script-hash multisig addresses
//!
//! Builds the canonical `OP_m <pubkeys> OP_n OP_CHECKMULTISIG` redeem script
//! from caller supplied uncompressed public keys and encodes its P2SH address.
//! Nothing is kept between calls.

mod script;

pub use script::*;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// A P2SH multisig address and the redeem script it commits to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultisigAddress {
    /// Base58check P2SH address
    pub address: String,
    /// Hex encoded redeem script
    pub redeem_script: String,
}

/// Create an M-of-N P2SH multisig address from hex encoded public keys
///
/// Every key is decoded before any parameter is checked, so a malformed hex
/// string is reported even when M or N are also wrong.
pub fn create_multisig_address<S: AsRef<str>>(
    m: i64,
    n: i64,
    public_keys: &[S],
) -> Result<MultisigAddress> {
    let decoded = public_keys
        .iter()
        .enumerate()
        .map(|(position, key)| {
            hex::decode(key.as_ref().trim()).map_err(|_| Error::OffendingPublicKey { position })
        })
        .collect::<Result<Vec<_>>>()?;

    let script = MultisigScript::new(m, n, &decoded)?;
    let address = MultisigAddress {
        address: script.p2sh_address(),
        redeem_script: script.to_hex(),
    };
    debug!(m, n, address = %address.address, "created multisig address");

    Ok(address)
}
