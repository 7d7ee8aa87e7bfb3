//! Wallet route handlers

use axum::extract::rejection::JsonRejection;
use axum::Json;
use base64::{engine::general_purpose, Engine as _};
use zeroize::Zeroizing;

use btc_wallet::crypto::mnemonic::{generate_mnemonic, MnemonicStrength};
use btc_wallet::{create_multisig_address, derive_hd_address, MultisigAddress};

use crate::error::{ApiError, INVALID_INPUT, INVALID_PATH};
use crate::models::{AddressResponse, HdSegwitRequest, MnemonicResponse, MultisigRequest};

/// `GET /mnemonic`: a random 24 word BIP39 phrase
pub async fn create_mnemonic() -> Result<Json<MnemonicResponse>, ApiError> {
    let mnemonic = generate_mnemonic(MnemonicStrength::Words24)?;
    Ok(Json(MnemonicResponse { mnemonic }))
}

/// `POST /hd/segwit`: the address for a seed and derivation path
pub async fn create_hd_segwit_address(
    payload: Result<Json<HdSegwitRequest>, JsonRejection>,
) -> Result<Json<AddressResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::InvalidBody {
        code: INVALID_PATH,
        rejection,
    })?;
    let seed = Zeroizing::new(
        general_purpose::STANDARD
            .decode(request.seed.trim())
            .map_err(|e| ApiError::InvalidSeed(e.to_string()))?,
    );

    let address = derive_hd_address(&seed, &request.path)?;
    tracing::info!(path = %request.path, kind = ?address.kind(), "created hd address");

    Ok(Json(AddressResponse {
        address: address.address,
    }))
}

/// `POST /multisig`: the P2SH address and redeem script for M-of-N keys
pub async fn create_multisig_p2sh_address(
    payload: Result<Json<MultisigRequest>, JsonRejection>,
) -> Result<Json<MultisigAddress>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::InvalidBody {
        code: INVALID_INPUT,
        rejection,
    })?;
    let multisig = create_multisig_address(request.m, request.n, &request.public_keys)?;
    tracing::info!(m = request.m, n = request.n, "created multisig address");

    Ok(Json(multisig))
}
