//! Error handling for HTTP handlers

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use btc_wallet::Error as WalletError;
use thiserror::Error;

use crate::models::ErrorResponse;

/// Response category for malformed derivation paths
pub const INVALID_PATH: &str = "INVALID_PATH";
/// Response category for rejected multisig parameters or keys
pub const INVALID_INPUT: &str = "INVALID_INPUT";
/// Response category for a seed that is not valid base64
pub const INVALID_SEED: &str = "INVALID_SEED";
/// Response category for failures not caused by the request
pub const INTERNAL: &str = "INTERNAL";

/// Errors returned by the API handlers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error("invalid seed encoding: {0}")]
    InvalidSeed(String),

    /// A body that could not be read as the route's JSON request
    #[error("invalid request body: {rejection}")]
    InvalidBody {
        code: &'static str,
        rejection: JsonRejection,
    },
}

/// Body kind reported for unreadable JSON requests
pub const INVALID_BODY: &str = "INVALID_BODY";

impl ApiError {
    /// HTTP status and response category
    pub fn category(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::InvalidSeed(_) => (StatusCode::BAD_REQUEST, INVALID_SEED),
            ApiError::InvalidBody { code, rejection } => (rejection.status(), *code),
            ApiError::Wallet(e) if e.is_path_error() => (StatusCode::BAD_REQUEST, INVALID_PATH),
            ApiError::Wallet(e) if e.is_validation() => (StatusCode::BAD_REQUEST, INVALID_INPUT),
            ApiError::Wallet(_) => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL),
        }
    }

    /// Stable fine grained error code
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::InvalidSeed(_) => INVALID_SEED,
            ApiError::InvalidBody { .. } => INVALID_BODY,
            ApiError::Wallet(e) => e.code(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.category();

        let message = if status.is_server_error() {
            tracing::error!(kind = self.kind(), "request failed: {}", self);
            "Internal server error".to_string()
        } else {
            tracing::warn!(kind = self.kind(), "request rejected: {}", self);
            self.to_string()
        };

        let body = ErrorResponse {
            code: code.to_string(),
            kind: self.kind().to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
