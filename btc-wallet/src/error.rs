//! Error types for the btc-wallet library

use thiserror::Error;

/// Custom error type for btc-wallet operations
///
/// Every variant maps to a stable machine code (see [`Error::code`]) so callers
/// can branch on the kind rather than on the rendered message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("empty derivation path")]
    EmptyPath,

    #[error("use 'm/' prefix for absolute paths")]
    InvalidPathPrefix,

    #[error("invalid derivation path: expected 5 components, got {got}")]
    InvalidPath { got: usize },

    #[error("invalid component: {component:?}")]
    InvalidComponent { component: String },

    #[error("component {component:?} out of allowed range [0, {max}]")]
    ComponentOutOfRange { component: String, max: u32 },

    #[error("unsupported coin type: {0:#010x}")]
    UnsupportedCoinType(u32),

    #[error("unsupported purpose: {0:#010x}")]
    UnsupportedPurpose(u32),

    #[error("offending public key at position {position}")]
    OffendingPublicKey { position: usize },

    #[error("N must be between 1 and 7 (inclusive) for a standard P2SH multisig, got {0}")]
    NRange(i64),

    #[error("M must be between 1 and N (inclusive), got {0}")]
    MRange(i64),

    #[error("need exactly {expected} public keys for the multisig, {got} provided")]
    PublicKeyCountMismatch { expected: usize, got: usize },

    #[error("public key at position {position} cannot be empty")]
    EmptyPublicKey { position: usize },

    #[error("public key at position {position} is invalid")]
    InvalidPublicKey { position: usize },

    #[error("internal derivation error: {0}")]
    InternalDerivation(String),

    #[error("Mnemonic error: {0}")]
    Mnemonic(String),
}

impl Error {
    /// Stable code identifying the error kind
    pub fn code(&self) -> &'static str {
        match self {
            Error::EmptyPath => "EMPTY_PATH",
            Error::InvalidPathPrefix => "INVALID_PATH_PREFIX",
            Error::InvalidPath { .. } => "INVALID_PATH",
            Error::InvalidComponent { .. } => "INVALID_COMPONENT",
            Error::ComponentOutOfRange { .. } => "COMPONENT_OUT_OF_RANGE",
            Error::UnsupportedCoinType(_) => "UNSUPPORTED_COIN_TYPE",
            Error::UnsupportedPurpose(_) => "UNSUPPORTED_PURPOSE",
            Error::OffendingPublicKey { .. } => "OFFENDING_PUBLIC_KEY",
            Error::NRange(_) => "N_RANGE_ERROR",
            Error::MRange(_) => "M_RANGE_ERROR",
            Error::PublicKeyCountMismatch { .. } => "PUBLIC_KEY_COUNT_MISMATCH",
            Error::EmptyPublicKey { .. } => "EMPTY_PUBLIC_KEY",
            Error::InvalidPublicKey { .. } => "INVALID_PUBLIC_KEY",
            Error::InternalDerivation(_) => "INTERNAL_DERIVATION_ERROR",
            Error::Mnemonic(_) => "MNEMONIC_ERROR",
        }
    }

    /// Whether the error was caused by caller input rather than a primitive failure
    pub fn is_validation(&self) -> bool {
        !matches!(self, Error::InternalDerivation(_) | Error::Mnemonic(_))
    }

    /// Whether the error came from derivation path parsing
    pub fn is_path_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyPath
                | Error::InvalidPathPrefix
                | Error::InvalidPath { .. }
                | Error::InvalidComponent { .. }
                | Error::ComponentOutOfRange { .. }
                | Error::UnsupportedCoinType(_)
                | Error::UnsupportedPurpose(_)
        )
    }
}

impl From<secp256k1::Error> for Error {
    fn from(e: secp256k1::Error) -> Self {
        Error::InternalDerivation(e.to_string())
    }
}

/// Result type for btc-wallet operations
pub type Result<T> = std::result::Result<T, Error>;
