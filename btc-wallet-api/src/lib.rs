//! BTC Wallet API
//!
//! HTTP front end for the btc-wallet core: mnemonic generation, HD address
//! derivation and P2SH multisig address creation.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::ApiConfig;
pub use services::router;
