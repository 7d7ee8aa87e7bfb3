//! Address derivation
//!
//! This module turns derived keys into bitcoin addresses and runs complete
//! derivation sessions from a seed and a path.

mod address;
mod hd;

pub use address::*;
pub use hd::*;
