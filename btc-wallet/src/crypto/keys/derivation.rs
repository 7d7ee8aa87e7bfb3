//! Derivation path parsing and validation
//!
//! Only absolute five level paths of the form
//! `m/<purpose>'/<coin_type>'/<account>'/<change>/<index>` are accepted, and
//! the purpose and coin type must belong to the supported whitelists.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Offset added to a component index to mark hardened derivation
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Number of components following the `m` prefix
pub const PATH_DEPTH: usize = 5;

/// Largest index a component may carry before the hardened offset is applied
pub const MAX_COMPONENT_INDEX: u32 = HARDENED_OFFSET - 1;

/// Position of the first component (`change`) that may not be hardened
const UNHARDENED_FROM: usize = 3;

/// Supported derivation purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Purpose {
    /// 44' legacy P2PKH
    Bip44,
    /// 49' P2SH nested segwit
    Bip49,
    /// 84' native segwit
    Bip84,
}

impl Purpose {
    /// The hardened component value for this purpose
    pub const fn index(self) -> u32 {
        match self {
            Purpose::Bip44 => 0x8000_002C,
            Purpose::Bip49 => 0x8000_0031,
            Purpose::Bip84 => 0x8000_0054,
        }
    }
}

impl TryFrom<u32> for Purpose {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0x8000_002C => Ok(Purpose::Bip44),
            0x8000_0031 => Ok(Purpose::Bip49),
            0x8000_0054 => Ok(Purpose::Bip84),
            other => Err(Error::UnsupportedPurpose(other)),
        }
    }
}

/// Supported coin types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoinType {
    /// 0' bitcoin mainnet
    Bitcoin,
}

impl CoinType {
    /// The hardened component value for this coin type
    pub const fn index(self) -> u32 {
        match self {
            CoinType::Bitcoin => HARDENED_OFFSET,
        }
    }
}

impl TryFrom<u32> for CoinType {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            HARDENED_OFFSET => Ok(CoinType::Bitcoin),
            other => Err(Error::UnsupportedCoinType(other)),
        }
    }
}

/// A validated five level derivation path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivationPath {
    purpose: Purpose,
    coin_type: CoinType,
    account: u32,
    change: u32,
    index: u32,
}

impl DerivationPath {
    /// Parse a textual absolute path such as `m/84'/0'/0'/0/0`
    pub fn parse(path: &str) -> Result<Self> {
        if path.trim().is_empty() {
            return Err(Error::EmptyPath);
        }

        let mut segments = path.split('/');
        match segments.next() {
            Some(prefix) if prefix.trim() == "m" => {}
            _ => return Err(Error::InvalidPathPrefix),
        }

        let segments: Vec<&str> = segments.collect();
        if segments.len() != PATH_DEPTH {
            return Err(Error::InvalidPath { got: segments.len() });
        }

        let mut components = [0u32; PATH_DEPTH];
        for (position, segment) in segments.into_iter().enumerate() {
            let component = parse_component(segment)?;
            // change and index are always non-hardened
            if position >= UNHARDENED_FROM && component >= HARDENED_OFFSET {
                return Err(out_of_range(segment.trim()));
            }
            components[position] = component;
        }

        // coin type is checked before purpose
        let coin_type = CoinType::try_from(components[1])?;
        let purpose = Purpose::try_from(components[0])?;

        Ok(Self {
            purpose,
            coin_type,
            account: components[2],
            change: components[3],
            index: components[4],
        })
    }

    pub fn purpose(&self) -> Purpose {
        self.purpose
    }

    pub fn coin_type(&self) -> CoinType {
        self.coin_type
    }

    pub fn account(&self) -> u32 {
        self.account
    }

    pub fn change(&self) -> u32 {
        self.change
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// The raw components `[purpose, coin_type, account, change, index]`
    pub fn components(&self) -> [u32; PATH_DEPTH] {
        [
            self.purpose.index(),
            self.coin_type.index(),
            self.account,
            self.change,
            self.index,
        ]
    }

    /// Canonical path string of the first `depth` components, `m` for depth zero
    pub fn prefix(&self, depth: usize) -> String {
        let mut prefix = String::from("m");
        for component in self.components().iter().take(depth) {
            prefix.push('/');
            prefix.push_str(&format_component(*component));
        }
        prefix
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix(PATH_DEPTH))
    }
}

/// Parse a single path segment, honouring a trailing apostrophe for hardened indices
fn parse_component(segment: &str) -> Result<u32> {
    let segment = segment.trim();
    let (number, hardened) = match segment.strip_suffix('\'') {
        Some(number) => (number.trim(), true),
        None => (segment, false),
    };

    let value = parse_number(number, segment)?;
    if value > MAX_COMPONENT_INDEX {
        return Err(out_of_range(segment));
    }

    Ok(if hardened { value + HARDENED_OFFSET } else { value })
}

/// An integer literal with an optional sign
///
/// Follows integer literal syntax: `0b`, `0o` and `0x` prefixes select binary,
/// octal and hexadecimal, a bare leading `0` selects octal, and a single `_`
/// may separate digits or follow a prefix.
fn parse_number(number: &str, segment: &str) -> Result<u32> {
    let invalid = || Error::InvalidComponent {
        component: segment.to_string(),
    };

    let (negative, unsigned) = match number.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, number.strip_prefix('+').unwrap_or(number)),
    };

    let (radix, digits, prefixed) = match unsigned.as_bytes() {
        [b'0', b'x' | b'X', ..] => (16, &unsigned[2..], true),
        [b'0', b'o' | b'O', ..] => (8, &unsigned[2..], true),
        [b'0', b'b' | b'B', ..] => (2, &unsigned[2..], true),
        [b'0', _, ..] => (8, &unsigned[1..], true),
        _ => (10, unsigned, false),
    };

    // an underscore needs a prefix or digit before it and a digit after it
    let mut separator_allowed = prefixed;
    let mut trailing_separator = false;
    for c in digits.chars() {
        if c == '_' {
            if !separator_allowed {
                return Err(invalid());
            }
            separator_allowed = false;
            trailing_separator = true;
        } else {
            separator_allowed = true;
            trailing_separator = false;
        }
    }
    if trailing_separator {
        return Err(invalid());
    }

    let digits: String = digits.chars().filter(|c| *c != '_').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(invalid());
    }

    // digits are validated, so the only failure left is overflow
    match u32::from_str_radix(&digits, radix) {
        Ok(0) => Ok(0),
        Ok(value) if !negative => Ok(value),
        _ => Err(out_of_range(segment)),
    }
}

fn out_of_range(segment: &str) -> Error {
    Error::ComponentOutOfRange {
        component: segment.to_string(),
        max: MAX_COMPONENT_INDEX,
    }
}

fn format_component(component: u32) -> String {
    if component >= HARDENED_OFFSET {
        format!("{}'", component - HARDENED_OFFSET)
    } else {
        component.to_string()
    }
}
