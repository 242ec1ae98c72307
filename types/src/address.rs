//! Account and contract addresses, rendered with a `0x` prefix.

use crate::error::AccordError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A 20-byte account or contract address.
///
/// Addresses are always rendered as `0x` followed by 40 lowercase hex characters.
/// Parsing accepts any letter case, so two spellings of the same address compare
/// equal once parsed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    /// The standard prefix for rendered addresses.
    pub const PREFIX: &'static str = "0x";

    /// Number of raw address bytes.
    pub const LEN: usize = 20;

    pub const ZERO: Self = Self([0u8; 20]);

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Parse a `0x`-prefixed hex address, normalising letter case.
    pub fn parse(raw: &str) -> Result<Self, AccordError> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix(Self::PREFIX)
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| AccordError::InvalidAddress(format!("missing 0x prefix: {raw}")))?;
        if digits.len() != Self::LEN * 2 {
            return Err(AccordError::InvalidAddress(format!(
                "expected {} hex characters, got {}",
                Self::LEN * 2,
                digits.len()
            )));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits.to_ascii_lowercase(), &mut bytes)
            .map_err(|e| AccordError::InvalidAddress(format!("{raw}: {e}")))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = AccordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
