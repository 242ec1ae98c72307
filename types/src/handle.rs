//! Ciphertext handles: opaque references to encrypted values.
//!
//! A handle never carries plaintext. It is 32 bytes: 30 bytes of identifier
//! entropy chosen by the confidential engine, one byte declaring the bit-width of
//! the encrypted value, and one format-version byte. Nothing in this workspace
//! other than a decryption oracle can turn a handle back into a value.

use crate::address::Address;
use crate::error::AccordError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Byte offset of the width tag inside a handle.
const WIDTH_TAG_OFFSET: usize = 30;
/// Byte offset of the format version inside a handle.
const VERSION_OFFSET: usize = 31;
/// The only handle format version currently issued.
pub const HANDLE_VERSION: u8 = 0;

/// Declared bit-width of the value behind a ciphertext handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BitWidth {
    Bool,
    U32,
    U64,
}

impl BitWidth {
    pub fn tag(&self) -> u8 {
        match self {
            Self::Bool => 0,
            Self::U32 => 4,
            Self::U64 => 5,
        }
    }

    pub fn from_tag(tag: u8) -> Result<Self, AccordError> {
        match tag {
            0 => Ok(Self::Bool),
            4 => Ok(Self::U32),
            5 => Ok(Self::U64),
            other => Err(AccordError::UnknownWidth(other)),
        }
    }

    pub fn bits(&self) -> u32 {
        match self {
            Self::Bool => 1,
            Self::U32 => 32,
            Self::U64 => 64,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "ebool",
            Self::U32 => "euint32",
            Self::U64 => "euint64",
        }
    }
}

impl fmt::Display for BitWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An opaque 32-byte reference to an encrypted value of a declared width.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CiphertextHandle([u8; 32]);

impl CiphertextHandle {
    /// Stamp the width tag and version into a 32-byte seed.
    ///
    /// The first 30 bytes of `seed` become the handle identifier; the last two
    /// bytes are overwritten.
    pub fn derive(seed: [u8; 32], width: BitWidth) -> Self {
        let mut bytes = seed;
        bytes[WIDTH_TAG_OFFSET] = width.tag();
        bytes[VERSION_OFFSET] = HANDLE_VERSION;
        Self(bytes)
    }

    /// Validate raw bytes as a handle.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, AccordError> {
        BitWidth::from_tag(bytes[WIDTH_TAG_OFFSET])?;
        if bytes[VERSION_OFFSET] != HANDLE_VERSION {
            return Err(AccordError::UnsupportedVersion(bytes[VERSION_OFFSET]));
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Declared width of the encrypted value.
    pub fn width(&self) -> BitWidth {
        // Construction paths validate the tag, so this cannot fail.
        BitWidth::from_tag(self.0[WIDTH_TAG_OFFSET]).unwrap_or(BitWidth::U64)
    }

    /// Parse a `0x`-prefixed 64-character hex handle (any letter case).
    pub fn parse(raw: &str) -> Result<Self, AccordError> {
        let digits = raw
            .trim()
            .strip_prefix("0x")
            .ok_or_else(|| AccordError::InvalidHandle(format!("missing 0x prefix: {raw}")))?;
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits.to_ascii_lowercase(), &mut bytes)
            .map_err(|e| AccordError::InvalidHandle(format!("{raw}: {e}")))?;
        Self::from_bytes(bytes)
    }
}

impl fmt::Display for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}..:{})", hex::encode(&self.0[..4]), self.width())
    }
}

impl FromStr for CiphertextHandle {
    type Err = AccordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CiphertextHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for CiphertextHandle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let raw = String::deserialize(deserializer)?;
            Self::parse(&raw).map_err(serde::de::Error::custom)
        } else {
            let bytes = <[u8; 32]>::deserialize(deserializer)?;
            Self::from_bytes(bytes).map_err(serde::de::Error::custom)
        }
    }
}

/// A handle paired with the contract that owns it, as submitted for decryption.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandleRequest {
    pub handle: CiphertextHandle,
    pub contract: Address,
}

impl HandleRequest {
    pub fn new(handle: CiphertextHandle, contract: Address) -> Self {
        Self { handle, contract }
    }
}
