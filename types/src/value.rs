//! Clear values recovered by a decryption oracle.

use crate::handle::BitWidth;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A decrypted value, typed by the width of the handle it came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClearValue {
    Bool(bool),
    U32(u32),
    U64(u64),
}

impl ClearValue {
    /// The zero value of a width.
    pub fn zero(width: BitWidth) -> Self {
        match width {
            BitWidth::Bool => Self::Bool(false),
            BitWidth::U32 => Self::U32(0),
            BitWidth::U64 => Self::U64(0),
        }
    }

    pub fn width(&self) -> BitWidth {
        match self {
            Self::Bool(_) => BitWidth::Bool,
            Self::U32(_) => BitWidth::U32,
            Self::U64(_) => BitWidth::U64,
        }
    }

    /// Widen to `u64` (booleans become 0 or 1).
    pub fn as_u64(&self) -> u64 {
        match *self {
            Self::Bool(b) => u64::from(b),
            Self::U32(v) => u64::from(v),
            Self::U64(v) => v,
        }
    }

    /// Truncate a `u64` into the given width (wrapping, like the ciphertext domain).
    pub fn from_u64(width: BitWidth, raw: u64) -> Self {
        match width {
            BitWidth::Bool => Self::Bool(raw & 1 == 1),
            BitWidth::U32 => Self::U32(raw as u32),
            BitWidth::U64 => Self::U64(raw),
        }
    }

    /// Little-endian encoding, sized by width (1, 4 or 8 bytes).
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match *self {
            Self::Bool(b) => vec![u8::from(b)],
            Self::U32(v) => v.to_le_bytes().to_vec(),
            Self::U64(v) => v.to_le_bytes().to_vec(),
        }
    }

    /// Inverse of [`ClearValue::to_le_bytes`]. Returns `None` on a length mismatch.
    pub fn from_le_bytes(width: BitWidth, bytes: &[u8]) -> Option<Self> {
        match width {
            BitWidth::Bool => match bytes {
                [0] => Some(Self::Bool(false)),
                [1] => Some(Self::Bool(true)),
                _ => None,
            },
            BitWidth::U32 => Some(Self::U32(u32::from_le_bytes(bytes.try_into().ok()?))),
            BitWidth::U64 => Some(Self::U64(u64::from_le_bytes(bytes.try_into().ok()?))),
        }
    }
}

impl fmt::Display for ClearValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
        }
    }
}
