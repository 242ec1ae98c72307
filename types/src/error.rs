//! Top-level error type shared across crates.

use thiserror::Error;

/// Common error type for parsing and validating shared types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccordError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid ciphertext handle: {0}")]
    InvalidHandle(String),

    #[error("unknown bit-width tag {0}")]
    UnknownWidth(u8),

    #[error("unsupported handle version {0}")]
    UnsupportedVersion(u8),

    #[error("serialization error: {0}")]
    Serialization(String),
}
