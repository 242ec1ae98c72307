use accord_types::{BitWidth, CiphertextHandle};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("input proof does not verify for handle {0}")]
    InvalidProof(CiphertextHandle),

    #[error("handle {handle} declares {actual}, expected {expected}")]
    WrongWidth {
        handle: CiphertextHandle,
        expected: BitWidth,
        actual: BitWidth,
    },

    #[error("operand widths differ: {lhs} vs {rhs}")]
    WidthMismatch { lhs: BitWidth, rhs: BitWidth },

    #[error("unknown ciphertext handle {0}")]
    UnknownHandle(CiphertextHandle),

    #[error("confidential engine unavailable: {0}")]
    Unavailable(String),

    #[error("engine backend error: {0}")]
    Backend(String),
}
