//! Confidential-computation capability for accord.
//!
//! The homomorphic-encryption scheme lives in an external engine. This crate
//! only names the capabilities the ledger and the decryption oracle need:
//!
//! - [`ConfidentialEngine`]: verify encrypted inputs and compute on handles
//!   without ever seeing plaintext (used by the ledger).
//! - [`PlaintextSource`]: turn a handle back into a clear value (used only by a
//!   decryption oracle, after its ACL check).
//!
//! The [`aggregate`] module builds sums and saturating differences on top of the
//! engine's primitive operations.

pub mod aggregate;
pub mod error;
pub mod input;

pub use aggregate::{accumulate, saturating_sub, sum};
pub use error::EngineError;
pub use input::{EncryptedInput, InputProof};

use accord_types::{Address, BitWidth, CiphertextHandle, ClearValue};
use std::sync::Arc;

/// Homomorphic operations over ciphertext handles.
///
/// Every operation returns a fresh handle and leaves its operands untouched, so a
/// caller that abandons a computation half-way has not changed anything it
/// already stored. Arithmetic wraps modulo the operand width.
pub trait ConfidentialEngine: Send + Sync {
    /// Check an encrypted input's proof against `(handle, owner, contract)` and
    /// that the handle declares `expected` width. Returns the accepted handle.
    fn verify_input(
        &self,
        input: &EncryptedInput,
        owner: &Address,
        contract: &Address,
        expected: BitWidth,
    ) -> Result<CiphertextHandle, EngineError>;

    /// Encrypt a public constant (used for encrypted zeros).
    fn trivial_encrypt(&self, value: ClearValue) -> Result<CiphertextHandle, EngineError>;

    /// `lhs + rhs`, wrapping.
    fn add(
        &self,
        lhs: &CiphertextHandle,
        rhs: &CiphertextHandle,
    ) -> Result<CiphertextHandle, EngineError>;

    /// `lhs - rhs`, wrapping.
    fn sub(
        &self,
        lhs: &CiphertextHandle,
        rhs: &CiphertextHandle,
    ) -> Result<CiphertextHandle, EngineError>;

    /// Encrypted boolean `lhs <= rhs`.
    fn le(
        &self,
        lhs: &CiphertextHandle,
        rhs: &CiphertextHandle,
    ) -> Result<CiphertextHandle, EngineError>;

    /// `if condition { if_true } else { if_false }` without revealing `condition`.
    fn select(
        &self,
        condition: &CiphertextHandle,
        if_true: &CiphertextHandle,
        if_false: &CiphertextHandle,
    ) -> Result<CiphertextHandle, EngineError>;

    /// Human-readable name of this engine.
    fn name(&self) -> &str;
}

/// Key-management capability: recover the clear value behind a handle.
pub trait PlaintextSource: Send + Sync {
    fn decrypt(&self, handle: &CiphertextHandle) -> Result<ClearValue, EngineError>;
}

impl<E: ConfidentialEngine + ?Sized> ConfidentialEngine for Arc<E> {
    fn verify_input(
        &self,
        input: &EncryptedInput,
        owner: &Address,
        contract: &Address,
        expected: BitWidth,
    ) -> Result<CiphertextHandle, EngineError> {
        (**self).verify_input(input, owner, contract, expected)
    }

    fn trivial_encrypt(&self, value: ClearValue) -> Result<CiphertextHandle, EngineError> {
        (**self).trivial_encrypt(value)
    }

    fn add(
        &self,
        lhs: &CiphertextHandle,
        rhs: &CiphertextHandle,
    ) -> Result<CiphertextHandle, EngineError> {
        (**self).add(lhs, rhs)
    }

    fn sub(
        &self,
        lhs: &CiphertextHandle,
        rhs: &CiphertextHandle,
    ) -> Result<CiphertextHandle, EngineError> {
        (**self).sub(lhs, rhs)
    }

    fn le(
        &self,
        lhs: &CiphertextHandle,
        rhs: &CiphertextHandle,
    ) -> Result<CiphertextHandle, EngineError> {
        (**self).le(lhs, rhs)
    }

    fn select(
        &self,
        condition: &CiphertextHandle,
        if_true: &CiphertextHandle,
        if_false: &CiphertextHandle,
    ) -> Result<CiphertextHandle, EngineError> {
        (**self).select(condition, if_true, if_false)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<P: PlaintextSource + ?Sized> PlaintextSource for Arc<P> {
    fn decrypt(&self, handle: &CiphertextHandle) -> Result<ClearValue, EngineError> {
        (**self).decrypt(handle)
    }
}
