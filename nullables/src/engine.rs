//! Nullable confidential engine: cleartext-backed homomorphic operations.
//!
//! Handles are derived from a counter, so runs are reproducible. Proofs are a
//! Blake2b digest over `(handle, owner, contract)`: an input encrypted for one
//! account or contract does not verify for another.

use accord_crypto::domain_digest;
use accord_engine::{ConfidentialEngine, EncryptedInput, EngineError, InputProof, PlaintextSource};
use accord_types::{Address, BitWidth, CiphertextHandle, ClearValue};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

const HANDLE_DOMAIN: &str = "accord-null-handle";
const PROOF_DOMAIN: &str = "accord-null-proof";

/// An in-memory engine that stores the clear value behind every handle.
#[derive(Default)]
pub struct NullEngine {
    values: Mutex<HashMap<CiphertextHandle, ClearValue>>,
    next: AtomicU64,
    /// Operations left before the engine starts failing; `None` never fails.
    budget: Mutex<Option<u64>>,
}

impl NullEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client-side encryption: register `value` and prove it for `(owner, contract)`.
    pub fn encrypt_input(
        &self,
        value: ClearValue,
        owner: &Address,
        contract: &Address,
    ) -> EncryptedInput {
        let handle = self.store(value);
        EncryptedInput::new(handle, Self::prove(&handle, owner, contract))
    }

    /// Let `ops` more computations succeed, then fail with `Unavailable`.
    pub fn fail_after(&self, ops: u64) {
        *self.budget.lock().unwrap_or_else(|e| e.into_inner()) = Some(ops);
    }

    /// Clear a previous [`NullEngine::fail_after`].
    pub fn recover(&self) {
        *self.budget.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Peek at a clear value without going through an oracle.
    pub fn reveal(&self, handle: &CiphertextHandle) -> Option<ClearValue> {
        self.values().get(handle).copied()
    }

    fn prove(handle: &CiphertextHandle, owner: &Address, contract: &Address) -> InputProof {
        let mut payload = Vec::with_capacity(32 + 2 * Address::LEN);
        payload.extend_from_slice(handle.as_bytes());
        payload.extend_from_slice(owner.as_bytes());
        payload.extend_from_slice(contract.as_bytes());
        InputProof(domain_digest(PROOF_DOMAIN, &payload).to_vec())
    }

    fn values(&self) -> MutexGuard<'_, HashMap<CiphertextHandle, ClearValue>> {
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn store(&self, value: ClearValue) -> CiphertextHandle {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        let seed = domain_digest(HANDLE_DOMAIN, &n.to_le_bytes());
        let handle = CiphertextHandle::derive(seed, value.width());
        self.values().insert(handle, value);
        handle
    }

    fn load(&self, handle: &CiphertextHandle) -> Result<ClearValue, EngineError> {
        self.values()
            .get(handle)
            .copied()
            .ok_or(EngineError::UnknownHandle(*handle))
    }

    fn spend(&self) -> Result<(), EngineError> {
        let mut budget = self.budget.lock().unwrap_or_else(|e| e.into_inner());
        match budget.as_mut() {
            Some(0) => Err(EngineError::Unavailable("operation budget exhausted".into())),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn same_width(
        &self,
        lhs: &CiphertextHandle,
        rhs: &CiphertextHandle,
    ) -> Result<(ClearValue, ClearValue), EngineError> {
        let (a, b) = (self.load(lhs)?, self.load(rhs)?);
        if a.width() != b.width() {
            return Err(EngineError::WidthMismatch {
                lhs: a.width(),
                rhs: b.width(),
            });
        }
        Ok((a, b))
    }

    fn arithmetic(
        &self,
        lhs: &CiphertextHandle,
        rhs: &CiphertextHandle,
        op: fn(u64, u64) -> u64,
    ) -> Result<CiphertextHandle, EngineError> {
        self.spend()?;
        let (a, b) = self.same_width(lhs, rhs)?;
        Ok(self.store(ClearValue::from_u64(a.width(), op(a.as_u64(), b.as_u64()))))
    }
}

impl ConfidentialEngine for NullEngine {
    fn verify_input(
        &self,
        input: &EncryptedInput,
        owner: &Address,
        contract: &Address,
        expected: BitWidth,
    ) -> Result<CiphertextHandle, EngineError> {
        self.spend()?;
        if input.proof != Self::prove(&input.handle, owner, contract) {
            return Err(EngineError::InvalidProof(input.handle));
        }
        self.load(&input.handle)?;
        if input.width() != expected {
            return Err(EngineError::WrongWidth {
                handle: input.handle,
                expected,
                actual: input.width(),
            });
        }
        Ok(input.handle)
    }

    fn trivial_encrypt(&self, value: ClearValue) -> Result<CiphertextHandle, EngineError> {
        self.spend()?;
        Ok(self.store(value))
    }

    fn add(
        &self,
        lhs: &CiphertextHandle,
        rhs: &CiphertextHandle,
    ) -> Result<CiphertextHandle, EngineError> {
        self.arithmetic(lhs, rhs, u64::wrapping_add)
    }

    fn sub(
        &self,
        lhs: &CiphertextHandle,
        rhs: &CiphertextHandle,
    ) -> Result<CiphertextHandle, EngineError> {
        self.arithmetic(lhs, rhs, u64::wrapping_sub)
    }

    fn le(
        &self,
        lhs: &CiphertextHandle,
        rhs: &CiphertextHandle,
    ) -> Result<CiphertextHandle, EngineError> {
        self.spend()?;
        let (a, b) = self.same_width(lhs, rhs)?;
        Ok(self.store(ClearValue::Bool(a.as_u64() <= b.as_u64())))
    }

    fn select(
        &self,
        condition: &CiphertextHandle,
        if_true: &CiphertextHandle,
        if_false: &CiphertextHandle,
    ) -> Result<CiphertextHandle, EngineError> {
        self.spend()?;
        let condition = match self.load(condition)? {
            ClearValue::Bool(b) => b,
            other => {
                return Err(EngineError::WidthMismatch {
                    lhs: BitWidth::Bool,
                    rhs: other.width(),
                })
            }
        };
        let (a, b) = self.same_width(if_true, if_false)?;
        Ok(self.store(if condition { a } else { b }))
    }

    fn name(&self) -> &str {
        "null"
    }
}

impl PlaintextSource for NullEngine {
    fn decrypt(&self, handle: &CiphertextHandle) -> Result<ClearValue, EngineError> {
        self.load(handle)
    }
}
