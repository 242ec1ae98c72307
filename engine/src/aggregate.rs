//! Homomorphic aggregation built from the engine's primitive operations.

use crate::{ConfidentialEngine, EngineError};
use accord_types::{BitWidth, CiphertextHandle, ClearValue};

/// Fold `handles` into a single encrypted sum, starting from an encrypted zero.
///
/// Every handle must have width `width`. An empty slice yields an encrypted zero.
pub fn sum<E: ConfidentialEngine + ?Sized>(
    engine: &E,
    handles: &[CiphertextHandle],
    width: BitWidth,
) -> Result<CiphertextHandle, EngineError> {
    let mut total = engine.trivial_encrypt(ClearValue::zero(width))?;
    for handle in handles {
        total = accumulate(engine, &total, handle)?;
    }
    Ok(total)
}

/// `total + delta`, checking widths before delegating to the engine.
pub fn accumulate<E: ConfidentialEngine + ?Sized>(
    engine: &E,
    total: &CiphertextHandle,
    delta: &CiphertextHandle,
) -> Result<CiphertextHandle, EngineError> {
    ensure_same_width(total, delta)?;
    engine.add(total, delta)
}

/// `minuend - subtrahend`, floored at zero.
///
/// Computed as `select(subtrahend <= minuend, minuend - subtrahend, 0)` so the
/// floor holds without decrypting either operand.
pub fn saturating_sub<E: ConfidentialEngine + ?Sized>(
    engine: &E,
    minuend: &CiphertextHandle,
    subtrahend: &CiphertextHandle,
) -> Result<CiphertextHandle, EngineError> {
    ensure_same_width(minuend, subtrahend)?;
    let fits = engine.le(subtrahend, minuend)?;
    let difference = engine.sub(minuend, subtrahend)?;
    let zero = engine.trivial_encrypt(ClearValue::zero(minuend.width()))?;
    engine.select(&fits, &difference, &zero)
}

fn ensure_same_width(lhs: &CiphertextHandle, rhs: &CiphertextHandle) -> Result<(), EngineError> {
    if lhs.width() != rhs.width() {
        return Err(EngineError::WidthMismatch {
            lhs: lhs.width(),
            rhs: rhs.width(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EncryptedInput, PlaintextSource};
    use accord_types::Address;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Minimal cleartext-backed engine for exercising the helpers.
    #[derive(Default)]
    struct PlainEngine {
        values: Mutex<HashMap<CiphertextHandle, ClearValue>>,
    }

    impl PlainEngine {
        fn put(&self, value: ClearValue) -> CiphertextHandle {
            let mut values = self.values.lock().unwrap();
            let mut seed = [0u8; 32];
            seed[..8].copy_from_slice(&(values.len() as u64 + 1).to_le_bytes());
            let handle = CiphertextHandle::derive(seed, value.width());
            values.insert(handle, value);
            handle
        }

        fn get(&self, handle: &CiphertextHandle) -> Result<ClearValue, EngineError> {
            self.values
                .lock()
                .unwrap()
                .get(handle)
                .copied()
                .ok_or(EngineError::UnknownHandle(*handle))
        }

        fn binary(
            &self,
            lhs: &CiphertextHandle,
            rhs: &CiphertextHandle,
            op: impl Fn(u64, u64) -> u64,
        ) -> Result<CiphertextHandle, EngineError> {
            let (a, b) = (self.get(lhs)?, self.get(rhs)?);
            Ok(self.put(ClearValue::from_u64(a.width(), op(a.as_u64(), b.as_u64()))))
        }
    }

    impl ConfidentialEngine for PlainEngine {
        fn verify_input(
            &self,
            input: &EncryptedInput,
            _owner: &Address,
            _contract: &Address,
            _expected: BitWidth,
        ) -> Result<CiphertextHandle, EngineError> {
            Ok(input.handle)
        }

        fn trivial_encrypt(&self, value: ClearValue) -> Result<CiphertextHandle, EngineError> {
            Ok(self.put(value))
        }

        fn add(
            &self,
            lhs: &CiphertextHandle,
            rhs: &CiphertextHandle,
        ) -> Result<CiphertextHandle, EngineError> {
            self.binary(lhs, rhs, u64::wrapping_add)
        }

        fn sub(
            &self,
            lhs: &CiphertextHandle,
            rhs: &CiphertextHandle,
        ) -> Result<CiphertextHandle, EngineError> {
            self.binary(lhs, rhs, u64::wrapping_sub)
        }

        fn le(
            &self,
            lhs: &CiphertextHandle,
            rhs: &CiphertextHandle,
        ) -> Result<CiphertextHandle, EngineError> {
            let (a, b) = (self.get(lhs)?, self.get(rhs)?);
            Ok(self.put(ClearValue::Bool(a.as_u64() <= b.as_u64())))
        }

        fn select(
            &self,
            condition: &CiphertextHandle,
            if_true: &CiphertextHandle,
            if_false: &CiphertextHandle,
        ) -> Result<CiphertextHandle, EngineError> {
            let chosen = if self.get(condition)? == ClearValue::Bool(true) {
                self.get(if_true)?
            } else {
                self.get(if_false)?
            };
            Ok(self.put(chosen))
        }

        fn name(&self) -> &str {
            "plain"
        }
    }

    impl PlaintextSource for PlainEngine {
        fn decrypt(&self, handle: &CiphertextHandle) -> Result<ClearValue, EngineError> {
            self.get(handle)
        }
    }

    #[test]
    fn sum_of_nothing_is_zero() {
        let engine = PlainEngine::default();
        let total = sum(&engine, &[], BitWidth::U64).unwrap();
        assert_eq!(engine.decrypt(&total).unwrap(), ClearValue::U64(0));
    }

    #[test]
    fn sum_adds_every_handle() {
        let engine = PlainEngine::default();
        let handles: Vec<_> = [300u64, 120, 7]
            .iter()
            .map(|v| engine.put(ClearValue::U64(*v)))
            .collect();
        let total = sum(&engine, &handles, BitWidth::U64).unwrap();
        assert_eq!(engine.decrypt(&total).unwrap(), ClearValue::U64(427));
    }

    #[test]
    fn accumulate_rejects_mixed_widths() {
        let engine = PlainEngine::default();
        let wide = engine.put(ClearValue::U64(1));
        let narrow = engine.put(ClearValue::U32(1));
        assert_eq!(
            accumulate(&engine, &wide, &narrow),
            Err(EngineError::WidthMismatch {
                lhs: BitWidth::U64,
                rhs: BitWidth::U32,
            })
        );
    }

    #[test]
    fn accumulate_wraps_at_width() {
        let engine = PlainEngine::default();
        let a = engine.put(ClearValue::U32(u32::MAX));
        let b = engine.put(ClearValue::U32(2));
        let total = accumulate(&engine, &a, &b).unwrap();
        assert_eq!(engine.decrypt(&total).unwrap(), ClearValue::U32(1));
    }

    #[test]
    fn saturating_sub_within_range() {
        let engine = PlainEngine::default();
        let pool = engine.put(ClearValue::U64(600));
        let allocated = engine.put(ClearValue::U64(420));
        let remaining = saturating_sub(&engine, &pool, &allocated).unwrap();
        assert_eq!(engine.decrypt(&remaining).unwrap(), ClearValue::U64(180));
    }

    #[test]
    fn saturating_sub_floors_at_zero() {
        let engine = PlainEngine::default();
        let pool = engine.put(ClearValue::U64(100));
        let allocated = engine.put(ClearValue::U64(250));
        let remaining = saturating_sub(&engine, &pool, &allocated).unwrap();
        assert_eq!(engine.decrypt(&remaining).unwrap(), ClearValue::U64(0));
    }

    #[test]
    fn saturating_sub_equal_operands_is_zero() {
        let engine = PlainEngine::default();
        let pool = engine.put(ClearValue::U64(200));
        let allocated = engine.put(ClearValue::U64(200));
        let remaining = saturating_sub(&engine, &pool, &allocated).unwrap();
        assert_eq!(engine.decrypt(&remaining).unwrap(), ClearValue::U64(0));
    }

    #[test]
    fn helpers_leave_operands_untouched() {
        let engine = PlainEngine::default();
        let a = engine.put(ClearValue::U64(5));
        let b = engine.put(ClearValue::U64(9));
        let _ = saturating_sub(&engine, &a, &b).unwrap();
        assert_eq!(engine.decrypt(&a).unwrap(), ClearValue::U64(5));
        assert_eq!(engine.decrypt(&b).unwrap(), ClearValue::U64(9));
    }
}
