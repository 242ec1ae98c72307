//! Decryption oracle seam and the reference ACL-enforcing oracle.

use crate::attestation::DecryptionAttestation;
use accord_acl::AclStore;
use accord_crypto::{derive_address, seal, verify_signature, SealedBox};
use accord_engine::PlaintextSource;
use accord_types::{
    Address, BitWidth, CiphertextHandle, ClearValue, Clock, HandleRequest, PublicKey, Signature,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;
use tracing::{debug, info_span, warn};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("account is not authorized to decrypt {handle}")]
    Unauthorized { handle: CiphertextHandle },

    #[error("attestation signature does not verify for the requesting account")]
    InvalidSignature,

    #[error("attestation is outside its validity window")]
    Expired,

    #[error("contract {0} is not covered by the attestation")]
    ContractNotAttested(Address),

    #[error("{len} handles requested, oracle accepts at most {max}")]
    TooManyHandles { len: usize, max: usize },

    #[error("oracle unavailable: {0}")]
    Unavailable(String),

    #[error("oracle internal error: {0}")]
    Internal(String),
}

/// Everything an oracle needs to authorize and fulfil one round.
///
/// The ephemeral secret never leaves the client; the oracle seals to
/// `attestation.public_key`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserDecryptRequest {
    pub handles: Vec<HandleRequest>,
    pub attestation: DecryptionAttestation,
    pub signature: Signature,
    /// Ed25519 key of `account`.
    pub signer_key: PublicKey,
    pub account: Address,
}

/// One cleartext sealed to the round's ephemeral key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedValue {
    pub handle: CiphertextHandle,
    pub sealed: SealedBox,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedResponse {
    pub values: Vec<SealedValue>,
}

impl SealedResponse {
    pub fn get(&self, handle: &CiphertextHandle) -> Option<&SealedBox> {
        self.values
            .iter()
            .find(|v| v.handle == *handle)
            .map(|v| &v.sealed)
    }
}

/// External service that turns authorized handles into sealed cleartexts.
pub trait DecryptionOracle: Send + Sync {
    fn user_decrypt(
        &self,
        request: UserDecryptRequest,
    ) -> impl Future<Output = Result<SealedResponse, OracleError>> + Send;
}

impl<O: DecryptionOracle> DecryptionOracle for std::sync::Arc<O> {
    fn user_decrypt(
        &self,
        request: UserDecryptRequest,
    ) -> impl Future<Output = Result<SealedResponse, OracleError>> + Send {
        (**self).user_decrypt(request)
    }
}

/// Sealed payload layout: one width-tag byte, then the little-endian value.
pub fn encode_cleartext(value: &ClearValue) -> Vec<u8> {
    let mut out = vec![value.width().tag()];
    out.extend(value.to_le_bytes());
    out
}

pub fn decode_cleartext(bytes: &[u8]) -> Option<ClearValue> {
    let (tag, value) = bytes.split_first()?;
    let width = BitWidth::from_tag(*tag).ok()?;
    ClearValue::from_le_bytes(width, value)
}

/// Reference oracle: checks the attestation and every ACL grant, then decrypts
/// with `keys` and seals each value to the attested key.
///
/// Authorization is all-or-nothing. If any handle fails, nothing is decrypted.
pub struct AclOracle<K, A, C> {
    keys: K,
    acl: A,
    clock: C,
    max_handles: usize,
}

impl<K, A, C> AclOracle<K, A, C>
where
    K: PlaintextSource,
    A: AclStore,
    C: Clock,
{
    pub fn new(keys: K, acl: A, clock: C) -> Self {
        Self {
            keys,
            acl,
            clock,
            max_handles: 256,
        }
    }

    pub fn with_max_handles(mut self, max_handles: usize) -> Self {
        self.max_handles = max_handles;
        self
    }

    fn authorize(&self, request: &UserDecryptRequest) -> Result<(), OracleError> {
        if request.handles.len() > self.max_handles {
            return Err(OracleError::TooManyHandles {
                len: request.handles.len(),
                max: self.max_handles,
            });
        }
        if derive_address(&request.signer_key) != request.account {
            return Err(OracleError::InvalidSignature);
        }
        let digest = request
            .attestation
            .digest()
            .map_err(|e| OracleError::Internal(e.to_string()))?;
        if !verify_signature(&digest, &request.signature, &request.signer_key) {
            return Err(OracleError::InvalidSignature);
        }
        if !request.attestation.is_valid_at(self.clock.now()) {
            return Err(OracleError::Expired);
        }
        for item in &request.handles {
            if !request.attestation.covers(&item.contract) {
                return Err(OracleError::ContractNotAttested(item.contract));
            }
        }
        for item in &request.handles {
            self.acl
                .require(&item.handle, &request.account)
                .map_err(|_| OracleError::Unauthorized {
                    handle: item.handle,
                })?;
        }
        Ok(())
    }

    fn process(&self, request: &UserDecryptRequest) -> Result<SealedResponse, OracleError> {
        let _span = info_span!(
            "user_decrypt",
            account = %request.account,
            handles = request.handles.len()
        )
        .entered();

        if let Err(e) = self.authorize(request) {
            warn!(error = %e, "decryption refused");
            return Err(e);
        }
        let response = self.fulfil(request)?;
        debug!("decryption fulfilled");
        Ok(response)
    }

    fn fulfil(&self, request: &UserDecryptRequest) -> Result<SealedResponse, OracleError> {
        let mut values = Vec::with_capacity(request.handles.len());
        for item in &request.handles {
            let clear = self
                .keys
                .decrypt(&item.handle)
                .map_err(|e| OracleError::Internal(e.to_string()))?;
            let sealed = seal(&encode_cleartext(&clear), &request.attestation.public_key)
                .map_err(|e| OracleError::Internal(e.to_string()))?;
            values.push(SealedValue {
                handle: item.handle,
                sealed,
            });
        }
        Ok(SealedResponse { values })
    }
}

impl<K, A, C> DecryptionOracle for AclOracle<K, A, C>
where
    K: PlaintextSource,
    A: AclStore,
    C: Clock,
{
    async fn user_decrypt(
        &self,
        request: UserDecryptRequest,
    ) -> Result<SealedResponse, OracleError> {
        self.process(&request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleartext_encoding_roundtrip() {
        for value in [
            ClearValue::Bool(true),
            ClearValue::U32(9999),
            ClearValue::U64(250),
        ] {
            assert_eq!(decode_cleartext(&encode_cleartext(&value)), Some(value));
        }
    }

    #[test]
    fn decode_rejects_bad_payloads() {
        assert_eq!(decode_cleartext(&[]), None);
        assert_eq!(decode_cleartext(&[9, 0, 0, 0, 0]), None);
        assert_eq!(decode_cleartext(&[BitWidth::U64.tag(), 1, 2, 3]), None);
    }
}
