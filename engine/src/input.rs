//! Encrypted inputs submitted alongside mutating calls.

use accord_types::{BitWidth, CiphertextHandle};
use serde::{Deserialize, Serialize};

/// Opaque zero-knowledge proof bytes produced by the client-side encryptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputProof(pub Vec<u8>);

impl InputProof {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A ciphertext handle plus the proof binding it to its submitter and target contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedInput {
    pub handle: CiphertextHandle,
    pub proof: InputProof,
}

impl EncryptedInput {
    pub fn new(handle: CiphertextHandle, proof: InputProof) -> Self {
        Self { handle, proof }
    }

    pub fn width(&self) -> BitWidth {
        self.handle.width()
    }
}
