//! Per-round ephemeral keypair.

use accord_crypto::{generate_ephemeral, open, CryptoError, EphemeralSecret, SealedBox};

/// A fresh X25519 keypair for a single decryption round.
///
/// Not `Clone`; the secret is zeroized when the keypair is dropped.
pub struct EphemeralKeypair {
    secret: EphemeralSecret,
    public: [u8; 32],
}

impl EphemeralKeypair {
    pub fn generate() -> Self {
        let secret = generate_ephemeral();
        let public = secret.public_key();
        Self { secret, public }
    }

    pub fn public_key(&self) -> [u8; 32] {
        self.public
    }

    /// Open a value the oracle sealed to this keypair.
    pub fn open(&self, sealed: &SealedBox) -> Result<Vec<u8>, CryptoError> {
        open(sealed, &self.secret)
    }
}
