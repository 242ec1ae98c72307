//! Ed25519 account keys and X25519 ephemeral secrets.

use accord_types::{KeyPair, PrivateKey, PublicKey};
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use x25519_dalek::{PublicKey as X25519Public, StaticSecret};

/// Generate a new Ed25519 key pair from a secure random source.
pub fn generate_keypair() -> KeyPair {
    let signing_key = SigningKey::generate(&mut OsRng);
    let verifying_key = signing_key.verifying_key();
    KeyPair {
        public: PublicKey(verifying_key.to_bytes()),
        private: PrivateKey(signing_key.to_bytes()),
    }
}

/// Derive a key pair from a 32-byte seed (deterministic).
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    let signing_key = SigningKey::from_bytes(seed);
    KeyPair {
        public: PublicKey(signing_key.verifying_key().to_bytes()),
        private: PrivateKey(signing_key.to_bytes()),
    }
}

/// A single-use X25519 secret.
///
/// Not `Clone`, `Debug`, or `Serialize`; the scalar is zeroized when dropped.
pub struct EphemeralSecret {
    secret: StaticSecret,
}

impl EphemeralSecret {
    /// The X25519 public key to hand to a counterparty.
    pub fn public_key(&self) -> [u8; 32] {
        X25519Public::from(&self.secret).to_bytes()
    }

    /// Raw shared secret with a counterparty's X25519 public key.
    pub fn diffie_hellman(&self, their_public: &[u8; 32]) -> [u8; 32] {
        let theirs = X25519Public::from(*their_public);
        self.secret.diffie_hellman(&theirs).to_bytes()
    }
}

/// Generate a fresh X25519 secret from a secure random source.
pub fn generate_ephemeral() -> EphemeralSecret {
    EphemeralSecret {
        secret: StaticSecret::random_from_rng(OsRng),
    }
}
