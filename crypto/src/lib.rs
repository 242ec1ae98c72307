//! Cryptographic primitives for accord.
//!
//! - **Ed25519** for account keys and attestation signatures
//! - **Blake2b** for hashing and domain-separated digests
//! - **X25519 + ChaCha20-Poly1305** for sealing cleartexts to an ephemeral key
//! - Address derivation: `0x` + last 20 bytes of Blake2b-256(public key)

pub mod address;
pub mod error;
pub mod hash;
pub mod keys;
pub mod seal;
pub mod sign;

pub use address::derive_address;
pub use error::CryptoError;
pub use hash::{blake2b_256, blake2b_256_multi, domain_digest};
pub use keys::{
    generate_ephemeral, generate_keypair, keypair_from_seed, EphemeralSecret,
};
pub use seal::{open, seal, SealedBox};
pub use sign::{sign_message, verify_signature};
