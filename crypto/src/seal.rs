//! Sealed boxes: encrypt a payload to an X25519 public key.
//!
//! The sender generates a one-off X25519 secret, derives a symmetric key from the
//! Diffie-Hellman shared secret bound to both public keys, and encrypts with
//! ChaCha20-Poly1305 under a random nonce. Only the holder of the recipient
//! secret can open the box.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::CryptoError;
use crate::hash::blake2b_256_multi;
use crate::keys::{generate_ephemeral, EphemeralSecret};

const SEAL_DOMAIN: &[u8] = b"accord-seal-v1";
const NONCE_LEN: usize = 12;

/// An encrypted payload addressed to one X25519 public key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedBox {
    /// The sender's one-off X25519 public key.
    pub sender_public: [u8; 32],
    pub nonce: [u8; NONCE_LEN],
    /// Ciphertext including the 16-byte Poly1305 tag.
    pub ciphertext: Vec<u8>,
}

fn derive_cipher(
    shared: &[u8; 32],
    sender_public: &[u8; 32],
    recipient_public: &[u8; 32],
) -> Result<ChaCha20Poly1305, CryptoError> {
    let key = blake2b_256_multi(&[SEAL_DOMAIN, shared, sender_public, recipient_public]);
    ChaCha20Poly1305::new_from_slice(&key).map_err(|e| CryptoError::InvalidKey(e.to_string()))
}

/// Seal `plaintext` so only the owner of `recipient_public` can read it.
pub fn seal(plaintext: &[u8], recipient_public: &[u8; 32]) -> Result<SealedBox, CryptoError> {
    let sender = generate_ephemeral();
    let sender_public = sender.public_key();
    let shared = sender.diffie_hellman(recipient_public);
    let cipher = derive_cipher(&shared, &sender_public, recipient_public)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
    let ciphertext = cipher
        .encrypt(&Nonce::from(nonce_bytes), plaintext)
        .map_err(|e| CryptoError::SealFailed(e.to_string()))?;

    Ok(SealedBox {
        sender_public,
        nonce: nonce_bytes,
        ciphertext,
    })
}

/// Open a sealed box with the recipient's secret.
pub fn open(sealed: &SealedBox, recipient: &EphemeralSecret) -> Result<Vec<u8>, CryptoError> {
    let shared = recipient.diffie_hellman(&sealed.sender_public);
    let cipher = derive_cipher(&shared, &sealed.sender_public, &recipient.public_key())?;
    cipher
        .decrypt(&Nonce::from(sealed.nonce), sealed.ciphertext.as_ref())
        .map_err(|_| CryptoError::OpenFailed)
}
