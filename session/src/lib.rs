//! Decryption sessions.
//!
//! A client recovers cleartext for handles it is entitled to see in one round:
//!
//! 1. generate a fresh X25519 keypair
//! 2. build a [`DecryptionAttestation`] over that key, the owning contracts, and a
//!    validity window
//! 3. have the wallet sign the attestation digest
//! 4. send the handles and the signed attestation to a [`DecryptionOracle`], which
//!    checks ACL grants and returns every cleartext sealed to the ephemeral key
//! 5. open the sealed values locally and discard the keypair
//!
//! Nothing is cached between rounds: every call re-signs with a new key.

pub mod attestation;
pub mod client;
pub mod config;
pub mod error;
pub mod keypair;
pub mod oracle;
pub mod signer;

pub use attestation::{DecryptionAttestation, ATTESTATION_DOMAIN};
pub use client::{SessionClient, SigningGates};
pub use config::SessionConfig;
pub use error::{SessionError, SessionStep};
pub use keypair::EphemeralKeypair;
pub use oracle::{
    decode_cleartext, encode_cleartext, AclOracle, DecryptionOracle, OracleError, SealedResponse,
    SealedValue, UserDecryptRequest,
};
pub use signer::{SignerError, WalletSigner};
