//! Wallet signing seam.

use accord_types::{Address, PublicKey, Signature};
use std::future::Future;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignerError {
    #[error("user declined: {0}")]
    Rejected(String),

    #[error("wallet unavailable: {0}")]
    Unavailable(String),
}

/// The wallet layer that proves account ownership.
pub trait WalletSigner: Send + Sync {
    /// Account the signatures are bound to.
    fn account(&self) -> Address;

    /// Ed25519 key the account address derives from.
    fn public_key(&self) -> PublicKey;

    /// Sign an attestation digest. May prompt the user and may be refused.
    fn sign_attestation(
        &self,
        digest: [u8; 32],
    ) -> impl Future<Output = Result<Signature, SignerError>> + Send;
}

impl<S: WalletSigner> WalletSigner for std::sync::Arc<S> {
    fn account(&self) -> Address {
        (**self).account()
    }

    fn public_key(&self) -> PublicKey {
        (**self).public_key()
    }

    fn sign_attestation(
        &self,
        digest: [u8; 32],
    ) -> impl Future<Output = Result<Signature, SignerError>> + Send {
        (**self).sign_attestation(digest)
    }
}
