//! Nullable wallet: signs attestations with an in-memory key.

use accord_crypto::{derive_address, keypair_from_seed, sign_message};
use accord_session::{SignerError, WalletSigner};
use accord_types::{Address, KeyPair, PublicKey, Signature};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// A wallet that signs on demand, can be told to refuse, and records how many
/// signature prompts were open at once.
pub struct NullSigner {
    keypair: KeyPair,
    account: Address,
    reject: AtomicBool,
    disconnected: AtomicBool,
    delay: Duration,
    prompts: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl NullSigner {
    /// A signer whose key is derived from `seed`.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let keypair = keypair_from_seed(&seed);
        let account = derive_address(&keypair.public);
        Self {
            keypair,
            account,
            reject: AtomicBool::new(false),
            disconnected: AtomicBool::new(false),
            delay: Duration::ZERO,
            prompts: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Hold each prompt open for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Make subsequent prompts refuse (or accept again).
    pub fn set_reject(&self, reject: bool) {
        self.reject.store(reject, Ordering::SeqCst);
    }

    /// Simulate the wallet going away (or coming back).
    pub fn set_disconnected(&self, disconnected: bool) {
        self.disconnected.store(disconnected, Ordering::SeqCst);
    }

    /// Total prompts answered or refused.
    pub fn prompts(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }

    /// Largest number of prompts that were open at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl WalletSigner for NullSigner {
    fn account(&self) -> Address {
        self.account
    }

    fn public_key(&self) -> PublicKey {
        self.keypair.public
    }

    async fn sign_attestation(&self, digest: [u8; 32]) -> Result<Signature, SignerError> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        let open = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(open, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let result = if self.disconnected.load(Ordering::SeqCst) {
            Err(SignerError::Unavailable("wallet session closed".into()))
        } else if self.reject.load(Ordering::SeqCst) {
            Err(SignerError::Rejected("user declined the signature request".into()))
        } else {
            Ok(sign_message(&digest, &self.keypair.private))
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accord_crypto::verify_signature;

    #[tokio::test]
    async fn signs_with_the_account_key() {
        let signer = NullSigner::from_seed([4; 32]);
        let sig = signer.sign_attestation([9; 32]).await.unwrap();
        assert!(verify_signature(&[9; 32], &sig, &signer.public_key()));
        assert_eq!(derive_address(&signer.public_key()), signer.account());
        assert_eq!(signer.prompts(), 1);
    }

    #[tokio::test]
    async fn refuses_when_told_to() {
        let signer = NullSigner::from_seed([4; 32]);
        signer.set_reject(true);
        assert!(matches!(
            signer.sign_attestation([0; 32]).await,
            Err(SignerError::Rejected(_))
        ));
    }
}
