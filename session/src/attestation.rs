//! Signed, time-boxed attestations binding an ephemeral key to a set of contracts.

use accord_crypto::domain_digest;
use accord_types::{Address, Timestamp, SECS_PER_DAY};
use serde::{Deserialize, Serialize};

/// Domain separator for attestation digests.
pub const ATTESTATION_DOMAIN: &str = "accord-decrypt-attestation-v1";

/// What the wallet signs before a decryption round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptionAttestation {
    /// X25519 key the oracle seals cleartexts to.
    pub public_key: [u8; 32],
    /// Contracts owning the requested handles, sorted and de-duplicated.
    pub contract_addresses: Vec<Address>,
    pub start_timestamp: Timestamp,
    pub duration_days: u32,
}

impl DecryptionAttestation {
    pub fn new(
        public_key: [u8; 32],
        contracts: impl IntoIterator<Item = Address>,
        start_timestamp: Timestamp,
        duration_days: u32,
    ) -> Self {
        let mut contract_addresses: Vec<Address> = contracts.into_iter().collect();
        contract_addresses.sort();
        contract_addresses.dedup();
        Self {
            public_key,
            contract_addresses,
            start_timestamp,
            duration_days,
        }
    }

    /// Domain-separated Blake2b digest of the canonical bincode encoding.
    pub fn digest(&self) -> Result<[u8; 32], bincode::Error> {
        let encoded = bincode::serialize(self)?;
        Ok(domain_digest(ATTESTATION_DOMAIN, &encoded))
    }

    /// `start <= now < start + duration_days`.
    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        let window = u64::from(self.duration_days) * SECS_PER_DAY;
        self.start_timestamp <= now && !self.start_timestamp.has_expired(window, now)
    }

    pub fn covers(&self, contract: &Address) -> bool {
        self.contract_addresses.binary_search(contract).is_ok()
    }
}
