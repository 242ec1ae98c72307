//! Client side of a decryption round.

use crate::attestation::DecryptionAttestation;
use crate::config::SessionConfig;
use crate::error::{SessionError, SessionStep};
use crate::keypair::EphemeralKeypair;
use crate::oracle::{decode_cleartext, DecryptionOracle, OracleError, UserDecryptRequest};
use crate::signer::{SignerError, WalletSigner};
use accord_types::{Address, CiphertextHandle, ClearValue, Clock, HandleRequest, SystemClock};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, info_span, warn, Instrument};

/// Per-account signing locks.
///
/// Clients that share one `SigningGates` never present the same account's wallet
/// with two overlapping signature prompts.
#[derive(Clone, Default)]
pub struct SigningGates {
    gates: Arc<Mutex<HashMap<Address, Arc<AsyncMutex<()>>>>>,
}

impl SigningGates {
    pub fn new() -> Self {
        Self::default()
    }

    fn gate(&self, account: &Address) -> Arc<AsyncMutex<()>> {
        let mut gates = self.gates.lock().unwrap_or_else(|e| e.into_inner());
        let gate = Arc::clone(gates.entry(*account).or_default());
        gate
    }
}

pub struct SessionClient<S, O, C = SystemClock> {
    signer: S,
    oracle: Option<O>,
    clock: C,
    config: SessionConfig,
    gates: SigningGates,
}

impl<S, O> SessionClient<S, O, SystemClock>
where
    S: WalletSigner,
    O: DecryptionOracle,
{
    /// A client on the system clock. `oracle` is `None` until the
    /// confidential-computation instance is ready.
    pub fn new(signer: S, oracle: Option<O>, config: SessionConfig) -> Self {
        Self::with_clock(signer, oracle, config, SystemClock)
    }
}

impl<S, O, C> SessionClient<S, O, C>
where
    S: WalletSigner,
    O: DecryptionOracle,
    C: Clock,
{
    pub fn with_clock(signer: S, oracle: Option<O>, config: SessionConfig, clock: C) -> Self {
        Self {
            signer,
            oracle,
            clock,
            config,
            gates: SigningGates::new(),
        }
    }

    /// Share signing gates with other clients for the same wallet.
    pub fn with_gates(mut self, gates: SigningGates) -> Self {
        self.gates = gates;
        self
    }

    pub fn account(&self) -> Address {
        self.signer.account()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_ready(&self) -> bool {
        self.oracle.is_some()
    }

    /// Resolve `requests` to cleartext in one round.
    ///
    /// An empty request list returns an empty map without signing anything.
    /// Any failure returns no cleartext at all.
    pub async fn user_decrypt(
        &self,
        requests: &[HandleRequest],
    ) -> Result<HashMap<CiphertextHandle, ClearValue>, SessionError> {
        if requests.is_empty() {
            return Ok(HashMap::new());
        }
        let oracle = self.oracle.as_ref().ok_or(SessionError::InstanceUnavailable)?;
        if requests.len() > self.config.max_handles_per_round {
            return Err(SessionError::TooManyHandles {
                len: requests.len(),
                max: self.config.max_handles_per_round,
            });
        }

        let account = self.signer.account();
        let span = info_span!("decryption_round", %account, handles = requests.len());
        self.round(oracle, account, requests).instrument(span).await
    }

    async fn round(
        &self,
        oracle: &O,
        account: Address,
        requests: &[HandleRequest],
    ) -> Result<HashMap<CiphertextHandle, ClearValue>, SessionError> {
        let keypair = EphemeralKeypair::generate();
        let attestation = DecryptionAttestation::new(
            keypair.public_key(),
            requests.iter().map(|r| r.contract),
            self.clock.now(),
            self.config.duration_days,
        );
        let digest = attestation.digest().map_err(|e| SessionError::Oracle {
            step: SessionStep::Attest,
            reason: e.to_string(),
        })?;

        let signature = {
            let gate = self.gates.gate(&account);
            let _held = gate.lock().await;
            debug!("requesting attestation signature");
            self.signer.sign_attestation(digest).await.map_err(|e| {
                warn!(error = %e, "attestation not signed");
                map_signer_error(e)
            })?
        };

        let request = UserDecryptRequest {
            handles: requests.to_vec(),
            attestation,
            signature,
            signer_key: self.signer.public_key(),
            account,
        };
        let response = oracle.user_decrypt(request).await.map_err(map_oracle_error)?;

        let mut clear = HashMap::with_capacity(requests.len());
        for item in requests {
            let sealed = response
                .get(&item.handle)
                .ok_or_else(|| SessionError::MalformedResponse {
                    handle: item.handle,
                    reason: "missing from response".into(),
                })?;
            let bytes = keypair
                .open(sealed)
                .map_err(|e| SessionError::MalformedResponse {
                    handle: item.handle,
                    reason: e.to_string(),
                })?;
            let value = decode_cleartext(&bytes).ok_or_else(|| SessionError::MalformedResponse {
                handle: item.handle,
                reason: "undecodable cleartext".into(),
            })?;
            if value.width() != item.handle.width() {
                return Err(SessionError::MalformedResponse {
                    handle: item.handle,
                    reason: format!("expected {}, got {}", item.handle.width(), value.width()),
                });
            }
            clear.insert(item.handle, value);
        }
        drop(keypair);

        info!(values = clear.len(), "decryption round complete");
        Ok(clear)
    }
}

fn map_signer_error(error: SignerError) -> SessionError {
    match error {
        SignerError::Rejected(reason) => SessionError::SignatureRejected { reason },
        SignerError::Unavailable(reason) => SessionError::WalletUnavailable { reason },
    }
}

fn map_oracle_error(error: OracleError) -> SessionError {
    match error {
        OracleError::Unauthorized { handle } => SessionError::Unauthorized { handle },
        OracleError::Expired => SessionError::Expired,
        OracleError::Unavailable(_) => SessionError::InstanceUnavailable,
        OracleError::TooManyHandles { len, max } => SessionError::TooManyHandles { len, max },
        other => SessionError::Oracle {
            step: SessionStep::Submit,
            reason: other.to_string(),
        },
    }
}
