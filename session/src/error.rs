use accord_types::CiphertextHandle;
use std::fmt;
use thiserror::Error;

/// The protocol step at which a decryption round failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStep {
    Attest,
    Sign,
    Submit,
    Open,
}

impl fmt::Display for SessionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attest => write!(f, "attest"),
            Self::Sign => write!(f, "sign"),
            Self::Submit => write!(f, "submit"),
            Self::Open => write!(f, "open"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("no decryption oracle instance is available")]
    InstanceUnavailable,

    #[error("wallet declined to sign the attestation: {reason}")]
    SignatureRejected { reason: String },

    #[error("wallet is not connected: {reason}")]
    WalletUnavailable { reason: String },

    #[error("not authorized to decrypt {handle}")]
    Unauthorized { handle: CiphertextHandle },

    #[error("attestation is outside its validity window")]
    Expired,

    #[error("{len} handles requested, at most {max} per round")]
    TooManyHandles { len: usize, max: usize },

    #[error("decryption failed at {step}: {reason}")]
    Oracle { step: SessionStep, reason: String },

    #[error("malformed value for {handle}: {reason}")]
    MalformedResponse {
        handle: CiphertextHandle,
        reason: String,
    },
}

impl SessionError {
    /// The step that failed, for errors tied to one.
    pub fn step(&self) -> Option<SessionStep> {
        match self {
            Self::InstanceUnavailable | Self::TooManyHandles { .. } => None,
            Self::SignatureRejected { .. } | Self::WalletUnavailable { .. } => {
                Some(SessionStep::Sign)
            }
            Self::Unauthorized { .. } | Self::Expired => Some(SessionStep::Submit),
            Self::Oracle { step, .. } => Some(*step),
            Self::MalformedResponse { .. } => Some(SessionStep::Open),
        }
    }
}
