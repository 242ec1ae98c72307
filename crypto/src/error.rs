use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("sealed box failed authentication")]
    OpenFailed,

    #[error("sealing failed: {0}")]
    SealFailed(String),

    #[error("invalid key material: {0}")]
    InvalidKey(String),
}
