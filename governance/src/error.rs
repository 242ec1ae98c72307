use accord_engine::EngineError;
use accord_types::{Address, BitWidth, InitiativeId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("proof for {field} does not verify")]
    InvalidProof { field: &'static str },

    #[error("{field} must be {expected}, got {actual}")]
    WrongWidth {
        field: &'static str,
        expected: BitWidth,
        actual: BitWidth,
    },

    #[error("{0} is not a committee member")]
    NotCommittee(Address),

    #[error("{0} is not the ledger admin")]
    NotAdmin(Address),

    #[error("initiative {0} not found")]
    UnknownInitiative(InitiativeId),

    #[error("initiative {0} is no longer pending")]
    AlreadyResolved(InitiativeId),

    #[error("{field} blob is {len} bytes, limit is {max}")]
    BlobTooLarge {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("simulation over {len} initiatives exceeds the batch limit of {max}")]
    SelectionTooLarge { len: usize, max: usize },

    #[error("confidential engine: {0}")]
    Engine(#[from] EngineError),

    #[error("ledger service is closed")]
    ServiceClosed,
}
