//! Initiatives: funding proposals whose numeric fields are ciphertext handles.

use accord_engine::EncryptedInput;
use accord_types::{Address, CiphertextHandle, InitiativeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of an initiative. `Approved` and `Rejected` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InitiativeStatus {
    Pending,
    Approved,
    Rejected,
}

impl InitiativeStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Numeric code used on the query surface (`0`, `1`, `2`).
    pub fn code(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Approved => 1,
            Self::Rejected => 2,
        }
    }
}

impl fmt::Display for InitiativeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// Everything a proposer sends to open an initiative.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InitiativeSubmission {
    /// Encrypted summary text, stored verbatim.
    pub summary: Vec<u8>,
    /// Encrypted resource bundle, stored verbatim.
    pub resources: Vec<u8>,
    /// 64-bit requested budget.
    pub requested_budget: EncryptedInput,
    /// 32-bit base priority.
    pub base_priority: EncryptedInput,
    /// 32-bit detail value, visible only through explicit grants.
    pub detail: EncryptedInput,
}

/// A stored initiative.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Initiative {
    pub id: InitiativeId,
    pub proposer: Address,
    pub status: InitiativeStatus,
    pub summary: Vec<u8>,
    pub resources: Vec<u8>,
    pub requested_budget: CiphertextHandle,
    /// Encrypted zero until approval.
    pub allocated_budget: CiphertextHandle,
    pub base_priority: CiphertextHandle,
    /// Encrypted zero until the first vote.
    pub vote_tally: CiphertextHandle,
    pub detail: CiphertextHandle,
}

impl Initiative {
    pub fn view(&self) -> InitiativeView {
        InitiativeView {
            id: self.id,
            proposer: self.proposer,
            status: self.status,
            summary: self.summary.clone(),
            resources: self.resources.clone(),
        }
    }

    pub fn budgets(&self) -> InitiativeBudgets {
        InitiativeBudgets {
            requested: self.requested_budget,
            allocated: self.allocated_budget,
        }
    }

    pub fn priority(&self) -> InitiativePriority {
        InitiativePriority {
            base: self.base_priority,
            votes: self.vote_tally,
        }
    }
}

/// Plaintext metadata of an initiative.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeView {
    pub id: InitiativeId,
    pub proposer: Address,
    pub status: InitiativeStatus,
    pub summary: Vec<u8>,
    pub resources: Vec<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeBudgets {
    pub requested: CiphertextHandle,
    pub allocated: CiphertextHandle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativePriority {
    pub base: CiphertextHandle,
    pub votes: CiphertextHandle,
}
