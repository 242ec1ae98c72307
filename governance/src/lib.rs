//! Confidential governance ledger.
//!
//! Initiatives carry their requested budget, base priority, vote tally, allocation,
//! and detail value as ciphertext handles. The ledger:
//!
//! - verifies every encrypted input against its submitter and this ledger's contract
//! - keeps encrypted running totals of requested budget, allocated budget, and priority
//! - runs non-committing allocation and approval simulations per account
//! - grants ACL rights so proposers and the committee can decrypt what they may see
//!
//! Status moves only `Pending → Approved` or `Pending → Rejected`. Plaintext never
//! enters ledger storage; all arithmetic goes through a [`ConfidentialEngine`].
//!
//! [`ConfidentialEngine`]: accord_engine::ConfidentialEngine

pub mod committee;
pub mod config;
pub mod error;
pub mod event;
pub mod initiative;
pub mod ledger;
pub mod service;
pub mod simulation;
pub mod totals;

pub use committee::Committee;
pub use config::LedgerConfig;
pub use error::GovernanceError;
pub use event::{EventBus, LedgerEvent};
pub use initiative::{
    Initiative, InitiativeBudgets, InitiativePriority, InitiativeStatus, InitiativeSubmission,
    InitiativeView,
};
pub use ledger::GovernanceLedger;
pub use service::{LedgerHandle, LedgerService};
pub use simulation::{AllocationSnapshot, SimulationTable};
pub use totals::GlobalTotals;
