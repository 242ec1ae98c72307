//! Ledger-wide encrypted aggregates.

use accord_types::CiphertextHandle;
use serde::{Deserialize, Serialize};

/// Running totals across all initiatives.
///
/// `requested` and `allocated` are 64-bit; `priority` is 32-bit and sums base
/// priorities at submission (votes are not included).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalTotals {
    pub requested: CiphertextHandle,
    pub allocated: CiphertextHandle,
    pub priority: CiphertextHandle,
}

impl GlobalTotals {
    pub fn handles(&self) -> [CiphertextHandle; 3] {
        [self.requested, self.allocated, self.priority]
    }
}
