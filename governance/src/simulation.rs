//! Per-account simulation scratch space.
//!
//! Simulation results are projections, not governance state. They live in their
//! own table keyed by the account that ran them and are overwritten on every run.

use accord_types::{Address, CiphertextHandle};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result of the most recent allocation simulation run by one account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationSnapshot {
    pub requested: CiphertextHandle,
    pub allocated: CiphertextHandle,
    /// `pool - allocated`, floored at zero.
    pub remaining: CiphertextHandle,
}

impl AllocationSnapshot {
    pub fn handles(&self) -> [CiphertextHandle; 3] {
        [self.requested, self.allocated, self.remaining]
    }
}

#[derive(Debug, Default)]
pub struct SimulationTable {
    allocations: HashMap<Address, AllocationSnapshot>,
    approvals: HashMap<Address, CiphertextHandle>,
}

impl SimulationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_allocation(&mut self, account: Address, snapshot: AllocationSnapshot) {
        self.allocations.insert(account, snapshot);
    }

    pub fn record_approval(&mut self, account: Address, combined_priority: CiphertextHandle) {
        self.approvals.insert(account, combined_priority);
    }

    pub fn allocation(&self, account: &Address) -> Option<AllocationSnapshot> {
        self.allocations.get(account).copied()
    }

    pub fn approval(&self, account: &Address) -> Option<CiphertextHandle> {
        self.approvals.get(account).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accord_types::BitWidth;

    fn handle(n: u8) -> CiphertextHandle {
        CiphertextHandle::derive([n; 32], BitWidth::U64)
    }

    #[test]
    fn allocation_is_last_write_wins_per_account() {
        let mut table = SimulationTable::new();
        let alice = Address::new([1; 20]);
        let bob = Address::new([2; 20]);
        let first = AllocationSnapshot {
            requested: handle(1),
            allocated: handle(2),
            remaining: handle(3),
        };
        let second = AllocationSnapshot {
            requested: handle(4),
            ..first
        };
        table.record_allocation(alice, first);
        table.record_allocation(bob, first);
        table.record_allocation(alice, second);
        assert_eq!(table.allocation(&alice), Some(second));
        assert_eq!(table.allocation(&bob), Some(first));
        assert_eq!(table.approval(&alice), None);
    }
}
