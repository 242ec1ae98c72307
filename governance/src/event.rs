//! Auditable events emitted by ledger mutations.

use accord_types::{Address, InitiativeId};
use serde::{Deserialize, Serialize};

/// One event per successful mutation, naming the affected id and actor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    InitiativeSubmitted {
        id: InitiativeId,
        proposer: Address,
    },
    VoteCast {
        id: InitiativeId,
        voter: Address,
    },
    InitiativeApproved {
        id: InitiativeId,
        approver: Address,
    },
    InitiativeRejected {
        id: InitiativeId,
        rejecter: Address,
    },
    /// Advisory only: grants nothing.
    DecryptionRequested {
        id: InitiativeId,
        requester: Address,
    },
    DetailHandleAuthorized {
        id: InitiativeId,
        account: Address,
        granted_by: Address,
    },
    CommitteeUpdated {
        account: Address,
        enabled: bool,
    },
    AllocationSimulated {
        account: Address,
        initiatives: Vec<InitiativeId>,
    },
    ApprovalSimulated {
        account: Address,
        initiatives: Vec<InitiativeId>,
    },
}

impl LedgerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InitiativeSubmitted { .. } => "InitiativeSubmitted",
            Self::VoteCast { .. } => "VoteCast",
            Self::InitiativeApproved { .. } => "InitiativeApproved",
            Self::InitiativeRejected { .. } => "InitiativeRejected",
            Self::DecryptionRequested { .. } => "DecryptionRequested",
            Self::DetailHandleAuthorized { .. } => "DetailHandleAuthorized",
            Self::CommitteeUpdated { .. } => "CommitteeUpdated",
            Self::AllocationSimulated { .. } => "AllocationSimulated",
            Self::ApprovalSimulated { .. } => "ApprovalSimulated",
        }
    }

    /// Canonical bincode encoding for persisting the audit log.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

/// Synchronous fan-out bus for ledger events.
///
/// Listeners run inline inside the ledger's mutation path; keep them fast.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&LedgerEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &LedgerEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn account() -> Address {
        Address::new([3; 20])
    }

    #[test]
    fn emit_calls_all_listeners() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();

        let c1 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        }));
        let c2 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c2.fetch_add(10, Ordering::SeqCst);
        }));

        bus.emit(&LedgerEvent::VoteCast {
            id: InitiativeId::FIRST,
            voter: account(),
        });
        assert_eq!(counter.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn emit_with_no_listeners_is_noop() {
        let bus = EventBus::new();
        assert_eq!(bus.listener_count(), 0);
        bus.emit(&LedgerEvent::CommitteeUpdated {
            account: account(),
            enabled: true,
        });
    }

    #[test]
    fn event_bytes_roundtrip() {
        let event = LedgerEvent::AllocationSimulated {
            account: account(),
            initiatives: vec![InitiativeId::new(0), InitiativeId::new(1)],
        };
        let bytes = event.to_bytes().unwrap();
        assert_eq!(LedgerEvent::from_bytes(&bytes).unwrap(), event);
        assert_eq!(event.name(), "AllocationSimulated");
    }
}
