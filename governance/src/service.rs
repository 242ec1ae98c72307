//! Single-writer ledger service.
//!
//! One tokio task owns the [`GovernanceLedger`] and drains a bounded command
//! queue, applying each command to completion before taking the next. Reads use
//! the same queue, so they observe the state as of the last committed mutation.
//! The task exits once every [`LedgerHandle`] has been dropped.

use crate::error::GovernanceError;
use crate::event::LedgerEvent;
use crate::initiative::{
    InitiativeBudgets, InitiativePriority, InitiativeSubmission, InitiativeView,
};
use crate::ledger::GovernanceLedger;
use crate::simulation::AllocationSnapshot;
use crate::totals::GlobalTotals;
use accord_acl::AclStore;
use accord_engine::{ConfidentialEngine, EncryptedInput};
use accord_types::{Address, CiphertextHandle, InitiativeId};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

type Reply<T> = oneshot::Sender<Result<T, GovernanceError>>;

enum Command {
    Submit {
        caller: Address,
        submission: Box<InitiativeSubmission>,
        reply: Reply<InitiativeId>,
    },
    CastVote {
        caller: Address,
        id: InitiativeId,
        weight: EncryptedInput,
        reply: Reply<()>,
    },
    Approve {
        caller: Address,
        id: InitiativeId,
        allocation: EncryptedInput,
        reply: Reply<()>,
    },
    Reject {
        caller: Address,
        id: InitiativeId,
        reply: Reply<()>,
    },
    SimulateAllocation {
        caller: Address,
        ids: Vec<InitiativeId>,
        pool: EncryptedInput,
        reply: Reply<AllocationSnapshot>,
    },
    SimulateApproval {
        caller: Address,
        ids: Vec<InitiativeId>,
        reply: Reply<CiphertextHandle>,
    },
    RequestDecryption {
        caller: Address,
        id: InitiativeId,
        reply: Reply<()>,
    },
    AuthorizeDetail {
        caller: Address,
        id: InitiativeId,
        account: Address,
        reply: Reply<()>,
    },
    SetCommittee {
        caller: Address,
        account: Address,
        enabled: bool,
        reply: Reply<()>,
    },
    Initiative {
        id: InitiativeId,
        reply: Reply<InitiativeView>,
    },
    Budgets {
        id: InitiativeId,
        reply: Reply<InitiativeBudgets>,
    },
    Priority {
        id: InitiativeId,
        reply: Reply<InitiativePriority>,
    },
    Detail {
        id: InitiativeId,
        reply: Reply<CiphertextHandle>,
    },
    Totals {
        reply: Reply<GlobalTotals>,
    },
    AllocationSnapshot {
        account: Address,
        reply: Reply<Option<AllocationSnapshot>>,
    },
    ApprovalSimulation {
        account: Address,
        reply: Reply<Option<CiphertextHandle>>,
    },
    Count {
        reply: Reply<u64>,
    },
    Events {
        reply: Reply<Vec<LedgerEvent>>,
    },
}

pub struct LedgerService;

impl LedgerService {
    /// Move `ledger` onto its own task. Returns the handle for issuing commands
    /// and the task's join handle.
    pub fn spawn<E, A>(
        ledger: GovernanceLedger<E, A>,
        queue: usize,
    ) -> (LedgerHandle, JoinHandle<()>)
    where
        E: ConfidentialEngine + 'static,
        A: AclStore + 'static,
    {
        let (tx, rx) = mpsc::channel(queue.max(1));
        let task = tokio::spawn(run(ledger, rx));
        (LedgerHandle { tx }, task)
    }
}

async fn run<E, A>(mut ledger: GovernanceLedger<E, A>, mut rx: mpsc::Receiver<Command>)
where
    E: ConfidentialEngine,
    A: AclStore,
{
    info!(contract = %ledger.contract(), "ledger service started");
    while let Some(command) = rx.recv().await {
        apply(&mut ledger, command);
    }
    info!(
        initiatives = ledger.initiative_count(),
        "ledger service stopped"
    );
}

// A dropped reply receiver means the caller gave up; the command still applied.
fn apply<E: ConfidentialEngine, A: AclStore>(
    ledger: &mut GovernanceLedger<E, A>,
    command: Command,
) {
    match command {
        Command::Submit {
            caller,
            submission,
            reply,
        } => {
            let _ = reply.send(ledger.submit_initiative(&caller, *submission));
        }
        Command::CastVote {
            caller,
            id,
            weight,
            reply,
        } => {
            let _ = reply.send(ledger.cast_vote(&caller, id, &weight));
        }
        Command::Approve {
            caller,
            id,
            allocation,
            reply,
        } => {
            let _ = reply.send(ledger.approve_initiative(&caller, id, &allocation));
        }
        Command::Reject { caller, id, reply } => {
            let _ = reply.send(ledger.reject_initiative(&caller, id));
        }
        Command::SimulateAllocation {
            caller,
            ids,
            pool,
            reply,
        } => {
            let _ = reply.send(ledger.simulate_allocation(&caller, &ids, &pool));
        }
        Command::SimulateApproval { caller, ids, reply } => {
            let _ = reply.send(ledger.simulate_approval(&caller, &ids));
        }
        Command::RequestDecryption { caller, id, reply } => {
            let _ = reply.send(ledger.request_decryption(&caller, id));
        }
        Command::AuthorizeDetail {
            caller,
            id,
            account,
            reply,
        } => {
            let _ = reply.send(ledger.authorize_detail_handle(&caller, id, &account));
        }
        Command::SetCommittee {
            caller,
            account,
            enabled,
            reply,
        } => {
            let _ = reply.send(ledger.set_committee_member(&caller, &account, enabled));
        }
        Command::Initiative { id, reply } => {
            let _ = reply.send(ledger.get_initiative(id));
        }
        Command::Budgets { id, reply } => {
            let _ = reply.send(ledger.get_initiative_budgets(id));
        }
        Command::Priority { id, reply } => {
            let _ = reply.send(ledger.get_initiative_priority(id));
        }
        Command::Detail { id, reply } => {
            let _ = reply.send(ledger.get_detail_handle(id));
        }
        Command::Totals { reply } => {
            let _ = reply.send(Ok(ledger.get_global_totals()));
        }
        Command::AllocationSnapshot { account, reply } => {
            let _ = reply.send(Ok(ledger.get_allocation_snapshot(&account)));
        }
        Command::ApprovalSimulation { account, reply } => {
            let _ = reply.send(Ok(ledger.get_approval_simulation(&account)));
        }
        Command::Count { reply } => {
            let _ = reply.send(Ok(ledger.initiative_count()));
        }
        Command::Events { reply } => {
            let _ = reply.send(Ok(ledger.events().to_vec()));
        }
    }
}

/// Cloneable handle to a running [`LedgerService`].
#[derive(Clone)]
pub struct LedgerHandle {
    tx: mpsc::Sender<Command>,
}

impl LedgerHandle {
    async fn call<T>(
        &self,
        build: impl FnOnce(Reply<T>) -> Command,
    ) -> Result<T, GovernanceError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| GovernanceError::ServiceClosed)?;
        rx.await.map_err(|_| GovernanceError::ServiceClosed)?
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub async fn submit_initiative(
        &self,
        caller: Address,
        submission: InitiativeSubmission,
    ) -> Result<InitiativeId, GovernanceError> {
        debug!(%caller, "queueing submission");
        self.call(|reply| Command::Submit {
            caller,
            submission: Box::new(submission),
            reply,
        })
        .await
    }

    pub async fn cast_vote(
        &self,
        caller: Address,
        id: InitiativeId,
        weight: EncryptedInput,
    ) -> Result<(), GovernanceError> {
        self.call(|reply| Command::CastVote {
            caller,
            id,
            weight,
            reply,
        })
        .await
    }

    pub async fn approve_initiative(
        &self,
        caller: Address,
        id: InitiativeId,
        allocation: EncryptedInput,
    ) -> Result<(), GovernanceError> {
        self.call(|reply| Command::Approve {
            caller,
            id,
            allocation,
            reply,
        })
        .await
    }

    pub async fn reject_initiative(
        &self,
        caller: Address,
        id: InitiativeId,
    ) -> Result<(), GovernanceError> {
        self.call(|reply| Command::Reject { caller, id, reply }).await
    }

    pub async fn simulate_allocation(
        &self,
        caller: Address,
        ids: Vec<InitiativeId>,
        pool: EncryptedInput,
    ) -> Result<AllocationSnapshot, GovernanceError> {
        self.call(|reply| Command::SimulateAllocation {
            caller,
            ids,
            pool,
            reply,
        })
        .await
    }

    pub async fn simulate_approval(
        &self,
        caller: Address,
        ids: Vec<InitiativeId>,
    ) -> Result<CiphertextHandle, GovernanceError> {
        self.call(|reply| Command::SimulateApproval { caller, ids, reply })
            .await
    }

    pub async fn request_decryption(
        &self,
        caller: Address,
        id: InitiativeId,
    ) -> Result<(), GovernanceError> {
        self.call(|reply| Command::RequestDecryption { caller, id, reply })
            .await
    }

    pub async fn authorize_detail_handle(
        &self,
        caller: Address,
        id: InitiativeId,
        account: Address,
    ) -> Result<(), GovernanceError> {
        self.call(|reply| Command::AuthorizeDetail {
            caller,
            id,
            account,
            reply,
        })
        .await
    }

    pub async fn set_committee_member(
        &self,
        caller: Address,
        account: Address,
        enabled: bool,
    ) -> Result<(), GovernanceError> {
        self.call(|reply| Command::SetCommittee {
            caller,
            account,
            enabled,
            reply,
        })
        .await
    }

    pub async fn get_initiative(
        &self,
        id: InitiativeId,
    ) -> Result<InitiativeView, GovernanceError> {
        self.call(|reply| Command::Initiative { id, reply }).await
    }

    pub async fn get_initiative_budgets(
        &self,
        id: InitiativeId,
    ) -> Result<InitiativeBudgets, GovernanceError> {
        self.call(|reply| Command::Budgets { id, reply }).await
    }

    pub async fn get_initiative_priority(
        &self,
        id: InitiativeId,
    ) -> Result<InitiativePriority, GovernanceError> {
        self.call(|reply| Command::Priority { id, reply }).await
    }

    pub async fn get_detail_handle(
        &self,
        id: InitiativeId,
    ) -> Result<CiphertextHandle, GovernanceError> {
        self.call(|reply| Command::Detail { id, reply }).await
    }

    pub async fn get_global_totals(&self) -> Result<GlobalTotals, GovernanceError> {
        self.call(|reply| Command::Totals { reply }).await
    }

    pub async fn get_allocation_snapshot(
        &self,
        account: Address,
    ) -> Result<Option<AllocationSnapshot>, GovernanceError> {
        self.call(|reply| Command::AllocationSnapshot { account, reply })
            .await
    }

    pub async fn get_approval_simulation(
        &self,
        account: Address,
    ) -> Result<Option<CiphertextHandle>, GovernanceError> {
        self.call(|reply| Command::ApprovalSimulation { account, reply })
            .await
    }

    pub async fn initiative_count(&self) -> Result<u64, GovernanceError> {
        self.call(|reply| Command::Count { reply }).await
    }

    pub async fn events(&self) -> Result<Vec<LedgerEvent>, GovernanceError> {
        self.call(|reply| Command::Events { reply }).await
    }
}
