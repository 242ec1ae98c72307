//! The confidential governance ledger.
//!
//! Every mutation follows the same order: check the caller, the ids, the
//! initiative state, and every input proof; compute all new handles through the
//! engine; and only then commit state, grant access, and emit the event. An
//! error before the commit step leaves the ledger and the ACL untouched. Engine
//! operations never modify their operands, so abandoned intermediate handles
//! are harmless.

use crate::committee::Committee;
use crate::config::LedgerConfig;
use crate::error::GovernanceError;
use crate::event::{EventBus, LedgerEvent};
use crate::initiative::{
    Initiative, InitiativeBudgets, InitiativePriority, InitiativeStatus, InitiativeSubmission,
    InitiativeView,
};
use crate::simulation::{AllocationSnapshot, SimulationTable};
use crate::totals::GlobalTotals;
use accord_acl::AclStore;
use accord_engine::{aggregate, ConfidentialEngine, EncryptedInput, EngineError};
use accord_types::{Address, BitWidth, CiphertextHandle, ClearValue, InitiativeId};
use std::collections::HashSet;
use tracing::{debug, info, info_span};

pub struct GovernanceLedger<E, A> {
    engine: E,
    acl: A,
    config: LedgerConfig,
    admin: Address,
    /// Owning contract of every handle this ledger stores.
    contract: Address,
    initiatives: Vec<Initiative>,
    totals: GlobalTotals,
    committee: Committee,
    simulations: SimulationTable,
    events: Vec<LedgerEvent>,
    bus: EventBus,
}

impl<E: ConfidentialEngine, A: AclStore> GovernanceLedger<E, A> {
    /// Create a ledger with encrypted-zero totals visible to `admin`.
    ///
    /// The admin starts as a committee member.
    pub fn new(
        admin: Address,
        contract: Address,
        engine: E,
        acl: A,
        config: LedgerConfig,
    ) -> Result<Self, GovernanceError> {
        let totals = GlobalTotals {
            requested: engine.trivial_encrypt(ClearValue::zero(BitWidth::U64))?,
            allocated: engine.trivial_encrypt(ClearValue::zero(BitWidth::U64))?,
            priority: engine.trivial_encrypt(ClearValue::zero(BitWidth::U32))?,
        };
        for handle in totals.handles() {
            acl.grant(&handle, &admin);
        }
        let mut committee = Committee::new();
        committee.set(admin, true);

        info!(%admin, %contract, engine = engine.name(), "governance ledger initialised");
        Ok(Self {
            engine,
            acl,
            config,
            admin,
            contract,
            initiatives: Vec::new(),
            totals,
            committee,
            simulations: SimulationTable::new(),
            events: Vec::new(),
            bus: EventBus::new(),
        })
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Open a new Pending initiative and fold its budget and priority into the totals.
    pub fn submit_initiative(
        &mut self,
        caller: &Address,
        submission: InitiativeSubmission,
    ) -> Result<InitiativeId, GovernanceError> {
        let id = InitiativeId::new(self.initiatives.len() as u64);
        let _span = info_span!("submit_initiative", %id, proposer = %caller).entered();

        self.check_blob("summary", &submission.summary)?;
        self.check_blob("resources", &submission.resources)?;
        let requested = self.verify(
            "requested_budget",
            &submission.requested_budget,
            caller,
            BitWidth::U64,
        )?;
        let base_priority =
            self.verify("base_priority", &submission.base_priority, caller, BitWidth::U32)?;
        let detail = self.verify("detail", &submission.detail, caller, BitWidth::U32)?;

        let allocated = self.engine.trivial_encrypt(ClearValue::zero(BitWidth::U64))?;
        let vote_tally = self.engine.trivial_encrypt(ClearValue::zero(BitWidth::U32))?;
        let totals = GlobalTotals {
            requested: aggregate::accumulate(&self.engine, &self.totals.requested, &requested)?,
            priority: aggregate::accumulate(&self.engine, &self.totals.priority, &base_priority)?,
            ..self.totals
        };

        self.initiatives.push(Initiative {
            id,
            proposer: *caller,
            status: InitiativeStatus::Pending,
            summary: submission.summary,
            resources: submission.resources,
            requested_budget: requested,
            allocated_budget: allocated,
            base_priority,
            vote_tally,
            detail,
        });
        for handle in [requested, allocated, base_priority, detail] {
            self.acl.grant(&handle, caller);
        }
        self.commit_totals(totals, None);

        info!("initiative submitted");
        self.emit(LedgerEvent::InitiativeSubmitted {
            id,
            proposer: *caller,
        });
        Ok(id)
    }

    /// Add an encrypted vote weight to a pending initiative's tally.
    pub fn cast_vote(
        &mut self,
        caller: &Address,
        id: InitiativeId,
        weight: &EncryptedInput,
    ) -> Result<(), GovernanceError> {
        let _span = info_span!("cast_vote", %id, voter = %caller).entered();

        self.require_committee(caller)?;
        let initiative = self.pending(id)?;
        let weight = self.verify("vote_weight", weight, caller, BitWidth::U32)?;
        let tally = aggregate::accumulate(&self.engine, &initiative.vote_tally, &weight)?;

        self.initiative_mut(id)?.vote_tally = tally;
        self.acl.grant(&tally, caller);
        self.grant_committee(&tally);

        info!("vote cast");
        self.emit(LedgerEvent::VoteCast { id, voter: *caller });
        Ok(())
    }

    /// Approve a pending initiative with an encrypted allocation.
    pub fn approve_initiative(
        &mut self,
        caller: &Address,
        id: InitiativeId,
        allocation: &EncryptedInput,
    ) -> Result<(), GovernanceError> {
        let _span = info_span!("approve_initiative", %id, approver = %caller).entered();

        self.require_committee(caller)?;
        let proposer = self.pending(id)?.proposer;
        let allocation = self.verify("allocation", allocation, caller, BitWidth::U64)?;
        let totals = GlobalTotals {
            allocated: aggregate::accumulate(&self.engine, &self.totals.allocated, &allocation)?,
            ..self.totals
        };

        let initiative = self.initiative_mut(id)?;
        initiative.allocated_budget = allocation;
        initiative.status = InitiativeStatus::Approved;
        self.acl.grant(&allocation, &proposer);
        self.commit_totals(totals, Some(proposer));

        info!(%proposer, "initiative approved");
        self.emit(LedgerEvent::InitiativeApproved {
            id,
            approver: *caller,
        });
        Ok(())
    }

    /// Reject a pending initiative. Totals and grants are unchanged.
    pub fn reject_initiative(
        &mut self,
        caller: &Address,
        id: InitiativeId,
    ) -> Result<(), GovernanceError> {
        let _span = info_span!("reject_initiative", %id, rejecter = %caller).entered();

        self.require_committee(caller)?;
        self.pending(id)?;
        self.initiative_mut(id)?.status = InitiativeStatus::Rejected;

        info!("initiative rejected");
        self.emit(LedgerEvent::InitiativeRejected {
            id,
            rejecter: *caller,
        });
        Ok(())
    }

    /// Project requested, allocated, and remaining budget over a set of
    /// initiatives against an encrypted pool. The result replaces the caller's
    /// previous allocation snapshot and is visible only to the caller.
    pub fn simulate_allocation(
        &mut self,
        caller: &Address,
        ids: &[InitiativeId],
        pool: &EncryptedInput,
    ) -> Result<AllocationSnapshot, GovernanceError> {
        let _span =
            info_span!("simulate_allocation", account = %caller, count = ids.len()).entered();

        self.require_committee(caller)?;
        let selected = self.select(ids)?;
        let pool = self.verify("pool", pool, caller, BitWidth::U64)?;

        let requested: Vec<_> = selected.iter().map(|i| i.requested_budget).collect();
        let allocated: Vec<_> = selected.iter().map(|i| i.allocated_budget).collect();
        let requested = aggregate::sum(&self.engine, &requested, BitWidth::U64)?;
        let allocated = aggregate::sum(&self.engine, &allocated, BitWidth::U64)?;
        let remaining = aggregate::saturating_sub(&self.engine, &pool, &allocated)?;
        let snapshot = AllocationSnapshot {
            requested,
            allocated,
            remaining,
        };

        self.simulations.record_allocation(*caller, snapshot);
        for handle in snapshot.handles() {
            self.acl.grant(&handle, caller);
        }

        debug!("allocation simulated");
        self.emit(LedgerEvent::AllocationSimulated {
            account: *caller,
            initiatives: ids.to_vec(),
        });
        Ok(snapshot)
    }

    /// Sum base priority plus vote tally over a set of initiatives. The result
    /// replaces the caller's previous approval simulation.
    pub fn simulate_approval(
        &mut self,
        caller: &Address,
        ids: &[InitiativeId],
    ) -> Result<CiphertextHandle, GovernanceError> {
        let _span =
            info_span!("simulate_approval", account = %caller, count = ids.len()).entered();

        self.require_committee(caller)?;
        let selected = self.select(ids)?;
        let contributions: Vec<_> = selected
            .iter()
            .flat_map(|i| [i.base_priority, i.vote_tally])
            .collect();
        let combined = aggregate::sum(&self.engine, &contributions, BitWidth::U32)?;

        self.simulations.record_approval(*caller, combined);
        self.acl.grant(&combined, caller);

        debug!("approval simulated");
        self.emit(LedgerEvent::ApprovalSimulated {
            account: *caller,
            initiatives: ids.to_vec(),
        });
        Ok(combined)
    }

    /// Record that `caller` intends to decrypt something about `id`. Grants nothing.
    pub fn request_decryption(
        &mut self,
        caller: &Address,
        id: InitiativeId,
    ) -> Result<(), GovernanceError> {
        self.initiative(id)?;
        info!(%id, requester = %caller, "decryption requested");
        self.emit(LedgerEvent::DecryptionRequested {
            id,
            requester: *caller,
        });
        Ok(())
    }

    /// Let `account` decrypt the detail handle of `id`.
    pub fn authorize_detail_handle(
        &mut self,
        caller: &Address,
        id: InitiativeId,
        account: &Address,
    ) -> Result<(), GovernanceError> {
        self.require_committee(caller)?;
        let detail = self.initiative(id)?.detail;
        let fresh = self.acl.grant(&detail, account);

        info!(%id, %account, granted_by = %caller, fresh, "detail handle authorized");
        self.emit(LedgerEvent::DetailHandleAuthorized {
            id,
            account: *account,
            granted_by: *caller,
        });
        Ok(())
    }

    /// Enable or disable committee membership. New members can read the current totals.
    pub fn set_committee_member(
        &mut self,
        caller: &Address,
        account: &Address,
        enabled: bool,
    ) -> Result<(), GovernanceError> {
        if *caller != self.admin {
            return Err(GovernanceError::NotAdmin(*caller));
        }
        let changed = self.committee.set(*account, enabled);
        if enabled {
            for handle in self.totals.handles() {
                self.acl.grant(&handle, account);
            }
        }

        info!(
            %account,
            enabled,
            changed,
            members = self.committee.len(),
            "committee updated"
        );
        self.emit(LedgerEvent::CommitteeUpdated {
            account: *account,
            enabled,
        });
        Ok(())
    }

    /// Register a listener for every event emitted from now on.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.bus.subscribe(listener);
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn get_initiative(&self, id: InitiativeId) -> Result<InitiativeView, GovernanceError> {
        Ok(self.initiative(id)?.view())
    }

    pub fn get_initiative_budgets(
        &self,
        id: InitiativeId,
    ) -> Result<InitiativeBudgets, GovernanceError> {
        Ok(self.initiative(id)?.budgets())
    }

    pub fn get_initiative_priority(
        &self,
        id: InitiativeId,
    ) -> Result<InitiativePriority, GovernanceError> {
        Ok(self.initiative(id)?.priority())
    }

    pub fn get_detail_handle(&self, id: InitiativeId) -> Result<CiphertextHandle, GovernanceError> {
        Ok(self.initiative(id)?.detail)
    }

    pub fn get_global_totals(&self) -> GlobalTotals {
        self.totals
    }

    pub fn get_allocation_snapshot(&self, account: &Address) -> Option<AllocationSnapshot> {
        self.simulations.allocation(account)
    }

    pub fn get_approval_simulation(&self, account: &Address) -> Option<CiphertextHandle> {
        self.simulations.approval(account)
    }

    pub fn initiative_count(&self) -> u64 {
        self.initiatives.len() as u64
    }

    pub fn admin(&self) -> Address {
        self.admin
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    pub fn is_committee_member(&self, account: &Address) -> bool {
        self.committee.contains(account)
    }

    pub fn committee_members(&self) -> Vec<Address> {
        self.committee.members().copied().collect()
    }

    /// Audit log of every event emitted so far, oldest first.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // ---------------------------------------------------------------------
    // Helpers
    // ---------------------------------------------------------------------

    fn initiative(&self, id: InitiativeId) -> Result<&Initiative, GovernanceError> {
        id.index()
            .and_then(|i| self.initiatives.get(i))
            .ok_or(GovernanceError::UnknownInitiative(id))
    }

    fn initiative_mut(&mut self, id: InitiativeId) -> Result<&mut Initiative, GovernanceError> {
        id.index()
            .and_then(|i| self.initiatives.get_mut(i))
            .ok_or(GovernanceError::UnknownInitiative(id))
    }

    fn pending(&self, id: InitiativeId) -> Result<&Initiative, GovernanceError> {
        let initiative = self.initiative(id)?;
        if !initiative.status.is_pending() {
            return Err(GovernanceError::AlreadyResolved(id));
        }
        Ok(initiative)
    }

    /// Resolve a simulation selection. Unknown and repeated ids are both rejected.
    fn select(&self, ids: &[InitiativeId]) -> Result<Vec<&Initiative>, GovernanceError> {
        if ids.len() > self.config.max_simulation_batch {
            return Err(GovernanceError::SelectionTooLarge {
                len: ids.len(),
                max: self.config.max_simulation_batch,
            });
        }
        let mut seen = HashSet::with_capacity(ids.len());
        ids.iter()
            .map(|id| {
                if !seen.insert(*id) {
                    return Err(GovernanceError::UnknownInitiative(*id));
                }
                self.initiative(*id)
            })
            .collect()
    }

    fn require_committee(&self, caller: &Address) -> Result<(), GovernanceError> {
        if self.committee.contains(caller) {
            Ok(())
        } else {
            Err(GovernanceError::NotCommittee(*caller))
        }
    }

    fn check_blob(&self, field: &'static str, blob: &[u8]) -> Result<(), GovernanceError> {
        if blob.len() > self.config.max_blob_bytes {
            return Err(GovernanceError::BlobTooLarge {
                field,
                len: blob.len(),
                max: self.config.max_blob_bytes,
            });
        }
        Ok(())
    }

    fn verify(
        &self,
        field: &'static str,
        input: &EncryptedInput,
        caller: &Address,
        expected: BitWidth,
    ) -> Result<CiphertextHandle, GovernanceError> {
        self.engine
            .verify_input(input, caller, &self.contract, expected)
            .map_err(|e| match e {
                EngineError::InvalidProof(_) => GovernanceError::InvalidProof { field },
                EngineError::WrongWidth {
                    expected, actual, ..
                } => GovernanceError::WrongWidth {
                    field,
                    expected,
                    actual,
                },
                other => GovernanceError::Engine(other),
            })
    }

    /// Replace the totals and let the admin, the committee, and optionally one
    /// more account read them.
    /// A plain submitter never receives the totals.
    fn commit_totals(&mut self, totals: GlobalTotals, extra: Option<Address>) {
        self.totals = totals;
        for handle in totals.handles() {
            self.acl.grant(&handle, &self.admin);
            if let Some(account) = &extra {
                self.acl.grant(&handle, account);
            }
            self.grant_committee(&handle);
        }
    }

    fn grant_committee(&self, handle: &CiphertextHandle) {
        for member in self.committee.members() {
            self.acl.grant(handle, member);
        }
    }

    fn emit(&mut self, event: LedgerEvent) {
        self.bus.emit(&event);
        self.events.push(event);
    }
}
