//! End-to-end ledger flows through the single-writer service.

use accord_acl::{AclStore, MemoryAcl, SharedAcl};
use accord_engine::{EncryptedInput, PlaintextSource};
use accord_governance::{
    GovernanceError, GovernanceLedger, InitiativeStatus, InitiativeSubmission, LedgerConfig,
    LedgerEvent, LedgerHandle, LedgerService,
};
use accord_nullables::NullEngine;
use accord_types::{Address, CiphertextHandle, ClearValue, InitiativeId};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Harness {
    handle: LedgerHandle,
    engine: Arc<NullEngine>,
    acl: SharedAcl,
}

fn deployer() -> Address {
    Address::new([0xD0; 20])
}

fn proposer() -> Address {
    Address::new([0x11; 20])
}

fn committee() -> Address {
    Address::new([0x22; 20])
}

fn reviewer() -> Address {
    Address::new([0x33; 20])
}

fn contract() -> Address {
    Address::new([0xCC; 20])
}

async fn start() -> Harness {
    let engine = Arc::new(NullEngine::new());
    let acl = MemoryAcl::shared();
    let ledger = GovernanceLedger::new(
        deployer(),
        contract(),
        Arc::clone(&engine),
        Arc::clone(&acl),
        LedgerConfig::default(),
    )
    .unwrap();
    let (handle, _task) = LedgerService::spawn(ledger, 16);
    handle
        .set_committee_member(deployer(), committee(), true)
        .await
        .unwrap();
    Harness {
        handle,
        engine,
        acl,
    }
}

impl Harness {
    fn enc64(&self, value: u64, owner: Address) -> EncryptedInput {
        self.engine
            .encrypt_input(ClearValue::U64(value), &owner, &contract())
    }

    fn enc32(&self, value: u32, owner: Address) -> EncryptedInput {
        self.engine
            .encrypt_input(ClearValue::U32(value), &owner, &contract())
    }

    fn submission(
        &self,
        owner: Address,
        budget: u64,
        priority: u32,
        detail: u32,
    ) -> InitiativeSubmission {
        InitiativeSubmission {
            summary: b"encrypted-summary".to_vec(),
            resources: b"resources-bundle".to_vec(),
            requested_budget: self.enc64(budget, owner),
            base_priority: self.enc32(priority, owner),
            detail: self.enc32(detail, owner),
        }
    }

    /// Decrypt the way an oracle would: only after an ACL check.
    fn decrypt_as(&self, account: Address, handle: CiphertextHandle) -> Option<u64> {
        self.acl.require(&handle, &account).ok()?;
        Some(self.engine.decrypt(&handle).ok()?.as_u64())
    }
}

// ---------------------------------------------------------------------------
// Flows
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submission_updates_global_aggregates() {
    let h = start().await;
    let id = h
        .handle
        .submit_initiative(proposer(), h.submission(proposer(), 250, 80, 12345))
        .await
        .unwrap();
    assert_eq!(id, InitiativeId::new(0));
    assert_eq!(h.handle.initiative_count().await.unwrap(), 1);

    let totals = h.handle.get_global_totals().await.unwrap();
    assert_eq!(h.decrypt_as(deployer(), totals.requested), Some(250));
    assert_eq!(h.decrypt_as(deployer(), totals.allocated), Some(0));
    assert_eq!(h.decrypt_as(deployer(), totals.priority), Some(80));
    assert_eq!(h.decrypt_as(reviewer(), totals.requested), None);
    assert_eq!(h.decrypt_as(proposer(), totals.requested), None);

    let events = h.handle.events().await.unwrap();
    assert!(events.contains(&LedgerEvent::InitiativeSubmitted {
        id,
        proposer: proposer(),
    }));
}

#[tokio::test]
async fn committee_voting_and_simulations() {
    let h = start().await;
    let first = h
        .handle
        .submit_initiative(proposer(), h.submission(proposer(), 300, 60, 1))
        .await
        .unwrap();
    let second = h
        .handle
        .submit_initiative(reviewer(), h.submission(reviewer(), 120, 40, 2))
        .await
        .unwrap();

    h.handle
        .cast_vote(committee(), first, h.enc32(25, committee()))
        .await
        .unwrap();

    let snapshot = h
        .handle
        .simulate_allocation(committee(), vec![first, second], h.enc64(600, committee()))
        .await
        .unwrap();
    assert_eq!(h.decrypt_as(committee(), snapshot.requested), Some(420));
    assert_eq!(h.decrypt_as(committee(), snapshot.allocated), Some(0));
    assert_eq!(h.decrypt_as(committee(), snapshot.remaining), Some(180));
    assert_eq!(
        h.handle.get_allocation_snapshot(committee()).await.unwrap(),
        Some(snapshot)
    );

    let combined = h
        .handle
        .simulate_approval(committee(), vec![first, second])
        .await
        .unwrap();
    assert_eq!(h.decrypt_as(committee(), combined), Some(125));
    assert_eq!(h.decrypt_as(proposer(), combined), None);
}

#[tokio::test]
async fn approval_and_detail_authorization() {
    let h = start().await;
    let id = h
        .handle
        .submit_initiative(proposer(), h.submission(proposer(), 280, 55, 9999))
        .await
        .unwrap();

    h.handle
        .approve_initiative(committee(), id, h.enc64(200, committee()))
        .await
        .unwrap();
    let view = h.handle.get_initiative(id).await.unwrap();
    assert_eq!(view.status, InitiativeStatus::Approved);
    assert_eq!(view.status.code(), 1);

    let budgets = h.handle.get_initiative_budgets(id).await.unwrap();
    assert_eq!(h.decrypt_as(proposer(), budgets.allocated), Some(200));

    h.handle.request_decryption(proposer(), id).await.unwrap();
    let detail = h.handle.get_detail_handle(id).await.unwrap();
    assert_eq!(h.decrypt_as(committee(), detail), None);

    h.handle
        .authorize_detail_handle(committee(), id, committee())
        .await
        .unwrap();
    assert_eq!(h.decrypt_as(committee(), detail), Some(9999));

    let totals = h.handle.get_global_totals().await.unwrap();
    assert_eq!(h.decrypt_as(proposer(), totals.allocated), Some(200));

    assert_eq!(
        h.handle
            .approve_initiative(committee(), id, h.enc64(1, committee()))
            .await,
        Err(GovernanceError::AlreadyResolved(id))
    );
    let totals_after = h.handle.get_global_totals().await.unwrap();
    assert_eq!(h.decrypt_as(deployer(), totals_after.allocated), Some(200));
}

#[tokio::test]
async fn requested_total_is_sum_of_submissions() {
    let h = start().await;
    let budgets = [10u64, 20, 30, 40, 50];
    let priorities = [1u32, 2, 3, 4, 5];
    for (budget, priority) in budgets.iter().zip(priorities) {
        h.handle
            .submit_initiative(proposer(), h.submission(proposer(), *budget, priority, 0))
            .await
            .unwrap();
    }
    let totals = h.handle.get_global_totals().await.unwrap();
    assert_eq!(h.decrypt_as(committee(), totals.requested), Some(150));
    assert_eq!(h.decrypt_as(committee(), totals.priority), Some(15));
}

#[tokio::test]
async fn concurrent_submissions_get_distinct_ids() {
    let h = start().await;
    let mut tasks = Vec::new();
    for n in 0..8u64 {
        let handle = h.handle.clone();
        let submission = h.submission(proposer(), n, 1, 0);
        tasks.push(tokio::spawn(async move {
            handle.submit_initiative(proposer(), submission).await
        }));
    }
    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.unwrap().unwrap().as_u64());
    }
    ids.sort_unstable();
    assert_eq!(ids, (0..8).collect::<Vec<_>>());
    let totals = h.handle.get_global_totals().await.unwrap();
    assert_eq!(h.decrypt_as(deployer(), totals.requested), Some(28));
}

#[tokio::test]
async fn closed_service_reports_closed() {
    let engine = Arc::new(NullEngine::new());
    let ledger = GovernanceLedger::new(
        deployer(),
        contract(),
        engine,
        MemoryAcl::new(),
        LedgerConfig::default(),
    )
    .unwrap();
    let (handle, task) = LedgerService::spawn(ledger, 4);
    task.abort();
    let _ = task.await;
    assert_eq!(
        handle.initiative_count().await,
        Err(GovernanceError::ServiceClosed)
    );
}
