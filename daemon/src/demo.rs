//! Reference governance scenario.
//!
//! Runs the ledger on its own task against the null engine, then decrypts the
//! interesting handles through the reference oracle as the accounts that were
//! granted them.

use crate::config::AccordConfig;
use accord_acl::MemoryAcl;
use accord_governance::{GovernanceLedger, InitiativeSubmission, LedgerHandle, LedgerService};
use accord_nullables::{NullEngine, NullSigner};
use accord_session::{AclOracle, DecryptionOracle, SessionClient, WalletSigner};
use accord_types::{Address, CiphertextHandle, ClearValue, HandleRequest, InitiativeId};
use anyhow::Context;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Decrypted outcome of one scenario run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DemoReport {
    pub initiatives: u64,
    pub total_requested: u64,
    pub total_allocated: u64,
    pub total_priority: u64,
    pub snapshot_requested: u64,
    pub snapshot_allocated: u64,
    pub snapshot_remaining: u64,
    pub combined_priority: u64,
    pub proposer_allocation: u64,
    pub reviewed_detail: u64,
}

struct Actors {
    deployer: Arc<NullSigner>,
    proposer: Arc<NullSigner>,
    committee: Arc<NullSigner>,
}

fn contract() -> Address {
    Address::new([0xAC; 20])
}

pub async fn run(config: &AccordConfig) -> anyhow::Result<DemoReport> {
    let engine = Arc::new(NullEngine::new());
    let acl = MemoryAcl::shared();
    let actors = Actors {
        deployer: Arc::new(NullSigner::from_seed([1; 32])),
        proposer: Arc::new(NullSigner::from_seed([2; 32])),
        committee: Arc::new(NullSigner::from_seed([3; 32])),
    };

    let ledger = GovernanceLedger::new(
        actors.deployer.account(),
        contract(),
        Arc::clone(&engine),
        Arc::clone(&acl),
        config.ledger.clone(),
    )
    .context("failed to create ledger")?;
    let (ledger, task) = LedgerService::spawn(ledger, config.ledger.command_queue);

    let ids = populate(&ledger, &engine, &actors).await?;
    let totals = ledger.get_global_totals().await?;
    let committee = actors.committee.account();
    let snapshot = ledger
        .get_allocation_snapshot(committee)
        .await?
        .context("committee has no allocation snapshot")?;
    let combined = ledger
        .get_approval_simulation(committee)
        .await?
        .context("committee has no approval simulation")?;
    let budgets = ledger.get_initiative_budgets(ids[0]).await?;
    let detail = ledger.get_detail_handle(ids[0]).await?;
    let initiatives = ledger.initiative_count().await?;
    drop(ledger);
    task.await.context("ledger task panicked")?;

    let oracle = Arc::new(AclOracle::new(
        Arc::clone(&engine),
        Arc::clone(&acl),
        accord_types::SystemClock,
    ));

    let admin_view = decrypt(&actors.deployer, &oracle, config, &totals.handles()).await?;
    let committee_view = decrypt(
        &actors.committee,
        &oracle,
        config,
        &[
            snapshot.requested,
            snapshot.allocated,
            snapshot.remaining,
            combined,
            detail,
        ],
    )
    .await?;
    let proposer_view = decrypt(&actors.proposer, &oracle, config, &[budgets.allocated]).await?;

    let report = DemoReport {
        initiatives,
        total_requested: admin_view[0],
        total_allocated: admin_view[1],
        total_priority: admin_view[2],
        snapshot_requested: committee_view[0],
        snapshot_allocated: committee_view[1],
        snapshot_remaining: committee_view[2],
        combined_priority: committee_view[3],
        reviewed_detail: committee_view[4],
        proposer_allocation: proposer_view[0],
    };
    info!(initiatives, "scenario complete");
    Ok(report)
}

/// Three initiatives, one vote, two simulations, one approval and one detail
/// grant, all submitted through the service handle.
async fn populate(
    ledger: &LedgerHandle,
    engine: &NullEngine,
    actors: &Actors,
) -> anyhow::Result<Vec<InitiativeId>> {
    let deployer = actors.deployer.account();
    let proposer = actors.proposer.account();
    let committee = actors.committee.account();

    ledger
        .set_committee_member(deployer, committee, true)
        .await?;

    let mut ids = Vec::new();
    for (budget, priority, detail) in [(250, 80, 12345), (300, 60, 777), (120, 40, 4242)] {
        let submission = InitiativeSubmission {
            summary: format!("initiative requesting {budget}").into_bytes(),
            resources: b"resources-bundle".to_vec(),
            requested_budget: engine.encrypt_input(ClearValue::U64(budget), &proposer, &contract()),
            base_priority: engine.encrypt_input(ClearValue::U32(priority), &proposer, &contract()),
            detail: engine.encrypt_input(ClearValue::U32(detail), &proposer, &contract()),
        };
        ids.push(ledger.submit_initiative(proposer, submission).await?);
    }

    let weight = engine.encrypt_input(ClearValue::U32(25), &committee, &contract());
    ledger.cast_vote(committee, ids[1], weight).await?;

    let allocation = engine.encrypt_input(ClearValue::U64(200), &committee, &contract());
    ledger
        .approve_initiative(committee, ids[0], allocation)
        .await?;
    ledger.reject_initiative(committee, ids[2]).await?;

    let pool = engine.encrypt_input(ClearValue::U64(500), &committee, &contract());
    ledger
        .simulate_allocation(committee, ids.clone(), pool)
        .await?;
    ledger
        .simulate_approval(committee, vec![ids[1], ids[2]])
        .await?;

    ledger.request_decryption(proposer, ids[0]).await?;
    ledger
        .authorize_detail_handle(committee, ids[0], committee)
        .await?;
    Ok(ids)
}

/// Decrypt `handles` as `signer` and return the values in request order.
async fn decrypt<O: DecryptionOracle + Clone>(
    signer: &Arc<NullSigner>,
    oracle: &O,
    config: &AccordConfig,
    handles: &[CiphertextHandle],
) -> anyhow::Result<Vec<u64>> {
    let client = SessionClient::new(
        Arc::clone(signer),
        Some(oracle.clone()),
        config.session.clone(),
    );
    let requests: Vec<_> = handles
        .iter()
        .map(|h| HandleRequest::new(*h, contract()))
        .collect();
    let clear = client
        .user_decrypt(&requests)
        .await
        .with_context(|| format!("decryption failed for {}", signer.account()))?;
    handles
        .iter()
        .map(|h| {
            clear
                .get(h)
                .map(ClearValue::as_u64)
                .with_context(|| format!("no cleartext for {h}"))
        })
        .collect()
}
