//! In-memory grant relation.

use crate::AclStore;
use accord_types::{Address, CiphertextHandle};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A [`MemoryAcl`] shared between the ledger and a decryption oracle.
pub type SharedAcl = Arc<MemoryAcl>;

/// Grants held in a `HashMap` of handle to account set.
#[derive(Debug, Default)]
pub struct MemoryAcl {
    grants: RwLock<HashMap<CiphertextHandle, BTreeSet<Address>>>,
}

impl MemoryAcl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedAcl {
        Arc::new(Self::new())
    }

    // Grants are only ever inserted, so a poisoned lock still holds a valid relation.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<CiphertextHandle, BTreeSet<Address>>> {
        self.grants.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<CiphertextHandle, BTreeSet<Address>>> {
        self.grants.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl AclStore for MemoryAcl {
    fn grant(&self, handle: &CiphertextHandle, account: &Address) -> bool {
        self.write().entry(*handle).or_default().insert(*account)
    }

    fn is_allowed(&self, handle: &CiphertextHandle, account: &Address) -> bool {
        self.read()
            .get(handle)
            .is_some_and(|accounts| accounts.contains(account))
    }

    fn grantees(&self, handle: &CiphertextHandle) -> Vec<Address> {
        self.read()
            .get(handle)
            .map(|accounts| accounts.iter().copied().collect())
            .unwrap_or_default()
    }

    fn grant_count(&self) -> usize {
        self.read().values().map(BTreeSet::len).sum()
    }
}
