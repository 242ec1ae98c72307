//! Committee membership.

use accord_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Accounts allowed to vote, resolve initiatives, run simulations, and grant
/// detail access.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Committee {
    members: BTreeSet<Address>,
}

impl Committee {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable membership. Returns `true` if membership changed.
    pub fn set(&mut self, account: Address, enabled: bool) -> bool {
        if enabled {
            self.members.insert(account)
        } else {
            self.members.remove(&account)
        }
    }

    pub fn contains(&self, account: &Address) -> bool {
        self.members.contains(account)
    }

    pub fn members(&self) -> impl Iterator<Item = &Address> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_reports_changes() {
        let mut committee = Committee::new();
        let member = Address::new([7; 20]);
        assert!(committee.set(member, true));
        assert!(!committee.set(member, true));
        assert!(committee.contains(&member));
        assert!(committee.set(member, false));
        assert!(!committee.set(member, false));
        assert!(committee.is_empty());
    }
}
