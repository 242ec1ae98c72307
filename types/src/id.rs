//! Initiative identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequence-assigned initiative identifier. The first initiative is `0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InitiativeId(u64);

impl InitiativeId {
    pub const FIRST: Self = Self(0);

    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Index into a dense sequence of initiatives, if it fits in `usize`.
    pub fn index(&self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

impl fmt::Display for InitiativeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for InitiativeId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_is_checked() {
        assert_eq!(InitiativeId::new(3).index(), Some(3));
        if usize::BITS < 64 {
            assert_eq!(InitiativeId::new(1 << 32).index(), None);
        } else {
            assert_eq!(InitiativeId::new(1 << 32).index(), Some(1 << 32));
        }
    }
}
