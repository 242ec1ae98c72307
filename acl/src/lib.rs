//! Access-control relation for ciphertext handles.
//!
//! A grant `(handle, account)` lets `account` ask a decryption oracle for the
//! plaintext behind `handle`. Grants are additive only: there is no revocation.

pub mod error;
pub mod memory;

pub use error::AclError;
pub use memory::{MemoryAcl, SharedAcl};

use accord_types::{Address, CiphertextHandle};
use std::sync::Arc;

/// Storage for handle grants.
///
/// Implementations use interior mutability so one relation can be shared between
/// the ledger (writer) and an oracle (reader).
pub trait AclStore: Send + Sync {
    /// Record a grant. Returns `true` if the grant did not exist before.
    fn grant(&self, handle: &CiphertextHandle, account: &Address) -> bool;

    /// Whether `account` holds a grant for `handle`.
    fn is_allowed(&self, handle: &CiphertextHandle, account: &Address) -> bool;

    /// All accounts holding a grant for `handle`, in ascending address order.
    fn grantees(&self, handle: &CiphertextHandle) -> Vec<Address>;

    /// Total number of `(handle, account)` pairs.
    fn grant_count(&self) -> usize;

    /// Fail with [`AclError::Unauthorized`] unless `account` holds a grant.
    fn require(&self, handle: &CiphertextHandle, account: &Address) -> Result<(), AclError> {
        if self.is_allowed(handle, account) {
            Ok(())
        } else {
            Err(AclError::Unauthorized {
                handle: *handle,
                account: *account,
            })
        }
    }
}

impl<A: AclStore + ?Sized> AclStore for Arc<A> {
    fn grant(&self, handle: &CiphertextHandle, account: &Address) -> bool {
        (**self).grant(handle, account)
    }

    fn is_allowed(&self, handle: &CiphertextHandle, account: &Address) -> bool {
        (**self).is_allowed(handle, account)
    }

    fn grantees(&self, handle: &CiphertextHandle) -> Vec<Address> {
        (**self).grantees(handle)
    }

    fn grant_count(&self) -> usize {
        (**self).grant_count()
    }
}
