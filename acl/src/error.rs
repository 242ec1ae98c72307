use accord_types::{Address, CiphertextHandle};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AclError {
    #[error("{account} is not authorized to decrypt {handle}")]
    Unauthorized {
        handle: CiphertextHandle,
        account: Address,
    },
}
