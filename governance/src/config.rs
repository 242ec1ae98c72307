//! Ledger limits.

use serde::{Deserialize, Serialize};

/// Tunable limits enforced by [`GovernanceLedger`](crate::GovernanceLedger).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Maximum size of each ciphertext blob attached to an initiative.
    #[serde(default = "default_max_blob_bytes")]
    pub max_blob_bytes: usize,
    /// Maximum number of initiatives in one simulation call.
    #[serde(default = "default_max_simulation_batch")]
    pub max_simulation_batch: usize,
    /// Capacity of the ledger service's command queue.
    #[serde(default = "default_command_queue")]
    pub command_queue: usize,
}

fn default_max_blob_bytes() -> usize {
    4096
}

fn default_max_simulation_batch() -> usize {
    64
}

fn default_command_queue() -> usize {
    256
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_blob_bytes: default_max_blob_bytes(),
            max_simulation_batch: default_max_simulation_batch(),
            command_queue: default_command_queue(),
        }
    }
}
