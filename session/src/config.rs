use serde::{Deserialize, Serialize};

/// Client-side decryption session settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Validity window of each attestation, in days.
    #[serde(default = "default_duration_days")]
    pub duration_days: u32,
    /// Maximum number of handles resolved in one round.
    #[serde(default = "default_max_handles_per_round")]
    pub max_handles_per_round: usize,
}

fn default_duration_days() -> u32 {
    365
}

fn default_max_handles_per_round() -> usize {
    64
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_days: default_duration_days(),
            max_handles_per_round: default_max_handles_per_round(),
        }
    }
}
