use serde::{Deserialize, Serialize};

/// Outcome of a rate-limit check. Ephemeral; recomputed per call, never
/// persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u64,
    pub remaining: u64,
    /// Epoch milliseconds at which the window resets
    pub reset_at: u64,
}
