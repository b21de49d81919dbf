//! Credit balance value object.

use serde::{Deserialize, Serialize};

/// A user's spendable credits.
///
/// `unlimited` is a flag, not a sentinel amount: when set, affordability
/// checks pass regardless of `credits_remaining` and the stored amount is
/// never decremented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub credits_remaining: u32,
    pub unlimited: bool,
}

impl Balance {
    pub fn new(credits_remaining: u32, unlimited: bool) -> Self {
        Self {
            credits_remaining,
            unlimited,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(0, true)
    }

    /// True if a charge of `total` credits can be taken from this balance.
    pub fn can_afford(&self, total: u64) -> bool {
        self.unlimited || u64::from(self.credits_remaining) >= total
    }

    /// Low-balance warning threshold check. Never low when unlimited.
    pub fn is_low(&self, threshold: u32) -> bool {
        !self.unlimited && self.credits_remaining <= threshold
    }
}
