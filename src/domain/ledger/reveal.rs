//! Reveal record - proof that a user paid to unlock a listing.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ListingId, Timestamp, UserId};

use super::CreditCost;

/// Immutable, permanent grant of one listing's gated fields to one user.
///
/// At most one exists per (listing, user) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealRecord {
    pub listing_id: ListingId,
    pub user_id: UserId,
    /// Price snapshot at the time of the charge.
    pub credit_cost: CreditCost,
    pub created_at: Timestamp,
}

impl RevealRecord {
    pub fn new(listing_id: ListingId, user_id: UserId, credit_cost: CreditCost) -> Self {
        Self {
            listing_id,
            user_id,
            credit_cost,
            created_at: Timestamp::now(),
        }
    }
}
