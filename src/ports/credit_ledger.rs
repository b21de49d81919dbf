//! Credit ledger port - the only writer of a profile's credit balance.
//!
//! # Contract
//!
//! - Business conditions (`AlreadyOwned`, `InsufficientCredits`,
//!   `LedgerRaceLost`) are returned as outcomes, never as `Err`
//! - `Err` is reserved for infrastructure failures and for a user without
//!   a profile (`ErrorCode::ProfileNotFound`)
//! - The balance decrement and the reveal insert happen as one unit
//! - Concurrent charges for the same user can never drive the balance
//!   below zero
//! - At most one reveal record exists per (listing, user)
//! - Unlimited profiles are never decremented

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ListingId, UserId};
use crate::domain::ledger::{Balance, BulkChargeOutcome, ChargeOutcome, CreditCost, RevealRecord};

#[async_trait]
pub trait CreditLedger: Send + Sync {
    /// Charge `cost` to reveal one listing. Re-revealing is a free no-op.
    async fn charge_one(
        &self,
        user_id: &UserId,
        listing_id: ListingId,
        cost: CreditCost,
    ) -> Result<ChargeOutcome, DomainError>;

    /// Charge for every listing not already revealed, all or nothing.
    async fn charge_many(
        &self,
        user_id: &UserId,
        listing_ids: &[ListingId],
        cost_per_item: CreditCost,
    ) -> Result<BulkChargeOutcome, DomainError>;

    async fn balance(&self, user_id: &UserId) -> Result<Balance, DomainError>;

    async fn is_revealed(&self, user_id: &UserId, listing_id: ListingId)
        -> Result<bool, DomainError>;

    /// All reveals for a user, oldest first.
    async fn revealed_listings(&self, user_id: &UserId) -> Result<Vec<RevealRecord>, DomainError>;
}
