//! RevealService - unlocks listings by charging credits through the ledger.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use crate::application::stores::{BalanceCache, RevealCache};
use crate::domain::foundation::{ListingId, UserId};
use crate::domain::ledger::{Balance, ChargeReason, RevealRecord};
use crate::ports::CreditLedger;

use super::{RevealError, RevealPricing};

/// Default ceiling on listings per bulk reveal.
pub const DEFAULT_MAX_BULK_REVEAL: usize = 100;

/// Command to reveal one listing.
#[derive(Debug, Clone)]
pub struct RevealListingCommand {
    pub user_id: UserId,
    pub listing_id: ListingId,
    /// Listing kind used to look up the price.
    pub listing_kind: Option<String>,
    /// Caller-provided price, overriding the kind's price.
    pub cost_override: Option<u32>,
}

/// Command to reveal several listings at one price each.
#[derive(Debug, Clone)]
pub struct RevealListingsCommand {
    pub user_id: UserId,
    pub listing_ids: Vec<ListingId>,
    pub listing_kind: Option<String>,
    pub cost_override: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealStatus {
    Revealed,
    AlreadyOwned,
}

/// Result of a successful single reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealOutcome {
    pub listing_id: ListingId,
    pub status: RevealStatus,
    pub credits_charged: u64,
    pub record: Option<RevealRecord>,
    pub balance: Option<Balance>,
}

/// Result of a successful bulk reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkRevealOutcome {
    pub revealed: Vec<ListingId>,
    pub already_owned: Vec<ListingId>,
    pub total_cost: u64,
    pub balance: Option<Balance>,
}

impl BulkRevealOutcome {
    /// Listings now visible to the user, including ones owned before.
    pub fn unlocked_count(&self) -> usize {
        self.revealed.len() + self.already_owned.len()
    }
}

/// Listing-shaped front for the credit ledger.
///
/// Caches are updated only after the ledger confirms, never optimistically.
/// Without a reveal cache every query goes straight to the ledger.
pub struct RevealService {
    ledger: Arc<dyn CreditLedger>,
    pricing: RevealPricing,
    max_bulk_reveal: usize,
    reveal_cache: Option<Arc<RevealCache>>,
    balance_cache: Arc<BalanceCache>,
}

impl RevealService {
    pub fn new(
        ledger: Arc<dyn CreditLedger>,
        pricing: RevealPricing,
        balance_cache: Arc<BalanceCache>,
    ) -> Self {
        Self {
            ledger,
            pricing,
            max_bulk_reveal: DEFAULT_MAX_BULK_REVEAL,
            reveal_cache: None,
            balance_cache,
        }
    }

    /// Keeps a per-user view of revealed listings for repeated checks.
    pub fn with_reveal_cache(mut self, cache: Arc<RevealCache>) -> Self {
        self.reveal_cache = Some(cache);
        self
    }

    pub fn with_max_bulk_reveal(mut self, max: usize) -> Self {
        self.max_bulk_reveal = max;
        self
    }

    pub async fn reveal(&self, cmd: RevealListingCommand) -> Result<RevealOutcome, RevealError> {
        let cost = self
            .pricing
            .cost_for(cmd.listing_kind.as_deref(), cmd.cost_override)?;

        let outcome = self
            .ledger
            .charge_one(&cmd.user_id, cmd.listing_id, cost)
            .await?;

        if let Some(balance) = outcome.balance {
            self.balance_cache.publish(&cmd.user_id, balance);
        }

        match outcome.reason {
            ChargeReason::Charged => {
                self.record_revealed(&cmd.user_id, [cmd.listing_id]);
                tracing::info!(
                    user_id = %cmd.user_id,
                    listing_id = %cmd.listing_id,
                    cost = outcome.required,
                    "Listing revealed"
                );
                Ok(RevealOutcome {
                    listing_id: cmd.listing_id,
                    status: RevealStatus::Revealed,
                    credits_charged: outcome.required,
                    record: outcome.record,
                    balance: outcome.balance,
                })
            }
            ChargeReason::AlreadyOwned => {
                self.record_revealed(&cmd.user_id, [cmd.listing_id]);
                Ok(RevealOutcome {
                    listing_id: cmd.listing_id,
                    status: RevealStatus::AlreadyOwned,
                    credits_charged: 0,
                    record: None,
                    balance: outcome.balance,
                })
            }
            ChargeReason::InsufficientCredits | ChargeReason::LedgerRaceLost => {
                let available = outcome.balance.map(|b| b.credits_remaining).unwrap_or(0);
                tracing::info!(
                    user_id = %cmd.user_id,
                    listing_id = %cmd.listing_id,
                    required = outcome.required,
                    available,
                    race_lost = outcome.reason == ChargeReason::LedgerRaceLost,
                    "Reveal refused: insufficient credits"
                );
                Err(RevealError::insufficient_credits(outcome.required, available))
            }
        }
    }

    pub async fn reveal_many(
        &self,
        cmd: RevealListingsCommand,
    ) -> Result<BulkRevealOutcome, RevealError> {
        if cmd.listing_ids.is_empty() {
            return Err(RevealError::validation(
                "listing_ids",
                "at least one listing is required",
            ));
        }
        let distinct = cmd.listing_ids.iter().collect::<HashSet<_>>().len();
        if distinct > self.max_bulk_reveal {
            return Err(RevealError::TooManyListings {
                requested: distinct,
                max: self.max_bulk_reveal,
            });
        }

        let cost = self
            .pricing
            .cost_for(cmd.listing_kind.as_deref(), cmd.cost_override)?;

        let outcome = self
            .ledger
            .charge_many(&cmd.user_id, &cmd.listing_ids, cost)
            .await?;

        if let Some(balance) = outcome.balance {
            self.balance_cache.publish(&cmd.user_id, balance);
        }

        if outcome.reason.is_insufficient() {
            let available = outcome.balance.map(|b| b.credits_remaining).unwrap_or(0);
            tracing::info!(
                user_id = %cmd.user_id,
                required = outcome.total_cost,
                available,
                "Bulk reveal refused: insufficient credits"
            );
            return Err(RevealError::insufficient_credits(outcome.total_cost, available));
        }

        let revealed: Vec<ListingId> = outcome.charged.iter().map(|r| r.listing_id).collect();
        self.record_revealed(
            &cmd.user_id,
            revealed.iter().chain(outcome.already_owned.iter()).copied(),
        );
        tracing::info!(
            user_id = %cmd.user_id,
            revealed = revealed.len(),
            already_owned = outcome.already_owned.len(),
            total_cost = outcome.credits_spent(),
            "Bulk reveal completed"
        );

        Ok(BulkRevealOutcome {
            revealed,
            total_cost: outcome.credits_spent(),
            already_owned: outcome.already_owned,
            balance: outcome.balance,
        })
    }

    pub async fn is_revealed(
        &self,
        user_id: &UserId,
        listing_id: ListingId,
    ) -> Result<bool, RevealError> {
        let revealed = match &self.reveal_cache {
            Some(cache) => cache.is_revealed(user_id, listing_id).await?,
            None => self.ledger.is_revealed(user_id, listing_id).await?,
        };
        Ok(revealed)
    }

    pub async fn revealed_listings(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<RevealRecord>, RevealError> {
        let records = match &self.reveal_cache {
            Some(cache) => cache.refresh(user_id).await?,
            None => self.ledger.revealed_listings(user_id).await?,
        };
        Ok(records)
    }

    fn record_revealed(
        &self,
        user_id: &UserId,
        listing_ids: impl IntoIterator<Item = ListingId>,
    ) {
        if let Some(cache) = &self.reveal_cache {
            cache.record(user_id, listing_ids);
        }
    }
}
