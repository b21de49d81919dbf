//! Charge outcomes returned by the credit ledger.
//!
//! Expected business conditions are values here, not errors: a ledger only
//! returns `Err` for infrastructure failures.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ListingId;

use super::{Balance, RevealRecord};

/// Why a charge did or did not happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeReason {
    /// Credits were taken and reveal records inserted.
    Charged,
    /// Nothing to charge: every requested listing was already revealed.
    AlreadyOwned,
    /// The balance could not cover the charge.
    InsufficientCredits,
    /// The pre-read balance looked sufficient but the conditional decrement
    /// found it short at commit time (a concurrent charge won).
    LedgerRaceLost,
}

impl ChargeReason {
    /// Both shortfall variants look identical to callers.
    pub fn is_insufficient(&self) -> bool {
        matches!(
            self,
            ChargeReason::InsufficientCredits | ChargeReason::LedgerRaceLost
        )
    }
}

/// Result of charging for a single listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeOutcome {
    pub listing_id: ListingId,
    pub reason: ChargeReason,
    /// The inserted record, present only when charged.
    pub record: Option<RevealRecord>,
    /// Balance after the charge, or the balance that fell short.
    pub balance: Option<Balance>,
    /// Credits the charge needed.
    pub required: u64,
}

impl ChargeOutcome {
    pub fn charged(record: RevealRecord, balance: Balance) -> Self {
        Self {
            listing_id: record.listing_id,
            reason: ChargeReason::Charged,
            required: u64::from(record.credit_cost.get()),
            record: Some(record),
            balance: Some(balance),
        }
    }

    pub fn already_owned(listing_id: ListingId) -> Self {
        Self {
            listing_id,
            reason: ChargeReason::AlreadyOwned,
            record: None,
            balance: None,
            required: 0,
        }
    }

    pub fn insufficient(listing_id: ListingId, required: u64, balance: Balance) -> Self {
        Self {
            listing_id,
            reason: ChargeReason::InsufficientCredits,
            record: None,
            balance: Some(balance),
            required,
        }
    }

    pub fn race_lost(listing_id: ListingId, required: u64, balance: Balance) -> Self {
        Self {
            reason: ChargeReason::LedgerRaceLost,
            ..Self::insufficient(listing_id, required, balance)
        }
    }

    /// True only when credits were actually taken.
    pub fn is_charged(&self) -> bool {
        self.reason == ChargeReason::Charged
    }
}

/// Result of an all-or-nothing bulk charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkChargeOutcome {
    pub reason: ChargeReason,
    /// Records inserted by this call. Empty unless charged.
    pub charged: Vec<RevealRecord>,
    /// Listings skipped because they were already revealed (free).
    pub already_owned: Vec<ListingId>,
    /// Price of the new listings. Reported on failure too, so the caller
    /// can show the shortfall.
    pub total_cost: u64,
    pub balance: Option<Balance>,
}

impl BulkChargeOutcome {
    /// Number of listings newly charged (0 on failure).
    pub fn charged_count(&self) -> usize {
        self.charged.len()
    }

    /// Listings the user can now see: newly charged plus already owned.
    pub fn unlocked_count(&self) -> usize {
        if self.reason.is_insufficient() {
            return 0;
        }
        self.charged.len() + self.already_owned.len()
    }

    /// Credits actually taken by this call.
    pub fn credits_spent(&self) -> u64 {
        if self.reason == ChargeReason::Charged {
            self.total_cost
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use crate::domain::ledger::CreditCost;

    #[test]
    fn race_lost_is_treated_as_insufficient() {
        assert!(ChargeReason::LedgerRaceLost.is_insufficient());
        assert!(ChargeReason::InsufficientCredits.is_insufficient());
        assert!(!ChargeReason::AlreadyOwned.is_insufficient());
        assert!(!ChargeReason::Charged.is_insufficient());
    }

    #[test]
    fn charged_outcome_carries_record_and_cost() {
        let record = RevealRecord::new(
            ListingId::new(),
            UserId::new("u1").unwrap(),
            CreditCost::new(3).unwrap(),
        );
        let outcome = ChargeOutcome::charged(record.clone(), Balance::new(2, false));
        assert!(outcome.is_charged());
        assert_eq!(outcome.required, 3);
        assert_eq!(outcome.record, Some(record));
    }

    #[test]
    fn already_owned_is_not_a_charge() {
        let outcome = ChargeOutcome::already_owned(ListingId::new());
        assert!(!outcome.is_charged());
        assert_eq!(outcome.required, 0);
    }

    #[test]
    fn failed_bulk_unlocks_nothing_and_spends_nothing() {
        let outcome = BulkChargeOutcome {
            reason: ChargeReason::InsufficientCredits,
            charged: vec![],
            already_owned: vec![ListingId::new()],
            total_cost: 6,
            balance: Some(Balance::new(5, false)),
        };
        assert_eq!(outcome.charged_count(), 0);
        assert_eq!(outcome.unlocked_count(), 0);
        assert_eq!(outcome.credits_spent(), 0);
    }
}
