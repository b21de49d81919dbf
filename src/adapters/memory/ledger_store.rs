//! In-memory profile and credit ledger store.
//!
//! Implements both `ProfileRepository` and `CreditLedger` over one
//! `tokio::sync::Mutex`. Every charge checks and writes inside a single
//! critical section, which is this adapter's per-store serialization point.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use crate::domain::foundation::{DomainError, ErrorCode, ListingId, UserId};
use crate::domain::ledger::{
    Balance, BulkChargeOutcome, BulkChargePlan, ChargeOutcome, ChargeReason, CreditCost,
    RevealRecord,
};
use crate::domain::profile::{OnboardingDetails, Profile};
use crate::ports::{CreditLedger, ProfileRepository};

#[derive(Debug, Default)]
struct LedgerState {
    profiles: HashMap<UserId, Profile>,
    reveals: HashMap<UserId, Vec<RevealRecord>>,
}

/// In-memory store for tests and local development.
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(InMemoryLedgerStore::new());
/// store.seed(Profile::provision(user_id.clone(), 5)).await;
///
/// let outcome = store.charge_one(&user_id, listing_id, cost).await?;
/// assert!(outcome.is_charged());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    state: Mutex<LedgerState>,
    unavailable: AtomicBool,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Inserts or replaces a profile, bypassing the ledger.
    pub async fn seed(&self, profile: Profile) {
        let mut state = self.state.lock().await;
        state.profiles.insert(profile.user_id.clone(), profile);
    }

    /// Makes every operation fail with a database error until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of reveal records held for a user.
    pub async fn reveal_count(&self, user_id: &UserId) -> usize {
        let state = self.state.lock().await;
        state.reveals.get(user_id).map(Vec::len).unwrap_or(0)
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::database("In-memory store marked unavailable"));
        }
        Ok(())
    }
}

fn profile_not_found(user_id: &UserId) -> DomainError {
    DomainError::new(
        ErrorCode::ProfileNotFound,
        format!("No profile for user {}", user_id),
    )
    .with_detail("user_id", user_id.as_str())
}

#[async_trait]
impl ProfileRepository for InMemoryLedgerStore {
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Profile>, DomainError> {
        self.check_available()?;
        let state = self.state.lock().await;
        Ok(state.profiles.get(user_id).cloned())
    }

    async fn create(&self, profile: &Profile) -> Result<(), DomainError> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        if state.profiles.contains_key(&profile.user_id) {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                format!("Profile already exists for user {}", profile.user_id),
            ));
        }
        state
            .profiles
            .insert(profile.user_id.clone(), profile.clone());
        Ok(())
    }

    async fn complete_onboarding(
        &self,
        user_id: &UserId,
        details: &OnboardingDetails,
    ) -> Result<Profile, DomainError> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        let profile = state
            .profiles
            .get_mut(user_id)
            .ok_or_else(|| profile_not_found(user_id))?;
        profile.complete_onboarding(details.clone());
        Ok(profile.clone())
    }
}

#[async_trait]
impl CreditLedger for InMemoryLedgerStore {
    async fn charge_one(
        &self,
        user_id: &UserId,
        listing_id: ListingId,
        cost: CreditCost,
    ) -> Result<ChargeOutcome, DomainError> {
        self.check_available()?;
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let profile = state
            .profiles
            .get_mut(user_id)
            .ok_or_else(|| profile_not_found(user_id))?;
        let owned = state.reveals.entry(user_id.clone()).or_default();

        if owned.iter().any(|r| r.listing_id == listing_id) {
            tracing::debug!(user_id = %user_id, listing_id = %listing_id, "Listing already revealed");
            return Ok(ChargeOutcome::already_owned(listing_id));
        }

        let required = u64::from(cost.get());
        match profile.debit(required) {
            Ok(balance) => {
                let record = RevealRecord::new(listing_id, user_id.clone(), cost);
                owned.push(record.clone());
                tracing::debug!(
                    user_id = %user_id,
                    listing_id = %listing_id,
                    cost = required,
                    credits_remaining = balance.credits_remaining,
                    "Listing revealed"
                );
                Ok(ChargeOutcome::charged(record, balance))
            }
            Err(balance) => Ok(ChargeOutcome::insufficient(listing_id, required, balance)),
        }
    }

    async fn charge_many(
        &self,
        user_id: &UserId,
        listing_ids: &[ListingId],
        cost_per_item: CreditCost,
    ) -> Result<BulkChargeOutcome, DomainError> {
        self.check_available()?;
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let profile = state
            .profiles
            .get_mut(user_id)
            .ok_or_else(|| profile_not_found(user_id))?;
        let owned = state.reveals.entry(user_id.clone()).or_default();

        let owned_ids: HashSet<ListingId> = owned.iter().map(|r| r.listing_id).collect();
        let plan = BulkChargePlan::new(listing_ids, &owned_ids, cost_per_item)?;

        if plan.is_free() {
            return Ok(BulkChargeOutcome {
                reason: ChargeReason::AlreadyOwned,
                charged: Vec::new(),
                already_owned: plan.already_owned,
                total_cost: 0,
                balance: Some(profile.balance()),
            });
        }

        match profile.debit(plan.total_cost) {
            Ok(balance) => {
                let records: Vec<RevealRecord> = plan
                    .new_listings
                    .iter()
                    .map(|id| RevealRecord::new(*id, user_id.clone(), cost_per_item))
                    .collect();
                owned.extend(records.iter().cloned());
                tracing::debug!(
                    user_id = %user_id,
                    charged = records.len(),
                    total_cost = plan.total_cost,
                    "Bulk reveal charged"
                );
                Ok(BulkChargeOutcome {
                    reason: ChargeReason::Charged,
                    charged: records,
                    already_owned: plan.already_owned,
                    total_cost: plan.total_cost,
                    balance: Some(balance),
                })
            }
            Err(balance) => Ok(BulkChargeOutcome {
                reason: ChargeReason::InsufficientCredits,
                charged: Vec::new(),
                already_owned: plan.already_owned,
                total_cost: plan.total_cost,
                balance: Some(balance),
            }),
        }
    }

    async fn balance(&self, user_id: &UserId) -> Result<Balance, DomainError> {
        self.check_available()?;
        let state = self.state.lock().await;
        state
            .profiles
            .get(user_id)
            .map(Profile::balance)
            .ok_or_else(|| profile_not_found(user_id))
    }

    async fn is_revealed(
        &self,
        user_id: &UserId,
        listing_id: ListingId,
    ) -> Result<bool, DomainError> {
        self.check_available()?;
        let state = self.state.lock().await;
        Ok(state
            .reveals
            .get(user_id)
            .is_some_and(|owned| owned.iter().any(|r| r.listing_id == listing_id)))
    }

    async fn revealed_listings(&self, user_id: &UserId) -> Result<Vec<RevealRecord>, DomainError> {
        self.check_available()?;
        let state = self.state.lock().await;
        Ok(state.reveals.get(user_id).cloned().unwrap_or_default())
    }
}
