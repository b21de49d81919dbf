//! Read-through view of which listings a user has revealed.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::domain::foundation::{DomainError, ListingId, UserId};
use crate::domain::ledger::RevealRecord;
use crate::ports::CreditLedger;

/// Cached reveal set per user.
///
/// Entries are only added after the ledger confirms a reveal. A cache miss
/// always falls through to the ledger, so this view can lag but never
/// claims a reveal the ledger does not hold.
pub struct RevealCache {
    ledger: Arc<dyn CreditLedger>,
    revealed: Mutex<HashMap<UserId, HashSet<ListingId>>>,
}

impl RevealCache {
    pub fn new(ledger: Arc<dyn CreditLedger>) -> Self {
        Self {
            ledger,
            revealed: Mutex::new(HashMap::new()),
        }
    }

    pub async fn is_revealed(
        &self,
        user_id: &UserId,
        listing_id: ListingId,
    ) -> Result<bool, DomainError> {
        if self.contains(user_id, listing_id) {
            return Ok(true);
        }
        let revealed = self.ledger.is_revealed(user_id, listing_id).await?;
        if revealed {
            self.record(user_id, [listing_id]);
        }
        Ok(revealed)
    }

    /// Reloads the full set from the ledger.
    pub async fn refresh(&self, user_id: &UserId) -> Result<Vec<RevealRecord>, DomainError> {
        let records = self.ledger.revealed_listings(user_id).await?;
        let ids = records.iter().map(|r| r.listing_id).collect();
        self.lock().insert(user_id.clone(), ids);
        Ok(records)
    }

    /// Adds ledger-confirmed reveals.
    pub fn record(&self, user_id: &UserId, listing_ids: impl IntoIterator<Item = ListingId>) {
        self.lock()
            .entry(user_id.clone())
            .or_default()
            .extend(listing_ids);
    }

    pub fn contains(&self, user_id: &UserId, listing_id: ListingId) -> bool {
        self.lock()
            .get(user_id)
            .is_some_and(|ids| ids.contains(&listing_id))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<UserId, HashSet<ListingId>>> {
        self.revealed.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryLedgerStore;
    use crate::domain::ledger::CreditCost;
    use crate::domain::profile::Profile;

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    #[tokio::test]
    async fn miss_falls_through_to_ledger() {
        let ledger = Arc::new(InMemoryLedgerStore::new());
        ledger.seed(Profile::provision(user(), 5)).await;
        let listing = ListingId::new();
        ledger
            .charge_one(&user(), listing, CreditCost::default())
            .await
            .unwrap();
        let cache = RevealCache::new(ledger);

        assert!(!cache.contains(&user(), listing));
        assert!(cache.is_revealed(&user(), listing).await.unwrap());
        assert!(cache.contains(&user(), listing));
    }

    #[tokio::test]
    async fn unrevealed_listing_is_not_cached() {
        let ledger = Arc::new(InMemoryLedgerStore::new());
        ledger.seed(Profile::provision(user(), 5)).await;
        let cache = RevealCache::new(ledger);
        let listing = ListingId::new();

        assert!(!cache.is_revealed(&user(), listing).await.unwrap());
        assert!(!cache.contains(&user(), listing));
    }

    #[tokio::test]
    async fn refresh_loads_full_set() {
        let ledger = Arc::new(InMemoryLedgerStore::new());
        ledger.seed(Profile::provision(user(), 5)).await;
        let ids = [ListingId::new(), ListingId::new()];
        ledger
            .charge_many(&user(), &ids, CreditCost::default())
            .await
            .unwrap();
        let cache = RevealCache::new(ledger);

        let records = cache.refresh(&user()).await.unwrap();

        assert_eq!(records.len(), 2);
        assert!(ids.iter().all(|id| cache.contains(&user(), *id)));
    }
}
