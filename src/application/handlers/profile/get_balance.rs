//! GetBalanceHandler - Query handler for the low-balance warning view.

use std::sync::Arc;

use serde::Serialize;

use crate::application::stores::BalanceCache;
use crate::domain::foundation::{DomainError, UserId};

/// Query for a user's current balance.
#[derive(Debug, Clone)]
pub struct GetBalanceQuery {
    pub user_id: UserId,
}

/// Balance as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceView {
    pub credits_remaining: u32,
    pub unlimited: bool,
    pub low_balance: bool,
}

/// Reads the balance from the ledger (through the cache, which it refreshes).
pub struct GetBalanceHandler {
    balances: Arc<BalanceCache>,
    low_balance_threshold: u32,
}

impl GetBalanceHandler {
    pub fn new(balances: Arc<BalanceCache>, low_balance_threshold: u32) -> Self {
        Self {
            balances,
            low_balance_threshold,
        }
    }

    pub async fn handle(&self, query: GetBalanceQuery) -> Result<BalanceView, DomainError> {
        let balance = self.balances.refresh(&query.user_id).await?;
        Ok(BalanceView {
            credits_remaining: balance.credits_remaining,
            unlimited: balance.unlimited,
            low_balance: balance.is_low(self.low_balance_threshold),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryLedgerStore;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::profile::Profile;

    async fn handler_with(profile: Option<Profile>) -> GetBalanceHandler {
        let ledger = Arc::new(InMemoryLedgerStore::new());
        if let Some(profile) = profile {
            ledger.seed(profile).await;
        }
        GetBalanceHandler::new(Arc::new(BalanceCache::new(ledger)), 5)
    }

    fn query() -> GetBalanceQuery {
        GetBalanceQuery {
            user_id: UserId::new("user-1").unwrap(),
        }
    }

    #[tokio::test]
    async fn flags_low_balance_at_threshold() {
        let handler = handler_with(Some(Profile::provision(query().user_id, 5))).await;
        let view = handler.handle(query()).await.unwrap();
        assert_eq!(view.credits_remaining, 5);
        assert!(view.low_balance);
    }

    #[tokio::test]
    async fn unlimited_is_never_low() {
        let mut profile = Profile::provision(query().user_id, 0);
        profile.unlimited = true;
        let handler = handler_with(Some(profile)).await;

        let view = handler.handle(query()).await.unwrap();

        assert!(view.unlimited);
        assert!(!view.low_balance);
    }

    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let handler = handler_with(None).await;
        let err = handler.handle(query()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ProfileNotFound);
    }
}
