//! Per-user cached credit balance for low-balance warnings.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::ledger::Balance;
use crate::ports::CreditLedger;

/// Observable balance per user.
///
/// Only ledger-confirmed values are published: either a fresh ledger read
/// or the balance a successful charge returned. Nothing here predicts a
/// balance ahead of the ledger.
///
/// A user's entry lives only while someone watches it. Publishing for an
/// unwatched user is a no-op and every lookup prunes entries whose
/// receivers are gone, so a long-running server holds nothing per user.
pub struct BalanceCache {
    ledger: Arc<dyn CreditLedger>,
    entries: Mutex<HashMap<UserId, watch::Sender<Option<Balance>>>>,
}

impl BalanceCache {
    pub fn new(ledger: Arc<dyn CreditLedger>) -> Self {
        Self {
            ledger,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Observes a user's balance. `None` until first loaded.
    pub fn watch(&self, user_id: &UserId) -> watch::Receiver<Option<Balance>> {
        let mut entries = self.lock();
        prune(&mut entries);
        entries
            .entry(user_id.clone())
            .or_insert_with(|| watch::channel(None).0)
            .subscribe()
    }

    /// Last published balance, if the user is being watched.
    pub fn current(&self, user_id: &UserId) -> Option<Balance> {
        let mut entries = self.lock();
        prune(&mut entries);
        entries.get(user_id).and_then(|tx| *tx.borrow())
    }

    /// Publishes a balance the ledger just confirmed.
    pub fn publish(&self, user_id: &UserId, balance: Balance) {
        let mut entries = self.lock();
        prune(&mut entries);
        if let Some(tx) = entries.get(user_id) {
            tx.send_if_modified(|current| {
                if *current == Some(balance) {
                    return false;
                }
                *current = Some(balance);
                true
            });
        }
    }

    /// Reads the balance from the ledger and publishes it.
    pub async fn refresh(&self, user_id: &UserId) -> Result<Balance, DomainError> {
        let balance = self.ledger.balance(user_id).await?;
        self.publish(user_id, balance);
        Ok(balance)
    }

    /// Cached value if present, otherwise a ledger read.
    pub async fn get(&self, user_id: &UserId) -> Result<Balance, DomainError> {
        match self.current(user_id) {
            Some(balance) => Ok(balance),
            None => self.refresh(user_id).await,
        }
    }

    /// Number of users currently watched.
    pub fn watched_users(&self) -> usize {
        let mut entries = self.lock();
        prune(&mut entries);
        entries.len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<UserId, watch::Sender<Option<Balance>>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn prune(entries: &mut HashMap<UserId, watch::Sender<Option<Balance>>>) {
    entries.retain(|_, tx| tx.receiver_count() > 0);
}
