//! Observable stores and read-through caches.
//!
//! - `SessionStore` - Current identity, fed by the identity provider
//! - `ProfileStore` - Signed-in user's profile state
//! - `BalanceCache` - Ledger-confirmed balances for low-balance warnings
//! - `RevealCache` - Which listings a user has unlocked

mod balance_cache;
mod profile_store;
mod reveal_cache;
mod session_store;

pub use balance_cache::BalanceCache;
pub use profile_store::ProfileStore;
pub use reveal_cache::RevealCache;
pub use session_store::SessionStore;

/// Current instant on the runtime clock, which tests can pause.
pub(crate) fn now() -> std::time::Instant {
    tokio::time::Instant::now().into_std()
}
