//! Application layer - Commands, Queries, Handlers and observable stores.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Stores hold the asynchronously loading state the route guard samples.

pub mod handlers;
pub mod stores;

pub use handlers::{
    // Navigation
    NavigationGuard,
    // Profile
    BalanceView, CompleteOnboardingCommand, CompleteOnboardingHandler, GetBalanceHandler,
    GetBalanceQuery, ProvisionProfileCommand, ProvisionProfileHandler, ProvisionProfileResult,
    // Reveal
    BulkRevealOutcome, RevealError, RevealListingCommand, RevealListingsCommand, RevealOutcome,
    RevealPricing, RevealService, RevealStatus, DEFAULT_MAX_BULK_REVEAL,
};
pub use stores::{BalanceCache, ProfileStore, RevealCache, SessionStore};
