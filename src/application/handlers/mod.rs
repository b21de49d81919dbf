//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod navigation;
pub mod profile;
pub mod reveal;

pub use navigation::NavigationGuard;
pub use profile::{
    BalanceView, CompleteOnboardingCommand, CompleteOnboardingHandler, GetBalanceHandler,
    GetBalanceQuery, ProvisionProfileCommand, ProvisionProfileHandler, ProvisionProfileResult,
};
pub use reveal::{
    BulkRevealOutcome, RevealError, RevealListingCommand, RevealListingsCommand, RevealOutcome,
    RevealPricing, RevealService, RevealStatus, DEFAULT_MAX_BULK_REVEAL,
};
