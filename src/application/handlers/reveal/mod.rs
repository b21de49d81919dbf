//! Reveal handlers - spending credits to unlock listings.

mod errors;
mod pricing;
mod service;

pub use errors::RevealError;
pub use pricing::RevealPricing;
pub use service::{
    BulkRevealOutcome, RevealListingCommand, RevealListingsCommand, RevealOutcome, RevealService,
    RevealStatus, DEFAULT_MAX_BULK_REVEAL,
};
