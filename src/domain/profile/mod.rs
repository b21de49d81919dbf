//! Profile domain module.
//!
//! - `profile` - Profile entity, onboarding details, the debit rule
//! - `state` - `ProfileState` tagged load result
//! - `subscription_status` - billing-mirrored subscription state

#[allow(clippy::module_inception)]
mod profile;
mod state;
mod subscription_status;

pub use profile::{OnboardingDetails, Profile};
pub use state::ProfileState;
pub use subscription_status::SubscriptionStatus;
