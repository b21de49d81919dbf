//! Profile handlers - provisioning, onboarding and balance queries.

mod complete_onboarding;
mod get_balance;
mod provision_profile;

pub use complete_onboarding::{CompleteOnboardingCommand, CompleteOnboardingHandler};
pub use get_balance::{BalanceView, GetBalanceHandler, GetBalanceQuery};
pub use provision_profile::{
    ProvisionProfileCommand, ProvisionProfileHandler, ProvisionProfileResult,
};
