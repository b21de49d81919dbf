//! ProfileRepository port for profile persistence.
//!
//! Nothing here writes `credits_remaining`. Balance changes go through the
//! `CreditLedger` port only.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::profile::{OnboardingDetails, Profile};

/// Repository for the one-per-user profile row.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find the profile for a user. `Ok(None)` means not provisioned yet.
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Profile>, DomainError>;

    /// Insert a new profile.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the user already has a profile
    async fn create(&self, profile: &Profile) -> Result<(), DomainError>;

    /// Store onboarding answers and set the completion flag.
    ///
    /// # Errors
    ///
    /// - `ProfileNotFound` if the user has no profile
    async fn complete_onboarding(
        &self,
        user_id: &UserId,
        details: &OnboardingDetails,
    ) -> Result<Profile, DomainError>;
}
