//! Profile entity - the entitlement and business-identity record.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId, ValidationError};
use crate::domain::ledger::Balance;

use super::SubscriptionStatus;

/// One row per user.
///
/// `credits_remaining` is unsigned so a negative balance is unrepresentable.
/// It is readable through `credits_remaining()` only; `debit` is the only
/// in-domain path that lowers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub(crate) credits_remaining: u32,
    pub unlimited: bool,
    pub onboarding_complete: bool,
    pub subscription_status: SubscriptionStatus,
    pub company_name: Option<String>,
    pub service_area: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Profile {
    /// Creates the initial row for a freshly signed-up user.
    pub fn provision(user_id: UserId, starting_credits: u32) -> Self {
        let now = Timestamp::now();
        Self {
            user_id,
            credits_remaining: starting_credits,
            unlimited: false,
            onboarding_complete: false,
            subscription_status: SubscriptionStatus::Inactive,
            company_name: None,
            service_area: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Credits left to spend.
    ///
    /// The balance cannot be written from outside the crate:
    ///
    /// ```compile_fail
    /// use leadgate::domain::foundation::UserId;
    /// use leadgate::domain::profile::Profile;
    ///
    /// let mut profile = Profile::provision(UserId::new("user-1").unwrap(), 1);
    /// profile.credits_remaining = 99;
    /// ```
    pub fn credits_remaining(&self) -> u32 {
        self.credits_remaining
    }

    pub fn balance(&self) -> Balance {
        Balance::new(self.credits_remaining, self.unlimited)
    }

    /// Subtracts `amount` credits.
    ///
    /// Unlimited profiles are left untouched. When the balance cannot cover
    /// `amount` the profile is unchanged and the current balance is returned
    /// as the error.
    pub fn debit(&mut self, amount: u64) -> Result<Balance, Balance> {
        if self.unlimited {
            return Ok(self.balance());
        }
        let current = u64::from(self.credits_remaining);
        if current < amount {
            return Err(self.balance());
        }
        // current - amount <= current, which already fits in u32.
        self.credits_remaining = (current - amount) as u32;
        self.updated_at = Timestamp::now();
        Ok(self.balance())
    }

    /// Records onboarding answers and flips the completion flag.
    pub fn complete_onboarding(&mut self, details: OnboardingDetails) {
        self.company_name = Some(details.company_name);
        self.service_area = details.service_area;
        self.onboarding_complete = true;
        self.updated_at = Timestamp::now();
    }
}

/// Answers collected by the onboarding flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingDetails {
    pub company_name: String,
    pub service_area: Option<String>,
}

impl OnboardingDetails {
    /// Validates and normalizes onboarding answers.
    pub fn new(
        company_name: impl Into<String>,
        service_area: Option<String>,
    ) -> Result<Self, ValidationError> {
        let company_name = company_name.into().trim().to_string();
        if company_name.is_empty() {
            return Err(ValidationError::empty_field("company_name"));
        }
        let service_area = service_area
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Ok(Self {
            company_name,
            service_area,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(credits: u32) -> Profile {
        Profile::provision(UserId::new("user-1").unwrap(), credits)
    }

    #[test]
    fn provision_starts_without_onboarding() {
        let p = profile(10);
        assert_eq!(p.credits_remaining(), 10);
        assert!(!p.unlimited);
        assert!(!p.onboarding_complete);
        assert_eq!(p.subscription_status, SubscriptionStatus::Inactive);
    }

    #[test]
    fn debit_subtracts_when_affordable() {
        let mut p = profile(5);
        let balance = p.debit(3).unwrap();
        assert_eq!(balance.credits_remaining, 2);
        assert_eq!(p.credits_remaining(), 2);
    }

    #[test]
    fn debit_to_exactly_zero_is_allowed() {
        let mut p = profile(4);
        assert_eq!(p.debit(4).unwrap().credits_remaining, 0);
    }

    #[test]
    fn debit_refuses_overdraw_and_leaves_balance() {
        let mut p = profile(5);
        let err = p.debit(6).unwrap_err();
        assert_eq!(err.credits_remaining, 5);
        assert_eq!(p.credits_remaining(), 5);
    }

    #[test]
    fn debit_is_noop_for_unlimited() {
        let mut p = profile(0);
        p.unlimited = true;
        let balance = p.debit(1_000).unwrap();
        assert!(balance.unlimited);
        assert_eq!(p.credits_remaining(), 0);
    }

    #[test]
    fn onboarding_details_require_company_name() {
        assert!(OnboardingDetails::new("   ", None).is_err());
    }

    #[test]
    fn onboarding_details_trim_and_drop_blank_area() {
        let details = OnboardingDetails::new("  Acme Homes ", Some("  ".to_string())).unwrap();
        assert_eq!(details.company_name, "Acme Homes");
        assert!(details.service_area.is_none());
    }

    #[test]
    fn complete_onboarding_sets_flag() {
        let mut p = profile(0);
        p.complete_onboarding(
            OnboardingDetails::new("Acme", Some("Leeds".to_string())).unwrap(),
        );
        assert!(p.onboarding_complete);
        assert_eq!(p.company_name.as_deref(), Some("Acme"));
        assert_eq!(p.service_area.as_deref(), Some("Leeds"));
    }
}
