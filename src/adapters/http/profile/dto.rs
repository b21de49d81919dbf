//! HTTP DTOs for profile endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::profile::{Profile, SubscriptionStatus};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/profile/onboarding`.
#[derive(Debug, Clone, Deserialize)]
pub struct OnboardingRequest {
    pub company_name: String,
    #[serde(default)]
    pub service_area: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub user_id: UserId,
    pub credits_remaining: u32,
    pub unlimited: bool,
    pub onboarding_complete: bool,
    pub subscription_status: SubscriptionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_area: Option<String>,
    pub updated_at: Timestamp,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        let credits_remaining = profile.credits_remaining();
        Self {
            user_id: profile.user_id,
            credits_remaining,
            unlimited: profile.unlimited,
            onboarding_complete: profile.onboarding_complete,
            subscription_status: profile.subscription_status,
            company_name: profile.company_name,
            service_area: profile.service_area,
            updated_at: profile.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProvisionResponse {
    pub created: bool,
    pub profile: ProfileResponse,
}
