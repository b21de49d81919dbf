//! CompleteOnboardingHandler - Command handler for the post-signup setup flow.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::profile::{OnboardingDetails, Profile};
use crate::ports::ProfileRepository;

#[derive(Debug, Clone)]
pub struct CompleteOnboardingCommand {
    pub user_id: UserId,
    pub company_name: String,
    pub service_area: Option<String>,
}

pub struct CompleteOnboardingHandler {
    repository: Arc<dyn ProfileRepository>,
}

impl CompleteOnboardingHandler {
    pub fn new(repository: Arc<dyn ProfileRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: CompleteOnboardingCommand) -> Result<Profile, DomainError> {
        let details = OnboardingDetails::new(cmd.company_name, cmd.service_area)?;
        let profile = self
            .repository
            .complete_onboarding(&cmd.user_id, &details)
            .await?;
        tracing::info!(user_id = %cmd.user_id, "Onboarding completed");
        Ok(profile)
    }
}
